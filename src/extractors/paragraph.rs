use super::Extractor;
use crate::config::ParagraphRules;
use crate::document::{compile_selector, element_text, ParsingContext};
use crate::error::ExtractError;
use crate::model::{CandidateLine, Strategy};
use log::debug;
use scraper::Selector;

/// Last resort for instructions: free-text blocks that read like cooking steps
pub struct ParagraphScanner {
    selector: Selector,
    min_length: usize,
    max_length: usize,
    keywords: Vec<String>,
    limit: usize,
}

impl ParagraphScanner {
    pub fn new(rules: &ParagraphRules) -> Result<Self, ExtractError> {
        Ok(Self {
            selector: compile_selector(&rules.selector)?,
            min_length: rules.min_length,
            max_length: rules.max_length,
            keywords: rules.keywords.iter().map(|k| k.to_lowercase()).collect(),
            limit: rules.limit,
        })
    }

    fn is_instruction_block(&self, text: &str) -> bool {
        let length = text.chars().count();
        if length < self.min_length || length > self.max_length {
            return false;
        }
        let lower = text.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

impl Extractor for ParagraphScanner {
    fn strategy(&self) -> Strategy {
        Strategy::ParagraphScan
    }

    fn candidates<'a>(&self, context: &'a ParsingContext) -> Vec<CandidateLine<'a>> {
        let candidates: Vec<_> = context
            .matches(&self.selector)
            .iter()
            .filter_map(|element| {
                let text = element_text(element);
                let text = text.trim();
                self.is_instruction_block(text)
                    .then(|| CandidateLine::new(text, Strategy::ParagraphScan, Some(element)))
            })
            .take(self.limit)
            .collect();

        debug!("ParagraphScanner: {} candidate(s)", candidates.len());
        candidates
    }
}
