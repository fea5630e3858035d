use super::json_ld::JsonLdReader;
use crate::config::TitleRules;
use crate::document::{clean_text, compile_selector, compile_selectors, ParsingContext};
use crate::error::ExtractError;
use log::debug;
use scraper::Selector;

pub struct TitleExtractor {
    reader: JsonLdReader,
    selectors: Vec<Selector>,
    page_title: Selector,
}

impl TitleExtractor {
    pub fn new(rules: &TitleRules) -> Result<Self, ExtractError> {
        Ok(Self {
            reader: JsonLdReader::new()?,
            selectors: compile_selectors(&rules.selectors)?,
            page_title: compile_selector("title")?,
        })
    }

    /// Structured-data name, then the title selectors, then `<title>`.
    /// Empty when the page offers none of them.
    pub fn extract(&self, context: &ParsingContext) -> String {
        if let Some(name) = self.reader.read(context).name() {
            debug!("TitleExtractor: using structured data name");
            return name.to_string();
        }

        for selector in &self.selectors {
            if let Some(element) = context.matches(selector).first() {
                let text = clean_text(element);
                if !text.is_empty() {
                    return text;
                }
            }
        }

        debug!("TitleExtractor: falling back to page title");
        context
            .matches(&self.page_title)
            .first()
            .map(clean_text)
            .unwrap_or_default()
    }
}
