use super::json_ld::{JsonLdReader, StructuredData};
use crate::config::MetadataRules;
use crate::document::{clean_text, collapse_whitespace, compile_selectors, first_digit_run, ParsingContext};
use crate::error::ExtractError;
use crate::model::{RecipeMetadata, NOT_AVAILABLE};
use log::debug;
use scraper::Selector;

/// Class-name heuristic for one metadata value
struct Probe {
    name: &'static str,
    selectors: Vec<Selector>,
    keywords: Vec<String>,
}

impl Probe {
    fn new(
        name: &'static str,
        selectors: &[String],
        keywords: &[String],
    ) -> Result<Self, ExtractError> {
        Ok(Self {
            name,
            selectors: compile_selectors(selectors)?,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        })
    }

    /// Text of the first selector hit whose text mentions one of the keywords
    fn find(&self, context: &ParsingContext) -> Option<String> {
        for selector in &self.selectors {
            let Some(element) = context.matches(selector).first() else {
                continue;
            };
            let text = clean_text(element);
            let lower = text.to_lowercase();
            if !text.is_empty() && self.keywords.iter().any(|k| lower.contains(k.as_str())) {
                debug!("MetadataExtractor: {} from markup: '{}'", self.name, text);
                return Some(text);
            }
        }
        None
    }
}

/// Resolves serving count and prep/cook times, structured data first
pub struct MetadataExtractor {
    reader: JsonLdReader,
    serving: Probe,
    prep: Probe,
    cook: Probe,
}

impl MetadataExtractor {
    pub fn new(rules: &MetadataRules) -> Result<Self, ExtractError> {
        Ok(Self {
            reader: JsonLdReader::new()?,
            serving: Probe::new("serving count", &rules.serving_selectors, &rules.serving_keywords)?,
            prep: Probe::new("prep time", &rules.prep_selectors, &rules.prep_keywords)?,
            cook: Probe::new("cook time", &rules.cook_selectors, &rules.cook_keywords)?,
        })
    }

    pub fn extract(&self, context: &ParsingContext) -> RecipeMetadata {
        let data = self.reader.read(context);
        self.resolve(context, &data)
    }

    fn resolve(&self, context: &ParsingContext, data: &StructuredData) -> RecipeMetadata {
        let serving_count = data.serving_count().or_else(|| {
            self.serving
                .find(context)
                .map(|text| first_digit_run(&text).unwrap_or(&text).to_string())
        });
        let prep_time = data
            .prep_time()
            .map(str::to_string)
            .or_else(|| self.prep.find(context));
        let cook_time = data
            .cook_time()
            .map(str::to_string)
            .or_else(|| self.cook.find(context));

        RecipeMetadata {
            serving_count: or_not_available(serving_count),
            prep_time: or_not_available(prep_time.map(|t| clean_time(&t))),
            cook_time: or_not_available(cook_time.map(|t| clean_time(&t))),
        }
    }
}

/// Strip the ISO-8601 `PT` prefix and normalize whitespace
pub fn clean_time(time: &str) -> String {
    let time = time.trim();
    collapse_whitespace(time.strip_prefix("PT").unwrap_or(time))
}

fn or_not_available(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
