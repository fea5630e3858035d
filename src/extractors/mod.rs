use crate::document::ParsingContext;
use crate::model::{CandidateLine, Strategy};

mod fallback;
mod header;
mod json_ld;
mod metadata;
mod paragraph;
mod title;

pub use fallback::FallbackMatcher;
pub use header::HeaderLocator;
pub use json_ld::{JsonLdExtractor, JsonLdReader, RecipeNode, StructuredData};
pub use metadata::MetadataExtractor;
pub use paragraph::ParagraphScanner;
pub use title::TitleExtractor;

/// A strategy that produces raw candidate lines for one list field.
///
/// Candidates are unvalidated; the pipeline normalizes and classifies them.
pub trait Extractor: Send + Sync {
    fn strategy(&self) -> Strategy;
    fn candidates<'a>(&self, context: &'a ParsingContext) -> Vec<CandidateLine<'a>>;
}
