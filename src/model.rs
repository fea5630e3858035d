use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used for metadata fields that could not be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// The four independently extractable parts of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Ingredients,
    Instructions,
    Metadata,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Ingredients => "ingredients",
            Field::Instructions => "instructions",
            Field::Metadata => "metadata",
        }
    }

    /// Human readable name used in response messages
    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "recipe title",
            Field::Ingredients => "ingredients",
            Field::Instructions => "instructions",
            Field::Metadata => "recipe metadata",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted as ordered lists of lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    Ingredients,
    Instructions,
}

impl ListField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListField::Ingredients => "ingredients",
            ListField::Instructions => "instructions",
        }
    }
}

/// Which strategy produced a candidate line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    StructuredData,
    HeaderLocator,
    FallbackSelector,
    ParagraphScan,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::StructuredData => "structured-data",
            Strategy::HeaderLocator => "header-locator",
            Strategy::FallbackSelector => "fallback-selector",
            Strategy::ParagraphScan => "paragraph-scan",
        }
    }
}

/// Unvalidated text produced by a strategy, with its provenance
#[derive(Debug, Clone)]
pub struct CandidateLine<'a> {
    pub text: String,
    pub strategy: Strategy,
    pub source: Option<ElementRef<'a>>,
}

impl<'a> CandidateLine<'a> {
    pub fn new(text: impl Into<String>, strategy: Strategy, source: Option<ElementRef<'a>>) -> Self {
        Self {
            text: text.into(),
            strategy,
            source,
        }
    }
}

/// Why a classifier turned a line down
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Empty,
    TooShort,
    TooLong,
    TooFewWords,
    /// Contains a keyword that belongs to another category
    Keyword(String),
    SentenceTerminal,
    Advertisement,
    /// Nothing about the line looks like the target category
    NoSignal,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Empty => f.write_str("empty"),
            RejectReason::TooShort => f.write_str("too short"),
            RejectReason::TooLong => f.write_str("too long"),
            RejectReason::TooFewWords => f.write_str("too few words"),
            RejectReason::Keyword(word) => write!(f, "contains '{word}'"),
            RejectReason::SentenceTerminal => f.write_str("sentence punctuation"),
            RejectReason::Advertisement => f.write_str("advertisement"),
            RejectReason::NoSignal => f.write_str("no category signal"),
        }
    }
}

/// Outcome of classifying one normalized line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Verdict::Accept => None,
            Verdict::Reject(reason) => Some(reason),
        }
    }
}

/// Serving and timing information, `"N/A"` when unresolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeMetadata {
    pub serving_count: String,
    pub prep_time: String,
    pub cook_time: String,
}

impl Default for RecipeMetadata {
    fn default() -> Self {
        Self {
            serving_count: NOT_AVAILABLE.to_string(),
            prep_time: NOT_AVAILABLE.to_string(),
            cook_time: NOT_AVAILABLE.to_string(),
        }
    }
}

/// A recipe composed from the four field extractions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub metadata: RecipeMetadata,
}
