//! Recipe extraction from arbitrary recipe web pages.
//!
//! Each field (title, ingredients, instructions, metadata) is extracted by
//! walking a fixed cascade of strategies: embedded JSON-LD, section headings,
//! known template selectors and, for instructions, a free-text scan. Every
//! candidate line is normalized and then accepted or rejected by a
//! field-specific classifier.
//!
//! # Example
//! ```no_run
//! # async fn run() -> Result<(), recipe_extract::ExtractError> {
//! let ingredients = recipe_extract::extract_ingredients("https://example.com/recipe").await?;
//! for line in ingredients {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod model;
pub mod pipelines;
pub mod text;

pub use api::{handle, handle_all, CombinedResponse, ExtractionRequest, ExtractionResponse};
pub use builder::{RecipeExtractor, RecipeExtractorBuilder};
pub use config::{ExtractorConfig, RuleSet};
pub use error::ExtractError;
pub use fetchers::{Fetcher, RequestFetcher};
pub use model::{Field, ListField, Recipe, RecipeMetadata, NOT_AVAILABLE};
pub use pipelines::Engine;

/// Extract the recipe title using the default rules
pub async fn extract_title(url: &str) -> Result<String, ExtractError> {
    RecipeExtractor::builder().build()?.title(url).await
}

/// Extract the ingredient list using the default rules
pub async fn extract_ingredients(url: &str) -> Result<Vec<String>, ExtractError> {
    RecipeExtractor::builder().build()?.ingredients(url).await
}

/// Extract the instruction list using the default rules
pub async fn extract_instructions(url: &str) -> Result<Vec<String>, ExtractError> {
    RecipeExtractor::builder().build()?.instructions(url).await
}

/// Extract serving count and prep/cook times using the default rules
pub async fn extract_metadata(url: &str) -> Result<RecipeMetadata, ExtractError> {
    RecipeExtractor::builder().build()?.metadata(url).await
}

/// Extract every field using the default rules
pub async fn extract_recipe(url: &str) -> Result<Recipe, ExtractError> {
    RecipeExtractor::builder().build()?.recipe(url).await
}
