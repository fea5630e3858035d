use std::time::Duration;

use log::debug;

use crate::config::{ExtractorConfig, FetchConfig, RuleSet};
use crate::document::ParsingContext;
use crate::error::ExtractError;
use crate::fetchers::{Fetcher, RequestFetcher};
use crate::model::{ListField, Recipe, RecipeMetadata};
use crate::pipelines::Engine;

/// Fetches recipe pages and runs the extraction engine over them.
///
/// Every call performs its own fetch and parse; nothing is shared between
/// calls except the compiled rules.
pub struct RecipeExtractor {
    engine: Engine,
    fetcher: Box<dyn Fetcher>,
}

impl RecipeExtractor {
    /// Create a new builder for configuring an extractor
    ///
    /// # Example
    /// ```
    /// use recipe_extract::RecipeExtractor;
    /// use std::time::Duration;
    ///
    /// let extractor = RecipeExtractor::builder()
    ///     .user_agent("MyRecipeBot/1.0")
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> RecipeExtractorBuilder {
        RecipeExtractorBuilder::default()
    }

    async fn load(&self, url: &str) -> Result<String, ExtractError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ExtractError::MissingUrl);
        }
        debug!("Fetching {}", url);
        self.fetcher.fetch(url).await
    }

    /// Extract the recipe title
    ///
    /// # Example
    /// ```no_run
    /// # async fn run() -> Result<(), recipe_extract::ExtractError> {
    /// use recipe_extract::RecipeExtractor;
    ///
    /// let extractor = RecipeExtractor::builder().build()?;
    /// let title = extractor.title("https://example.com/recipe").await?;
    /// println!("{title}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn title(&self, url: &str) -> Result<String, ExtractError> {
        let html = self.load(url).await?;
        let context = ParsingContext::new(url, &html);
        Ok(self.engine.title(&context))
    }

    pub async fn ingredients(&self, url: &str) -> Result<Vec<String>, ExtractError> {
        self.list(ListField::Ingredients, url).await
    }

    pub async fn instructions(&self, url: &str) -> Result<Vec<String>, ExtractError> {
        self.list(ListField::Instructions, url).await
    }

    pub async fn list(&self, field: ListField, url: &str) -> Result<Vec<String>, ExtractError> {
        let html = self.load(url).await?;
        let context = ParsingContext::new(url, &html);
        Ok(self.engine.list(field, &context))
    }

    pub async fn metadata(&self, url: &str) -> Result<RecipeMetadata, ExtractError> {
        let html = self.load(url).await?;
        let context = ParsingContext::new(url, &html);
        Ok(self.engine.metadata(&context))
    }

    /// Run all four field extractions concurrently.
    ///
    /// Fails if any one of them fails.
    pub async fn recipe(&self, url: &str) -> Result<Recipe, ExtractError> {
        let (title, ingredients, instructions, metadata) = tokio::join!(
            self.title(url),
            self.ingredients(url),
            self.instructions(url),
            self.metadata(url),
        );

        Ok(Recipe {
            title: title?,
            ingredients: ingredients?,
            instructions: instructions?,
            metadata: metadata?,
        })
    }
}

/// Builder for [`RecipeExtractor`]
#[derive(Default)]
pub struct RecipeExtractorBuilder {
    fetch: FetchConfig,
    rules: RuleSet,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    fetcher: Option<Box<dyn Fetcher>>,
}

impl RecipeExtractorBuilder {
    /// Use fetch settings and rules from a loaded configuration
    ///
    /// # Example
    /// ```
    /// use recipe_extract::{ExtractorConfig, RecipeExtractor};
    ///
    /// let config = ExtractorConfig::default();
    /// let extractor = RecipeExtractor::builder().config(config).build();
    /// assert!(extractor.is_ok());
    /// ```
    pub fn config(mut self, config: ExtractorConfig) -> Self {
        self.fetch = config.fetch;
        self.rules = config.rules;
        self
    }

    /// Replace the keyword, selector and limit tables
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Use a custom fetcher instead of plain HTTP.
    /// User agent and timeout settings are then ignored.
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Compile the rules and set up the fetcher
    pub fn build(self) -> Result<RecipeExtractor, ExtractError> {
        let engine = Engine::new(&self.rules)?;

        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let timeout = self.timeout.or_else(|| self.fetch.timeout());
                let user_agent = self.user_agent.unwrap_or(self.fetch.user_agent);
                Box::new(RequestFetcher::new(&user_agent, timeout)?)
            }
        };

        Ok(RecipeExtractor { engine, fetcher })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticFetcher {
        html: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.clone())
        }
    }

    fn extractor(html: &str) -> (RecipeExtractor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let extractor = RecipeExtractor::builder()
            .fetcher(StaticFetcher {
                html: html.to_string(),
                calls: Arc::clone(&calls),
            })
            .build()
            .unwrap();
        (extractor, calls)
    }

    #[tokio::test]
    async fn test_blank_url_is_rejected_before_fetching() {
        let (extractor, calls) = extractor("<html></html>");
        let result = extractor.ingredients("   ").await;
        assert!(matches!(result, Err(ExtractError::MissingUrl)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_recipe_runs_every_field() {
        let html = r#"
            <html><head><title>Toast</title></head><body>
                <h2>Ingredients</h2><ul><li>2 slices bread</li><li>1 tbsp butter</li></ul>
                <h2>Steps</h2><ol><li>Toast the bread, then spread with butter.</li></ol>
            </body></html>
        "#;
        let (extractor, calls) = extractor(html);
        let recipe = extractor.recipe("https://example.com/toast").await.unwrap();

        assert_eq!(recipe.title, "Toast");
        assert_eq!(recipe.ingredients, vec!["2 slices bread", "1 tbsp butter"]);
        assert_eq!(recipe.instructions, vec!["Toast the bread, then spread with butter"]);
        assert_eq!(recipe.metadata, RecipeMetadata::default());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_build_rejects_bad_rules() {
        let mut rules = RuleSet::default();
        rules.instructions.paragraph.selector = ">>".to_string();
        assert!(RecipeExtractor::builder().rules(rules).build().is_err());
    }
}
