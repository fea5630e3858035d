use crate::config::RuleSet;
use crate::document::ParsingContext;
use crate::error::ExtractError;
use crate::extractors::{Extractor, FallbackMatcher, HeaderLocator, JsonLdExtractor, ParagraphScanner};
use crate::model::{ListField, Verdict};
use crate::text::{Classifier, IngredientClassifier, InstructionClassifier, Normalizer};
use log::{debug, info};

/// Runs the strategies for one list field in priority order.
///
/// Every candidate is normalized and classified; the first strategy with at
/// least one accepted line wins and the rest are skipped.
pub struct ListPipeline {
    field: ListField,
    extractors: Vec<Box<dyn Extractor>>,
    normalizer: Normalizer,
    classifier: Box<dyn Classifier>,
    cap: usize,
}

impl ListPipeline {
    pub fn ingredients(rules: &RuleSet) -> Result<Self, ExtractError> {
        let field = ListField::Ingredients;
        Ok(Self {
            field,
            extractors: vec![
                Box::new(JsonLdExtractor::new(field)?),
                Box::new(HeaderLocator::new(field, rules)?),
                Box::new(FallbackMatcher::new(field, rules)?),
            ],
            normalizer: Normalizer::new(&rules.shared.bullet_chars)?,
            classifier: Box::new(IngredientClassifier::new(
                &rules.ingredients,
                &rules.shared.bullet_chars,
            )?),
            cap: rules.ingredients.cap,
        })
    }

    pub fn instructions(rules: &RuleSet) -> Result<Self, ExtractError> {
        let field = ListField::Instructions;
        Ok(Self {
            field,
            extractors: vec![
                Box::new(JsonLdExtractor::new(field)?),
                Box::new(HeaderLocator::new(field, rules)?),
                Box::new(FallbackMatcher::new(field, rules)?),
                Box::new(ParagraphScanner::new(&rules.instructions.paragraph)?),
            ],
            normalizer: Normalizer::new(&rules.shared.bullet_chars)?,
            classifier: Box::new(InstructionClassifier::new(&rules.instructions)?),
            cap: rules.instructions.cap,
        })
    }

    pub fn field(&self) -> ListField {
        self.field
    }

    pub fn run(&self, context: &ParsingContext) -> Vec<String> {
        for extractor in &self.extractors {
            let strategy = extractor.strategy();
            let candidates = extractor.candidates(context);

            let mut accepted: Vec<String> = candidates
                .iter()
                .filter_map(|candidate| {
                    let line = self.normalizer.normalize(&candidate.text, self.field);
                    match self.classifier.classify(&line) {
                        Verdict::Accept => Some(line),
                        Verdict::Reject(reason) => {
                            debug!(
                                "{} rejected '{}' from {}: {}",
                                self.field.as_str(),
                                line,
                                strategy.as_str(),
                                reason
                            );
                            None
                        }
                    }
                })
                .collect();

            if !accepted.is_empty() {
                info!(
                    "Extracted {} {} with {} from {}",
                    accepted.len(),
                    self.field.as_str(),
                    strategy.as_str(),
                    context.url
                );
                accepted.truncate(self.cap);
                return accepted;
            }
            debug!(
                "{}: {} produced nothing usable ({} candidate(s))",
                self.field.as_str(),
                strategy.as_str(),
                candidates.len()
            );
        }

        info!("No {} found at {}", self.field.as_str(), context.url);
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pipeline: &ListPipeline, html: &str) -> Vec<String> {
        let context = ParsingContext::new("https://example.com/recipe", html);
        pipeline.run(&context)
    }

    #[test]
    fn test_structured_data_short_circuits_header() {
        let pipeline = ListPipeline::ingredients(&RuleSet::default()).unwrap();
        let html = r#"
            <script type="application/ld+json">{"@type": "Recipe", "recipeIngredient": ["2 cups flour", "1 tsp salt"]}</script>
            <h2>Ingredients</h2>
            <ul><li>5 cups sugar</li></ul>
        "#;
        assert_eq!(run(&pipeline, html), vec!["2 cups flour", "1 tsp salt"]);
    }

    #[test]
    fn test_rejected_strategy_falls_through() {
        let pipeline = ListPipeline::ingredients(&RuleSet::default()).unwrap();
        // Structured data only holds lines the classifier turns down
        let html = r#"
            <script type="application/ld+json">{"@type": "Recipe", "recipeIngredient": ["Preheat the oven."]}</script>
            <h2>Ingredients</h2>
            <ul><li>½ cup milk</li><li>Bake until done</li><li>2 large eggs</li></ul>
        "#;
        assert_eq!(run(&pipeline, html), vec!["1/2 cup milk", "2 large eggs"]);
    }

    #[test]
    fn test_cap_is_applied() {
        let mut rules = RuleSet::default();
        rules.instructions.cap = 20;
        let pipeline = ListPipeline::instructions(&rules).unwrap();
        let items: String = (1..=30)
            .map(|i| format!("<li>Stir the pot gently for {i} minutes.</li>"))
            .collect();
        let html = format!("<h2>Instructions</h2><ol>{items}</ol>");

        let instructions = run(&pipeline, &html);
        assert_eq!(instructions.len(), 20);
        assert_eq!(instructions[0], "Stir the pot gently for 1 minutes");
        assert_eq!(instructions[19], "Stir the pot gently for 20 minutes");
    }

    #[test]
    fn test_list_counter_captured_as_text_is_removed() {
        let pipeline = ListPipeline::instructions(&RuleSet::default()).unwrap();
        let html = r#"
            <h2>Instructions</h2>
            <ol><li><span>1.</span> 1. Whisk the eggs and sugar together</li></ol>
        "#;
        assert_eq!(run(&pipeline, html), vec!["Whisk the eggs and sugar together"]);
    }

    #[test]
    fn test_paragraph_scan_is_last_resort() {
        let pipeline = ListPipeline::instructions(&RuleSet::default()).unwrap();
        let html = r#"
            <article>
                <p>Preheat the grill and season the steaks generously with salt and pepper.</p>
                <p>Thanks for reading my blog, see you next week for another recipe!</p>
            </article>
        "#;
        assert_eq!(
            run(&pipeline, html),
            vec!["Preheat the grill and season the steaks generously with salt and pepper"]
        );
    }

    #[test]
    fn test_empty_page_yields_empty_list() {
        let pipeline = ListPipeline::instructions(&RuleSet::default()).unwrap();
        assert!(run(&pipeline, "<html><body></body></html>").is_empty());
        assert_eq!(pipeline.field(), ListField::Instructions);
    }

    #[test]
    fn test_deterministic() {
        let pipeline = ListPipeline::ingredients(&RuleSet::default()).unwrap();
        let html = r#"<h2>Ingredients</h2><ul><li>1 cup flour</li><li>2 eggs</li></ul>"#;
        assert_eq!(run(&pipeline, html), run(&pipeline, html));
    }
}
