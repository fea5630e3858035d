use super::Extractor;
use crate::config::RuleSet;
use crate::document::{compile_selectors, element_text, is_within, ParsingContext};
use crate::error::ExtractError;
use crate::model::{CandidateLine, ListField, Strategy};
use log::debug;
use scraper::{ElementRef, Selector};

/// Tries known recipe-plugin and microdata selectors in priority order.
///
/// The first selector that matches anything wins; later selectors are never
/// merged in.
pub struct FallbackMatcher {
    field: ListField,
    selectors: Vec<(String, Selector)>,
    items: Vec<Selector>,
}

impl FallbackMatcher {
    pub fn new(field: ListField, rules: &RuleSet) -> Result<Self, ExtractError> {
        let (selectors, items) = match field {
            ListField::Ingredients => (
                &rules.ingredients.fallback_selectors,
                &rules.ingredients.item_selectors,
            ),
            ListField::Instructions => (
                &rules.instructions.fallback_selectors,
                &rules.instructions.item_selectors,
            ),
        };

        Ok(Self {
            field,
            selectors: selectors
                .iter()
                .cloned()
                .zip(compile_selectors(selectors)?)
                .collect(),
            items: compile_selectors(items)?,
        })
    }

    /// Item texts for a matched container, or the element's own text for a leaf
    fn expand<'a>(&self, element: ElementRef<'a>) -> Vec<CandidateLine<'a>> {
        for selector in &self.items {
            let items: Vec<_> = element.select(selector).collect();
            if !items.is_empty() {
                return items
                    .into_iter()
                    .map(|item| {
                        CandidateLine::new(element_text(item), Strategy::FallbackSelector, Some(item))
                    })
                    .collect();
            }
        }
        vec![CandidateLine::new(
            element_text(element),
            Strategy::FallbackSelector,
            Some(element),
        )]
    }
}

impl Extractor for FallbackMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::FallbackSelector
    }

    fn candidates<'a>(&self, context: &'a ParsingContext) -> Vec<CandidateLine<'a>> {
        for (raw, selector) in &self.selectors {
            let matches = context.matches(selector);
            if matches.is_empty() {
                continue;
            }

            let mut taken: Vec<ElementRef<'a>> = Vec::new();
            let mut candidates = Vec::new();
            for element in matches {
                if taken.iter().any(|outer| is_within(element, *outer)) {
                    continue;
                }
                taken.push(element);
                candidates.extend(self.expand(element));
            }

            debug!(
                "FallbackMatcher: selector '{}' gave {} {} candidate(s)",
                raw,
                candidates.len(),
                self.field.as_str()
            );
            return candidates;
        }

        debug!("FallbackMatcher: no {} selector matched", self.field.as_str());
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(field: ListField, html: &str) -> Vec<String> {
        let context = ParsingContext::new("https://example.com/recipe", html);
        let matcher = FallbackMatcher::new(field, &RuleSet::default()).unwrap();
        matcher
            .candidates(&context)
            .into_iter()
            .map(|c| c.text.trim().to_string())
            .collect()
    }

    #[test]
    fn test_microdata_wins_over_class_names() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Recipe">
                <span itemprop="recipeIngredient">2 cups flour</span>
                <span itemprop="recipeIngredient">1 cup sugar</span>
            </div>
            <ul class="ingredients"><li>ignored</li></ul>
        "#;
        assert_eq!(
            texts(ListField::Ingredients, html),
            vec!["2 cups flour", "1 cup sugar"]
        );
    }

    #[test]
    fn test_plugin_selector() {
        let html = r#"
            <ul class="wprm-recipe-ingredients">
                <li class="wprm-recipe-ingredient">1 tsp vanilla</li>
                <li class="wprm-recipe-ingredient">3 eggs</li>
            </ul>
        "#;
        assert_eq!(
            texts(ListField::Ingredients, html),
            vec!["1 tsp vanilla", "3 eggs"]
        );
    }

    #[test]
    fn test_container_match_yields_items_and_skips_nested_matches() {
        let html = r#"
            <div class="recipe-steps">
                <ol>
                    <li class="step">Preheat the oven to 350°F.</li>
                    <li class="step">Bake for 20 minutes.</li>
                </ol>
            </div>
        "#;
        assert_eq!(
            texts(ListField::Instructions, html),
            vec!["Preheat the oven to 350°F.", "Bake for 20 minutes."]
        );
    }

    #[test]
    fn test_leaf_match_yields_own_text() {
        let html = r#"
            <div class="directions"><ul><li>Stir the sauce often.</li></ul></div>
        "#;
        assert_eq!(
            texts(ListField::Instructions, html),
            vec!["Stir the sauce often."]
        );
    }

    #[test]
    fn test_nothing_matches() {
        assert!(texts(ListField::Ingredients, "<p>Hello</p>").is_empty());
    }
}
