use super::Extractor;
use crate::config::RuleSet;
use crate::document::{
    compile_selector, compile_selector_group, compile_selectors, element_text, elements_after,
    is_within, next_element_sibling, parent_element, ParsingContext,
};
use crate::error::ExtractError;
use crate::model::{CandidateLine, ListField, Strategy};
use log::debug;
use scraper::{ElementRef, Selector};

/// Finds headings that name a section and reads the list that follows them
pub struct HeaderLocator {
    field: ListField,
    headings: Selector,
    keywords: Vec<String>,
    container: Selector,
    items: Vec<Selector>,
}

impl HeaderLocator {
    pub fn new(field: ListField, rules: &RuleSet) -> Result<Self, ExtractError> {
        let (keywords, container, items) = match field {
            ListField::Ingredients => (
                &rules.ingredients.header_keywords,
                &rules.ingredients.container_selector,
                &rules.ingredients.item_selectors,
            ),
            ListField::Instructions => (
                &rules.instructions.header_keywords,
                &rules.instructions.container_selector,
                &rules.instructions.item_selectors,
            ),
        };

        Ok(Self {
            field,
            headings: compile_selector_group(&rules.shared.heading_selectors)?,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            container: compile_selector(container)?,
            items: compile_selectors(items)?,
        })
    }

    fn is_section_heading(&self, heading: ElementRef<'_>) -> bool {
        let text = element_text(heading).to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Item elements of the block that belongs to `heading`
    fn locate<'a>(&self, context: &'a ParsingContext, heading: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        // Tier 1: the block right after the heading
        if let Some(sibling) = next_element_sibling(heading) {
            if self.container.matches(&sibling) {
                let items = self.items_in(sibling);
                if !items.is_empty() {
                    debug!("HeaderLocator: found items in next sibling");
                    return items;
                }
            }
        }

        // Tier 2: the first block inside the heading's parent
        if let Some(parent) = parent_element(heading) {
            let container = parent
                .select(&self.container)
                .find(|el| !is_within(*el, heading));
            if let Some(container) = container {
                let items = self.items_in(container);
                if !items.is_empty() {
                    debug!("HeaderLocator: found items in parent block");
                    return items;
                }
            }
        }

        // Tier 3: the first block anywhere after the heading
        if let Some(container) =
            elements_after(&context.document, heading).find(|el| self.container.matches(el))
        {
            let items = self.items_in(container);
            if !items.is_empty() {
                debug!("HeaderLocator: found items later in the document");
                return items;
            }
        }

        Vec::new()
    }

    fn items_in<'a>(&self, container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        for selector in &self.items {
            let items: Vec<_> = container.select(selector).collect();
            if !items.is_empty() {
                return items;
            }
        }
        Vec::new()
    }
}

impl Extractor for HeaderLocator {
    fn strategy(&self) -> Strategy {
        Strategy::HeaderLocator
    }

    fn candidates<'a>(&self, context: &'a ParsingContext) -> Vec<CandidateLine<'a>> {
        let mut candidates = Vec::new();

        for heading in context.matches(&self.headings) {
            if !self.is_section_heading(heading) {
                continue;
            }
            debug!(
                "HeaderLocator: {} heading '{}'",
                self.field.as_str(),
                element_text(heading).trim()
            );
            candidates.extend(self.locate(context, heading).into_iter().map(|item| {
                CandidateLine::new(element_text(item), Strategy::HeaderLocator, Some(item))
            }));
        }

        debug!(
            "HeaderLocator: {} {} candidate(s)",
            candidates.len(),
            self.field.as_str()
        );
        candidates
    }
}
