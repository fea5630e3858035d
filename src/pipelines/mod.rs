mod list;

pub use list::ListPipeline;

use crate::config::RuleSet;
use crate::document::ParsingContext;
use crate::error::ExtractError;
use crate::extractors::{MetadataExtractor, TitleExtractor};
use crate::model::{ListField, RecipeMetadata};

/// All field pipelines, compiled once from a rule set
pub struct Engine {
    title: TitleExtractor,
    ingredients: ListPipeline,
    instructions: ListPipeline,
    metadata: MetadataExtractor,
}

impl Engine {
    pub fn new(rules: &RuleSet) -> Result<Self, ExtractError> {
        Ok(Self {
            title: TitleExtractor::new(&rules.title)?,
            ingredients: ListPipeline::ingredients(rules)?,
            instructions: ListPipeline::instructions(rules)?,
            metadata: MetadataExtractor::new(&rules.metadata)?,
        })
    }

    pub fn title(&self, context: &ParsingContext) -> String {
        self.title.extract(context)
    }

    pub fn list(&self, field: ListField, context: &ParsingContext) -> Vec<String> {
        match field {
            ListField::Ingredients => self.ingredients.run(context),
            ListField::Instructions => self.instructions.run(context),
        }
    }

    pub fn ingredients(&self, context: &ParsingContext) -> Vec<String> {
        self.ingredients.run(context)
    }

    pub fn instructions(&self, context: &ParsingContext) -> Vec<String> {
        self.instructions.run(context)
    }

    pub fn metadata(&self, context: &ParsingContext) -> RecipeMetadata {
        self.metadata.extract(context)
    }
}
