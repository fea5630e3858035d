use super::Extractor;
use crate::document::{compile_selector, first_digit_run, ParsingContext};
use crate::error::ExtractError;
use crate::model::{CandidateLine, ListField, Strategy};
use html_escape::decode_html_entities;
use log::debug;
use scraper::Selector;
use serde::Deserialize;
use serde_json::Value;
use std::convert::TryFrom;

const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

/// Reads every schema.org Recipe node embedded as JSON-LD
pub struct JsonLdReader {
    selector: Selector,
}

impl JsonLdReader {
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            selector: compile_selector(JSON_LD_SELECTOR)?,
        })
    }

    pub fn read(&self, context: &ParsingContext) -> StructuredData {
        let mut recipes = Vec::new();

        for (index, script) in context.matches(&self.selector).iter().enumerate() {
            let raw_json = script.inner_html();
            match parse_block(&raw_json) {
                Ok(nodes) => {
                    debug!(
                        "JsonLdReader: script {} yielded {} recipe node(s)",
                        index,
                        nodes.len()
                    );
                    recipes.extend(nodes);
                }
                Err(e) => {
                    debug!("JsonLdReader: failed to parse JSON-LD {}: {}", index, e);
                }
            }
        }

        StructuredData { recipes }
    }
}

/// Recipe nodes found on one page, in document order
#[derive(Debug, Default, Clone)]
pub struct StructuredData {
    recipes: Vec<RecipeNode>,
}

/// The parts of one schema.org Recipe node the engine cares about
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecipeNode {
    pub name: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub recipe_yield: Option<String>,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
}

impl StructuredData {
    pub fn recipes(&self) -> &[RecipeNode] {
        &self.recipes
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// First non-empty recipe name
    pub fn name(&self) -> Option<&str> {
        self.recipes.iter().find_map(|r| r.name.as_deref())
    }

    pub fn lines(&self, field: ListField) -> impl Iterator<Item = &str> {
        self.recipes.iter().flat_map(move |r| {
            let lines = match field {
                ListField::Ingredients => &r.ingredients,
                ListField::Instructions => &r.instructions,
            };
            lines.iter().map(String::as_str)
        })
    }

    /// Serving count from the last node that declares a yield
    pub fn serving_count(&self) -> Option<String> {
        let raw = last_value(&self.recipes, |r| r.recipe_yield.as_deref())?;
        Some(first_digit_run(raw).unwrap_or(raw).to_string())
    }

    pub fn prep_time(&self) -> Option<&str> {
        last_value(&self.recipes, |r| r.prep_time.as_deref())
    }

    pub fn cook_time(&self) -> Option<&str> {
        last_value(&self.recipes, |r| r.cook_time.as_deref())
    }
}

fn last_value<'a>(
    recipes: &'a [RecipeNode],
    get: impl Fn(&'a RecipeNode) -> Option<&'a str>,
) -> Option<&'a str> {
    recipes.iter().rev().find_map(get)
}

/// List strategy backed by structured data
pub struct JsonLdExtractor {
    reader: JsonLdReader,
    field: ListField,
}

impl JsonLdExtractor {
    pub fn new(field: ListField) -> Result<Self, ExtractError> {
        Ok(Self {
            reader: JsonLdReader::new()?,
            field,
        })
    }
}

impl Extractor for JsonLdExtractor {
    fn strategy(&self) -> Strategy {
        Strategy::StructuredData
    }

    fn candidates<'a>(&self, context: &'a ParsingContext) -> Vec<CandidateLine<'a>> {
        let data = self.reader.read(context);
        let candidates: Vec<_> = data
            .lines(self.field)
            .map(|line| CandidateLine::new(line, Strategy::StructuredData, None))
            .collect();
        debug!(
            "JsonLdExtractor: {} {} candidate(s) for {}",
            candidates.len(),
            self.field.as_str(),
            context.url
        );
        candidates
    }
}

fn parse_block(raw_json: &str) -> Result<Vec<RecipeNode>, serde_json::Error> {
    let json_ld: Value = serde_json::from_str(raw_json.trim())?;

    let mut nodes = Vec::new();
    for node in recipe_values(&json_ld) {
        match JsonLdRecipe::try_from(node) {
            Ok(recipe) => nodes.push(RecipeNode::from(recipe)),
            Err(e) => debug!("JsonLdReader: failed to convert recipe node: {}", e),
        }
    }
    Ok(nodes)
}

/// Recipe-typed values at the top level, in a top-level array, or in `@graph`
fn recipe_values(json_ld: &Value) -> Vec<&Value> {
    let roots: Vec<&Value> = match json_ld {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut found = Vec::new();
    for root in roots {
        if is_recipe_type(root) {
            found.push(root);
        }
        if let Some(Value::Array(graph)) = root.get("@graph") {
            found.extend(graph.iter().filter(|item| is_recipe_type(item)));
        }
    }
    found
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(type_str)) => type_str.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

fn decode_html_symbols(text: &str) -> String {
    // some sites double-encode entities
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

fn non_empty(text: &str) -> Option<String> {
    let decoded = decode_html_symbols(text.trim());
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    name: Option<TextValue>,
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<RecipeInstructions>,
    #[serde(rename = "recipeYield")]
    recipe_yield: Option<RecipeYield>,
    #[serde(rename = "prepTime")]
    prep_time: Option<TextValue>,
    #[serde(rename = "cookTime")]
    cook_time: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextValue {
    String(String),
    Other(Value),
}

impl TextValue {
    fn text(&self) -> Option<String> {
        match self {
            TextValue::String(s) => non_empty(s),
            TextValue::Other(Value::Number(n)) => Some(n.to_string()),
            TextValue::Other(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Multiple(Vec<TextValue>),
    Single(String),
    Other(Value),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeInstructions {
    String(String),
    Multiple(Vec<InstructionItem>),
    Single(InstructionItem),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InstructionItem {
    Text(String),
    Section(HowToSection),
    Step(HowToStep),
    Nested(Vec<InstructionItem>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct HowToSection {
    #[serde(rename = "itemListElement")]
    item_list_element: Vec<InstructionItem>,
}

#[derive(Debug, Deserialize)]
struct HowToStep {
    text: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    String(String),
    Number(serde_json::Number),
    Array(Vec<Value>),
    Other(Value),
}

impl RecipeYield {
    fn text(&self) -> Option<String> {
        match self {
            RecipeYield::String(s) => non_empty(s),
            RecipeYield::Number(n) => Some(n.to_string()),
            RecipeYield::Array(values) => {
                let parts: Vec<String> = values
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect();
                non_empty(&parts.join(","))
            }
            RecipeYield::Other(_) => None,
        }
    }
}

impl TryFrom<&Value> for JsonLdRecipe {
    type Error = serde_json::Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        serde_json::from_value(value.clone())
    }
}

fn flatten_instructions(item: InstructionItem, out: &mut Vec<String>) {
    match item {
        InstructionItem::Text(text) => out.extend(non_empty(&text)),
        InstructionItem::Section(section) => {
            for step in section.item_list_element {
                flatten_instructions(step, out);
            }
        }
        // Prefer text over name
        InstructionItem::Step(step) => out.extend(
            step.text
                .as_deref()
                .and_then(non_empty)
                .or_else(|| step.name.as_deref().and_then(non_empty)),
        ),
        InstructionItem::Nested(items) => {
            for item in items {
                flatten_instructions(item, out);
            }
        }
        InstructionItem::Other(_) => {}
    }
}

impl From<JsonLdRecipe> for RecipeNode {
    fn from(recipe: JsonLdRecipe) -> Self {
        let ingredients = match recipe.recipe_ingredient {
            Some(RecipeIngredients::Multiple(items)) => {
                items.iter().filter_map(TextValue::text).collect()
            }
            Some(RecipeIngredients::Single(item)) => non_empty(&item).into_iter().collect(),
            Some(RecipeIngredients::Other(_)) | None => Vec::new(),
        };

        let mut instructions = Vec::new();
        match recipe.recipe_instructions {
            Some(RecipeInstructions::String(text)) => instructions.extend(non_empty(&text)),
            Some(RecipeInstructions::Multiple(items)) => {
                for item in items {
                    flatten_instructions(item, &mut instructions);
                }
            }
            Some(RecipeInstructions::Single(item)) => {
                flatten_instructions(item, &mut instructions)
            }
            None => {}
        }

        RecipeNode {
            name: recipe.name.as_ref().and_then(TextValue::text),
            ingredients,
            instructions,
            recipe_yield: recipe.recipe_yield.as_ref().and_then(RecipeYield::text),
            prep_time: recipe.prep_time.as_ref().and_then(TextValue::text),
            cook_time: recipe.cook_time.as_ref().and_then(TextValue::text),
        }
    }
}
