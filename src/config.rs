use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration for the extractor
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExtractorConfig {
    /// HTTP fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Keyword, selector and limit tables used by every strategy
    #[serde(default)]
    pub rules: RuleSet,
}

/// Settings for the page fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header sent with every page request
    pub user_agent: String,
    /// Request timeout in seconds. `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Every keyword list, selector list and numeric bound the engine uses.
///
/// Defaults reproduce the built-in English rule set; a TOML file can replace
/// any list to tune or localize extraction.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RuleSet {
    pub shared: SharedRules,
    pub title: TitleRules,
    pub ingredients: IngredientRules,
    pub instructions: InstructionRules,
    pub metadata: MetadataRules,
}

/// Rules shared by the ingredient and instruction pipelines
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SharedRules {
    /// Selectors for elements that may introduce a section
    pub heading_selectors: Vec<String>,
    /// Glyphs used as list bullets in scraped text
    pub bullet_chars: Vec<String>,
}

impl Default for SharedRules {
    fn default() -> Self {
        Self {
            heading_selectors: strings(&[
                "h1",
                "h2",
                "h3",
                "h4",
                "h5",
                "h6",
                "[class*=\"heading\"]",
                "[class*=\"title\"]",
                "[class*=\"header\"]",
            ]),
            bullet_chars: strings(&["▢", "•", "*"]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TitleRules {
    /// Tried in order; the first element with non-empty text wins
    pub selectors: Vec<String>,
}

impl Default for TitleRules {
    fn default() -> Self {
        Self {
            selectors: strings(&[
                "h1[class*=\"recipe\"]",
                "h1[class*=\"title\"]",
                ".recipe-title",
                ".recipe-name",
                "h1",
            ]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngredientRules {
    /// A heading whose lower-cased text contains one of these names the section
    pub header_keywords: Vec<String>,
    /// Elements that can hold the ingredient list after a heading
    pub container_selector: String,
    /// Item selectors tried in order inside a located container
    pub item_selectors: Vec<String>,
    /// Known template selectors, highest priority first
    pub fallback_selectors: Vec<String>,
    /// Lines containing any of these read like instructions
    pub rejection_words: Vec<String>,
    /// Foodstuff names that mark a line as an ingredient
    pub foodstuff_words: Vec<String>,
    pub measurement_units: Vec<String>,
    /// Whole-line labels accepted as list entries
    pub section_labels: Vec<String>,
    pub fraction_glyphs: Vec<String>,
    pub min_length: usize,
    pub max_length: usize,
    /// Maximum number of ingredients returned
    pub cap: usize,
}

impl Default for IngredientRules {
    fn default() -> Self {
        Self {
            header_keywords: strings(&["ingredient"]),
            container_selector: "ul, ol".to_string(),
            item_selectors: strings(&["li"]),
            fallback_selectors: strings(&[
                "[itemtype*=\"Recipe\"] [itemprop=\"recipeIngredient\"]",
                "[itemprop=\"recipeIngredient\"]",
                ".wprm-recipe-ingredient",
                ".ingredients li",
                ".ingredient-list li",
                ".recipe-ingredients li",
                "[class*=\"recipe-ingredient\"]",
                "[class*=\"ingredient\"]",
            ]),
            rejection_words: strings(&[
                "instructions",
                "directions",
                "method",
                "preparation",
                "steps",
                "thaw",
                "freeze",
                "bake",
                "cook",
                "preheat",
                "oven",
                "temperature",
                "minutes",
                "hours",
                "time",
                "until",
                "then",
                "next",
                "first",
                "remove",
                "place",
                "cover",
                "let",
                "wait",
                "set",
                "timer",
            ]),
            foodstuff_words: strings(&[
                "butter",
                "sugar",
                "flour",
                "salt",
                "eggs",
                "milk",
                "oil",
                "vanilla",
                "chocolate",
                "cheese",
                "meat",
                "vegetable",
                "fruit",
                "baking",
                "powder",
                "soda",
            ]),
            measurement_units: strings(&[
                "cup",
                "cups",
                "tablespoon",
                "tablespoons",
                "tbsp",
                "teaspoon",
                "teaspoons",
                "tsp",
                "ounce",
                "ounces",
                "oz",
                "pound",
                "pounds",
                "lb",
                "lbs",
                "gram",
                "grams",
                "g",
                "kg",
                "ml",
                "l",
            ]),
            section_labels: strings(&["ingredients", "ingredient"]),
            fraction_glyphs: default_fraction_glyphs(),
            min_length: 3,
            max_length: 100,
            cap: 50,
        }
    }
}

/// A keyword that is only rejected in some contexts
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ContextualKeyword {
    pub keyword: String,
    /// Phrases in which the keyword is harmless
    pub allow_phrases: Vec<String>,
    /// Phrases in which the keyword marks non-instruction text
    pub block_phrases: Vec<String>,
    /// Reject a line that consists of the keyword alone (optionally with a colon)
    pub block_bare: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstructionRules {
    pub header_keywords: Vec<String>,
    pub container_selector: String,
    pub item_selectors: Vec<String>,
    pub fallback_selectors: Vec<String>,
    /// Lines containing any of these are nutrition, timing or disclaimer noise
    pub non_instruction_words: Vec<String>,
    pub contextual_keywords: Vec<ContextualKeyword>,
    /// Sponsorship phrasing; the bare token "ad" is always checked as well
    pub advertisement_words: Vec<String>,
    pub action_words: Vec<String>,
    pub cooking_verbs: Vec<String>,
    pub measurement_units: Vec<String>,
    pub min_length: usize,
    pub min_words: usize,
    /// Inclusive length window an accepted instruction must fall in
    pub accept_min_length: usize,
    pub accept_max_length: usize,
    /// Maximum number of instructions returned
    pub cap: usize,
    pub paragraph: ParagraphRules,
}

impl Default for InstructionRules {
    fn default() -> Self {
        Self {
            header_keywords: strings(&[
                "instructions",
                "directions",
                "method",
                "preparation",
                "steps",
                "how to",
            ]),
            container_selector: "ul, ol, div, section".to_string(),
            item_selectors: strings(&[
                ".wprm-recipe-instruction .wprm-recipe-instruction-text",
                "li, p",
            ]),
            fallback_selectors: strings(&[
                ".wprm-recipe-instruction .wprm-recipe-instruction-text",
                "[itemtype*=\"Recipe\"] [itemprop=\"recipeInstructions\"]",
                "[itemprop=\"recipeInstructions\"]",
                ".instructions li",
                ".instruction-list li",
                ".recipe-instructions li",
                ".directions li",
                ".method li",
                ".steps li",
                "[class*=\"instruction\"]",
                "[class*=\"direction\"]",
                "[class*=\"step\"]",
            ]),
            non_instruction_words: strings(&[
                "nutrition",
                "calories",
                "protein",
                "fat",
                "carbohydrates",
                "prep time",
                "cook time",
                "total time",
                "yield",
                "serves",
                "difficulty",
                "affiliate links",
                "disclosure policy",
                "this post may contain",
                "please read our",
            ]),
            contextual_keywords: vec![
                ContextualKeyword {
                    keyword: "ingredients".to_string(),
                    allow_phrases: strings(&[
                        "dressing ingredients",
                        "following ingredients",
                        "remaining ingredients",
                        "all ingredients",
                    ]),
                    block_phrases: Vec::new(),
                    block_bare: true,
                },
                ContextualKeyword {
                    keyword: "serving".to_string(),
                    allow_phrases: strings(&[
                        "serve immediately",
                        "serving any",
                        "serving alongside",
                        "before serving",
                    ]),
                    block_phrases: strings(&["serving size", "servings per", "per serving"]),
                    block_bare: true,
                },
            ],
            advertisement_words: strings(&["advertisement", "sponsored", "promotion", "commercial"]),
            action_words: strings(&[
                "preheat", "mix", "combine", "add", "stir", "beat", "whisk", "fold", "pour",
                "bake", "cook", "heat", "simmer", "boil", "fry", "grill", "roast", "place",
                "remove", "cool", "serve", "garnish", "sprinkle", "drizzle", "spread", "roll",
                "cut", "slice", "chop", "dice", "mince", "grate", "peel", "lower",
            ]),
            cooking_verbs: strings(&[
                "prepare", "combine", "mix", "add", "season", "toss", "drizzle", "serve",
                "whisk", "bake", "cook", "heat", "stir", "beat", "fold", "pour", "place",
                "remove", "cool", "garnish", "sprinkle",
            ]),
            measurement_units: strings(&[
                "cup",
                "cups",
                "tablespoon",
                "teaspoon",
                "ounce",
                "pound",
                "gram",
                "minute",
                "hour",
            ]),
            min_length: 10,
            min_words: 3,
            accept_min_length: 20,
            accept_max_length: 1000,
            cap: 50,
            paragraph: ParagraphRules::default(),
        }
    }
}

/// Last-resort free text scan for instructions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParagraphRules {
    pub selector: String,
    pub min_length: usize,
    pub max_length: usize,
    pub keywords: Vec<String>,
    pub limit: usize,
}

impl Default for ParagraphRules {
    fn default() -> Self {
        Self {
            selector: "p, div".to_string(),
            min_length: 50,
            max_length: 500,
            keywords: strings(&[
                "preheat", "combine", "prepare", "season", "sear", "roast", "rest", "slice",
                "serve",
            ]),
            limit: 10,
        }
    }
}

/// Heuristic selectors for serving and timing metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetadataRules {
    pub serving_selectors: Vec<String>,
    pub serving_keywords: Vec<String>,
    pub prep_selectors: Vec<String>,
    pub prep_keywords: Vec<String>,
    pub cook_selectors: Vec<String>,
    pub cook_keywords: Vec<String>,
}

impl Default for MetadataRules {
    fn default() -> Self {
        Self {
            serving_selectors: strings(&[
                "[class*=\"serving\"]",
                "[class*=\"yield\"]",
                "[class*=\"portion\"]",
                "[data-testid*=\"serving\"]",
                "[data-testid*=\"yield\"]",
            ]),
            serving_keywords: strings(&["serving", "portion", "yield"]),
            prep_selectors: strings(&[
                "[class*=\"prep\"]",
                "[class*=\"preparation\"]",
                "[data-testid*=\"prep\"]",
                "time[datetime*=\"PT\"]",
            ]),
            prep_keywords: strings(&["prep", "preparation"]),
            cook_selectors: strings(&[
                "[class*=\"cook\"]",
                "[class*=\"bake\"]",
                "[class*=\"total\"]",
                "[data-testid*=\"cook\"]",
                "time[datetime*=\"PT\"]",
            ]),
            cook_keywords: strings(&["cook", "bake", "total"]),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_fraction_glyphs() -> Vec<String> {
    strings(&[
        "½", "⅓", "⅔", "¼", "¾", "⅕", "⅖", "⅗", "⅘", "⅙", "⅚", "⅐", "⅛", "⅜", "⅝", "⅞", "⅑", "⅒",
    ])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ExtractorConfig {
    /// Load configuration from `recipe_extract.toml` and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_EXTRACT__ prefix
    /// 2. recipe_extract.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_EXTRACT__FETCH__USER_AGENT.
    /// Rule lists take `;`-separated items, e.g.
    /// RECIPE_EXTRACT__RULES__INSTRUCTIONS__HEADER_KEYWORDS="zubereitung;anleitung"
    pub fn load() -> Result<Self, ConfigError> {
        load_config(None)
    }

    /// Same as [`ExtractorConfig::load`] but reads the given file, which must exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        load_config(Some(path))
    }
}

/// Separates items of a list-valued environment variable,
/// e.g. `RECIPE_EXTRACT__RULES__INGREDIENTS__SECTION_LABELS="zutaten;ingredients"`
const LIST_SEPARATOR: &str = ";";

/// Rule lists that can be replaced from the environment. Contextual keywords
/// are structured and can only be set in the TOML file.
const LIST_KEYS: &[&str] = &[
    "rules.shared.heading_selectors",
    "rules.shared.bullet_chars",
    "rules.title.selectors",
    "rules.ingredients.header_keywords",
    "rules.ingredients.item_selectors",
    "rules.ingredients.fallback_selectors",
    "rules.ingredients.rejection_words",
    "rules.ingredients.foodstuff_words",
    "rules.ingredients.measurement_units",
    "rules.ingredients.section_labels",
    "rules.ingredients.fraction_glyphs",
    "rules.instructions.header_keywords",
    "rules.instructions.item_selectors",
    "rules.instructions.fallback_selectors",
    "rules.instructions.non_instruction_words",
    "rules.instructions.advertisement_words",
    "rules.instructions.action_words",
    "rules.instructions.cooking_verbs",
    "rules.instructions.measurement_units",
    "rules.instructions.paragraph.keywords",
    "rules.metadata.serving_selectors",
    "rules.metadata.serving_keywords",
    "rules.metadata.prep_selectors",
    "rules.metadata.prep_keywords",
    "rules.metadata.cook_selectors",
    "rules.metadata.cook_keywords",
];

fn load_config(path: Option<&Path>) -> Result<ExtractorConfig, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        // Optional config file (can be missing)
        None => File::with_name("recipe_extract").required(false),
    };

    // Use double underscore for nested: RECIPE_EXTRACT__FETCH__TIMEOUT_SECS
    let environment = LIST_KEYS.iter().fold(
        Environment::with_prefix("RECIPE_EXTRACT")
            .separator("__")
            .try_parsing(true)
            .list_separator(LIST_SEPARATOR),
        |env, key| env.with_list_parse_key(key),
    );

    let settings = Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    settings.try_deserialize()
}
