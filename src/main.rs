use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{debug, error};
use serde::Serialize;

use recipe_extract::{api, ExtractionRequest, ExtractorConfig, Field, RecipeExtractor};

#[derive(Parser)]
#[command(
    name = "recipe-extract",
    version,
    about = "Extract title, ingredients, instructions and metadata from a recipe page"
)]
struct Cli {
    /// URL of the recipe page
    url: String,

    /// Which part of the recipe to extract
    #[arg(short, long, value_enum, default_value_t = FieldArg::All)]
    field: FieldArg,

    /// TOML file with fetch settings and extraction rules
    /// (defaults to ./recipe_extract.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Title,
    Ingredients,
    Instructions,
    Metadata,
    All,
}

impl FieldArg {
    fn field(self) -> Option<Field> {
        match self {
            FieldArg::Title => Some(Field::Title),
            FieldArg::Ingredients => Some(Field::Ingredients),
            FieldArg::Instructions => Some(Field::Instructions),
            FieldArg::Metadata => Some(Field::Metadata),
            FieldArg::All => None,
        }
    }
}

fn render<T: Serialize>(body: &T, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(body)
    } else {
        serde_json::to_string(body)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ExtractorConfig::load_from(path)?,
        None => ExtractorConfig::load()?,
    };
    debug!("Loaded configuration: {:?}", config.fetch);

    let extractor = RecipeExtractor::builder().config(config).build()?;
    let request = ExtractionRequest::new(cli.url);

    let (body, status) = match cli.field.field() {
        Some(field) => {
            let response = api::handle(&extractor, field, &request).await;
            (render(&response, cli.pretty)?, response.status())
        }
        None => {
            let response = api::handle_all(&extractor, &request).await;
            (render(&response, cli.pretty)?, response.status())
        }
    };

    println!("{body}");

    if status != 200 {
        error!("Extraction failed with status {}", status);
        std::process::exit(1);
    }

    Ok(())
}
