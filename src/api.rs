//! Request/response operations, one per field.
//!
//! Responses serialize to the JSON bodies clients of the extraction
//! endpoints expect, e.g.
//! `{"success":true,"message":"Ingredients extracted successfully","url":"…","ingredients":[…],"count":3}`.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::builder::RecipeExtractor;
use crate::error::ExtractError;
use crate::model::{Field, RecipeMetadata};

/// Inbound request; `url` is optional so its absence can be reported
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl ExtractionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// The extracted value, serialized under the field's name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Title(String),
    Ingredients(Vec<String>),
    Instructions(Vec<String>),
    Metadata(RecipeMetadata),
}

impl Payload {
    fn count(&self) -> Option<usize> {
        match self {
            Payload::Ingredients(items) | Payload::Instructions(items) => Some(items.len()),
            Payload::Title(_) | Payload::Metadata(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Success {
    pub success: bool,
    pub message: String,
    pub url: String,
    #[serde(flatten)]
    pub payload: Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip)]
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionResponse {
    Success(Success),
    Failure(Failure),
}

impl ExtractionResponse {
    fn success(field: Field, url: String, payload: Payload) -> Self {
        ExtractionResponse::Success(Success {
            success: true,
            message: format!("{} extracted successfully", capitalize(field.label())),
            url,
            count: payload.count(),
            payload,
        })
    }

    fn failure(field: Field, error: ExtractError) -> Self {
        if error.is_input_error() {
            return ExtractionResponse::Failure(Failure {
                error: error.to_string(),
                details: None,
                status: 400,
            });
        }
        ExtractionResponse::Failure(Failure {
            error: format!("Failed to extract {}", field.label()),
            details: Some(error.to_string()),
            status: 500,
        })
    }

    /// HTTP-style status: 200, 400 for bad input, 500 for extraction failures
    pub fn status(&self) -> u16 {
        match self {
            ExtractionResponse::Success(_) => 200,
            ExtractionResponse::Failure(failure) => failure.status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResponse::Success(_))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Handle one field request. A missing or blank URL is rejected without fetching.
pub async fn handle(
    extractor: &RecipeExtractor,
    field: Field,
    request: &ExtractionRequest,
) -> ExtractionResponse {
    let Some(url) = request.url() else {
        return ExtractionResponse::failure(field, ExtractError::MissingUrl);
    };

    let result = match field {
        Field::Title => extractor.title(url).await.map(Payload::Title),
        Field::Ingredients => extractor.ingredients(url).await.map(Payload::Ingredients),
        Field::Instructions => extractor.instructions(url).await.map(Payload::Instructions),
        Field::Metadata => extractor.metadata(url).await.map(Payload::Metadata),
    };

    match result {
        Ok(payload) => ExtractionResponse::success(field, url.to_string(), payload),
        Err(e) => {
            warn!("Failed to extract {} from {}: {}", field, url, e);
            ExtractionResponse::failure(field, e)
        }
    }
}

/// The four field responses for one URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedResponse {
    pub success: bool,
    pub title: ExtractionResponse,
    pub ingredients: ExtractionResponse,
    pub instructions: ExtractionResponse,
    pub metadata: ExtractionResponse,
}

impl CombinedResponse {
    /// 200 when every field succeeded, otherwise the most severe field status
    pub fn status(&self) -> u16 {
        if self.success {
            return 200;
        }
        [&self.title, &self.ingredients, &self.instructions, &self.metadata]
            .iter()
            .map(|r| r.status())
            .max()
            .unwrap_or(500)
    }
}

/// Run all four field requests concurrently
pub async fn handle_all(extractor: &RecipeExtractor, request: &ExtractionRequest) -> CombinedResponse {
    let (title, ingredients, instructions, metadata) = tokio::join!(
        handle(extractor, Field::Title, request),
        handle(extractor, Field::Ingredients, request),
        handle(extractor, Field::Instructions, request),
        handle(extractor, Field::Metadata, request),
    );

    CombinedResponse {
        success: title.is_success()
            && ingredients.is_success()
            && instructions.is_success()
            && metadata.is_success(),
        title,
        ingredients,
        instructions,
        metadata,
    }
}
