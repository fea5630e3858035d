use thiserror::Error;

/// Errors that can occur while extracting recipe fields
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The request did not carry a URL
    #[error("URL is required")]
    MissingUrl,

    /// Failed to fetch the page (unreachable host, TLS, body decoding)
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The page answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    HttpStatus { status: u16, url: String },

    /// A configured CSS selector could not be parsed
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// A pattern built from configured keywords could not be compiled
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl ExtractError {
    /// Whether the error was caused by the caller's input rather than the page
    pub fn is_input_error(&self) -> bool {
        matches!(self, ExtractError::MissingUrl)
    }
}
