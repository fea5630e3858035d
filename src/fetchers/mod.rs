use crate::error::ExtractError;
use async_trait::async_trait;

mod request;

pub use request::RequestFetcher;

/// Supplies the raw markup of a page
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ExtractError>;
}
