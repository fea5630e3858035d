use super::Fetcher;
use crate::error::ExtractError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Plain HTTP GET with a browser-like User-Agent
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    /// Without a timeout the transport default applies
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, ExtractError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ExtractError> {
        debug!("RequestFetcher: GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ExtractError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await?;
        debug!("RequestFetcher: received {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/recipe")
            .match_header("user-agent", "RecipeBot/1.0")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body>ok</body></html>")
            .create_async()
            .await;

        let fetcher = RequestFetcher::new("RecipeBot/1.0", Some(Duration::from_secs(5))).unwrap();
        let html = fetcher
            .fetch(&format!("{}/recipe", server.url()))
            .await
            .unwrap();

        assert!(html.contains("ok"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/missing").with_status(404).create();

        let fetcher = RequestFetcher::new("RecipeBot/1.0", None).unwrap();
        let url = format!("{}/missing", server.url());
        match fetcher.fetch(&url).await {
            Err(ExtractError::HttpStatus { status, url: failed }) => {
                assert_eq!(status, 404);
                assert_eq!(failed, url);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
