use crate::api::article::RawArticle;
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("News service returned HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Api(String),
}

/// Source of raw article pages. Page size and end-of-data are the
/// implementation's concern; callers stop on an empty page or an error.
#[async_trait]
pub trait NewsFetcher: Send + Sync {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<Vec<RawArticle>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<RawArticle>,
    message: Option<String>,
}

pub struct NewsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
    language: String,
}

impl NewsClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            page_size: config.page_size,
            language: config.language.clone(),
        })
    }
}

#[async_trait]
impl NewsFetcher for NewsClient {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<Vec<RawArticle>, FetchError> {
        let url = format!("{}/everything", self.base_url);
        debug!(query, page, "fetching news page");

        let page = page.to_string();
        let page_size = self.page_size.to_string();
        let mut request = self.client.get(&url).query(&[
            ("q", query),
            ("page", page.as_str()),
            ("pageSize", page_size.as_str()),
            ("sortBy", "publishedAt"),
            ("language", self.language.as_str()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            // Error bodies usually carry a readable message
            let message = resp
                .json::<NewsApiResponse>()
                .await
                .ok()
                .and_then(|body| body.message);
            return Err(match message {
                Some(m) => FetchError::Api(m),
                None => FetchError::Status(status.as_u16()),
            });
        }

        let body: NewsApiResponse = resp.json().await?;
        if body.status != "ok" {
            return Err(FetchError::Api(
                body.message
                    .unwrap_or_else(|| format!("News service reported status '{}'", body.status)),
            ));
        }
        Ok(body.articles)
    }
}
