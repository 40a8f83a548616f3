#![allow(dead_code)]

use async_trait::async_trait;
use crypto_news::api::{FetchError, NewsFetcher, RawArticle, RawSource};
use crypto_news::app::App;
use crypto_news::config::Config;
use crypto_news::store::{KeyValueStore, MemoryStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum StubPage {
    Articles(Vec<RawArticle>),
    Failure(u16),
}

/// Serves scripted pages and records every request. Unscripted pages are empty.
#[derive(Default)]
pub struct StubFetcher {
    pages: Mutex<HashMap<(String, u32), StubPage>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, query: &str, page: u32, articles: Vec<RawArticle>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), page), StubPage::Articles(articles));
        self
    }

    pub fn with_failure(self, query: &str, page: u32, status: u16) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((query.to_string(), page), StubPage::Failure(status));
        self
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsFetcher for StubFetcher {
    async fn fetch_page(&self, query: &str, page: u32) -> Result<Vec<RawArticle>, FetchError> {
        self.calls.lock().unwrap().push((query.to_string(), page));
        let scripted = self
            .pages
            .lock()
            .unwrap()
            .get(&(query.to_string(), page))
            .cloned();
        match scripted {
            Some(StubPage::Articles(articles)) => Ok(articles),
            Some(StubPage::Failure(status)) => Err(FetchError::Status(status)),
            None => Ok(Vec::new()),
        }
    }
}

pub fn make_raw(title: &str, url: &str, published_at: &str) -> RawArticle {
    RawArticle {
        title: Some(title.to_string()),
        url: Some(url.to_string()),
        published_at: Some(published_at.to_string()),
        source: Some(RawSource {
            name: Some("CoinDesk".to_string()),
        }),
        ..RawArticle::default()
    }
}

/// `count` distinct records whose urls carry `tag` and their index.
pub fn make_page(tag: &str, count: usize) -> Vec<RawArticle> {
    (0..count)
        .map(|i| {
            make_raw(
                &format!("{} headline {}", tag, i),
                &format!("https://news.example.com/{}/{}", tag, i),
                "2024-05-01T13:45:30Z",
            )
        })
        .collect()
}

pub fn test_app(fetcher: Arc<StubFetcher>) -> App {
    App::with_backends(Config::default(), fetcher, Box::new(MemoryStore::new()))
}

pub fn test_app_with_store(fetcher: Arc<StubFetcher>, store: impl KeyValueStore + 'static) -> App {
    App::with_backends(Config::default(), fetcher, Box::new(store))
}
