use super::App;
use crate::api::article::parse_page;
use crate::api::{Article, DecodeError, FetchError, RawArticle};
use crate::config::NewsCategory;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const NO_NEWS_MESSAGE: &str = "No news available";

/// Number of items kept by the summary load.
pub const LATEST_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    LoadingInitial,
    Loaded,
    LoadingMore,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    All,
    More,
    Latest,
}

/// A fetch the controller has committed to. Produced by the `begin_*`
/// methods and handed back to [`App::complete`] with the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub kind: LoadKind,
    pub query: String,
    pub page: u32,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl App {
    pub fn phase(&self) -> FeedPhase {
        if self.is_loading_initial {
            FeedPhase::LoadingInitial
        } else if self.is_loading_more {
            FeedPhase::LoadingMore
        } else if self.error_message.is_some() {
            FeedPhase::Error
        } else if !self.articles.is_empty() {
            FeedPhase::Loaded
        } else {
            FeedPhase::Idle
        }
    }

    /// Reset the cursor and request the first page of the current category.
    /// Not guarded: a second call while one is pending issues another
    /// request and whichever settles last wins.
    pub fn begin_load_all(&mut self) -> PageRequest {
        self.is_loading_initial = true;
        self.page = 1;
        self.request(LoadKind::All)
    }

    pub fn begin_load_latest(&mut self) -> PageRequest {
        self.is_loading_initial = true;
        self.page = 1;
        self.request(LoadKind::Latest)
    }

    pub fn begin_select_category(&mut self, category: NewsCategory) -> PageRequest {
        self.category = category;
        self.begin_load_all()
    }

    /// Advance the cursor and request the next page, unless a previous
    /// "load more" has not settled yet.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.is_loading_more {
            debug!(page = self.page, "load more already in flight");
            return None;
        }
        self.is_loading_more = true;
        self.page += 1;
        Some(self.request(LoadKind::More))
    }

    fn request(&self, kind: LoadKind) -> PageRequest {
        PageRequest {
            kind,
            query: self.category.query().to_string(),
            page: self.page,
        }
    }

    /// Apply the outcome of `request`. Failures end up in `error_message`;
    /// nothing is returned to the caller.
    pub fn complete(&mut self, request: &PageRequest, result: Result<Vec<RawArticle>, FetchError>) {
        let outcome = result
            .map_err(FeedError::from)
            .and_then(|raws| parse_page(raws).map_err(FeedError::from));

        match request.kind {
            LoadKind::All | LoadKind::Latest => {
                self.is_loading_initial = false;
                match outcome {
                    Ok(mut articles) => {
                        if request.kind == LoadKind::Latest {
                            articles.truncate(LATEST_LIMIT);
                        }
                        info!(
                            query = %request.query,
                            count = articles.len(),
                            "feed loaded"
                        );
                        self.error_message = if articles.is_empty() {
                            Some(NO_NEWS_MESSAGE.to_string())
                        } else {
                            None
                        };
                        self.articles = articles;
                    }
                    Err(e) => {
                        warn!(query = %request.query, error = %e, "feed load failed");
                        self.articles.clear();
                        self.error_message = Some(e.to_string());
                    }
                }
                self.selected = 0;
                self.restore_position();
            }
            LoadKind::More => {
                self.is_loading_more = false;
                match outcome {
                    Ok(articles) => {
                        debug!(page = request.page, count = articles.len(), "page appended");
                        self.articles.extend(articles);
                    }
                    Err(e) => {
                        warn!(page = request.page, error = %e, "load more failed");
                        self.error_message = Some(e.to_string());
                    }
                }
            }
        }
    }

    /// Fetch `request` with this controller's backend and apply the result.
    pub async fn run(&mut self, request: PageRequest) {
        let fetcher = self.fetcher();
        let result = fetcher.fetch_page(&request.query, request.page).await;
        self.complete(&request, result);
    }

    pub async fn load_all(&mut self) {
        let request = self.begin_load_all();
        self.run(request).await;
    }

    pub async fn load_more(&mut self) {
        if let Some(request) = self.begin_load_more() {
            self.run(request).await;
        }
    }

    pub async fn load_latest(&mut self) {
        let request = self.begin_load_latest();
        self.run(request).await;
    }

    /// `load_latest` for one-shot callers: a failed or empty load is an error.
    pub async fn try_load_latest(&mut self) -> anyhow::Result<&[Article]> {
        self.load_latest().await;
        match &self.error_message {
            Some(message) => anyhow::bail!("{}", message),
            None => Ok(&self.articles),
        }
    }

    pub async fn select_category(&mut self, category: NewsCategory) {
        let request = self.begin_select_category(category);
        self.run(request).await;
    }
}
