mod bookmarks;
mod feed;

pub use bookmarks::BOOKMARKS_KEY;
pub use feed::{FeedError, FeedPhase, LATEST_LIMIT, LoadKind, NO_NEWS_MESSAGE, PageRequest};

use crate::api::{Article, NewsClient, NewsFetcher};
use crate::config::{Config, NewsCategory};
use crate::store::{JsonStore, KeyValueStore};
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Feed,
    Bookmarks,
}

/// State behind the news list: the loaded articles, pagination cursor,
/// loading/error flags and the read/bookmark membership sets.
///
/// One instance per feed session; all mutation happens on the caller's
/// task, so no locking is involved.
pub struct App {
    pub config: Config,
    pub category: NewsCategory,
    pub articles: Vec<Article>,
    pub page: u32,
    pub is_loading_initial: bool,
    pub is_loading_more: bool,
    pub error_message: Option<String>,
    pub view_mode: ViewMode,
    pub selected: usize,
    /// Id of the article to bring back into view after a reload.
    pub saved_scroll_id: Option<String>,
    pub status_message: Option<String>,
    read_ids: HashSet<String>,
    bookmarked_ids: HashSet<String>,
    fetcher: Arc<dyn NewsFetcher>,
    store: Box<dyn KeyValueStore>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = NewsClient::new(&config)?;
        let store = JsonStore::open_default()?;
        Ok(Self::with_backends(config, Arc::new(fetcher), Box::new(store)))
    }

    /// Build against explicit fetch and storage backends. Saved bookmarks
    /// are read from `store` immediately.
    pub fn with_backends(
        config: Config,
        fetcher: Arc<dyn NewsFetcher>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let mut app = Self {
            category: config.default_category,
            config,
            articles: Vec::new(),
            page: 1,
            is_loading_initial: false,
            is_loading_more: false,
            error_message: None,
            view_mode: ViewMode::Feed,
            selected: 0,
            saved_scroll_id: None,
            status_message: None,
            read_ids: HashSet::new(),
            bookmarked_ids: HashSet::new(),
            fetcher,
            store,
        };
        app.load_bookmarks();
        app
    }

    pub fn fetcher(&self) -> Arc<dyn NewsFetcher> {
        Arc::clone(&self.fetcher)
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Articles shown by the current view, in feed order.
    pub fn visible_articles(&self) -> Vec<&Article> {
        match self.view_mode {
            ViewMode::Feed => self.articles.iter().collect(),
            ViewMode::Bookmarks => self
                .articles
                .iter()
                .filter(|a| self.is_bookmarked(a))
                .collect(),
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.visible_articles().get(self.selected).copied()
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        let len = self.visible_articles().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
        }
    }

    /// True when the last feed row is selected, the cue to fetch the next page.
    pub fn is_at_last(&self) -> bool {
        self.view_mode == ViewMode::Feed
            && !self.articles.is_empty()
            && self.selected == self.articles.len() - 1
    }

    pub fn toggle_view(&mut self) {
        self.remember_position();
        self.view_mode = match self.view_mode {
            ViewMode::Feed => ViewMode::Bookmarks,
            ViewMode::Bookmarks => ViewMode::Feed,
        };
        self.selected = 0;
        self.restore_position();
    }

    pub fn remember_position(&mut self) {
        self.saved_scroll_id = self.selected_article().map(|a| a.id().to_string());
    }

    /// Re-select the remembered article if it is still visible, otherwise
    /// keep the current index within bounds.
    pub fn restore_position(&mut self) {
        let found = self.saved_scroll_id.as_deref().and_then(|id| {
            self.visible_articles()
                .iter()
                .position(|a| a.id() == id)
        });
        match found {
            Some(i) => self.selected = i,
            None => self.clamp_selection(),
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_articles().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Open the selected article in the system browser.
    pub fn open_selected(&mut self) {
        let Some(url) = self.selected_article().map(|a| a.url.to_string()) else {
            return;
        };
        self.remember_position();
        if let Err(e) = open::that(&url) {
            self.status_message = Some(format!("Could not open link: {}", e));
        }
    }
}
