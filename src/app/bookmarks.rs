use super::App;
use crate::api::Article;
use tracing::warn;

/// Storage key holding the bookmarked article ids.
pub const BOOKMARKS_KEY: &str = "bookmarkedArticleIDs";

impl App {
    pub(super) fn load_bookmarks(&mut self) {
        if let Some(saved) = self.store.read_string_list(BOOKMARKS_KEY) {
            self.bookmarked_ids = saved.into_iter().collect();
        }
    }

    fn save_bookmarks(&mut self) {
        let ids = self.bookmarked_ids();
        if let Err(e) = self.store.write_string_list(BOOKMARKS_KEY, &ids) {
            warn!(error = %e, "failed to persist bookmarks");
            self.status_message = Some(format!("Could not save bookmarks: {}", e));
        }
    }

    /// Read state lives only for the session.
    pub fn toggle_read(&mut self, article: &Article) {
        if !self.read_ids.remove(article.id()) {
            self.read_ids.insert(article.id().to_string());
        }
    }

    pub fn is_read(&self, article: &Article) -> bool {
        self.read_ids.contains(article.id())
    }

    /// Flip membership and write the whole set back to storage.
    pub fn toggle_bookmark(&mut self, article: &Article) {
        if !self.bookmarked_ids.remove(article.id()) {
            self.bookmarked_ids.insert(article.id().to_string());
        }
        self.save_bookmarks();
    }

    pub fn is_bookmarked(&self, article: &Article) -> bool {
        self.bookmarked_ids.contains(article.id())
    }

    /// Bookmarked ids in sorted order.
    pub fn bookmarked_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.bookmarked_ids.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn toggle_selected_bookmark(&mut self) {
        let Some(article) = self.selected_article().cloned() else {
            return;
        };
        self.status_message = None;
        self.toggle_bookmark(&article);
        if self.status_message.is_none() {
            self.status_message = Some(if self.is_bookmarked(&article) {
                "Article bookmarked".to_string()
            } else {
                "Bookmark removed".to_string()
            });
        }
        // Un-bookmarking in the bookmarks view shrinks the list
        self.clamp_selection();
    }

    pub fn toggle_selected_read(&mut self) {
        if let Some(article) = self.selected_article().cloned() {
            self.toggle_read(&article);
        }
    }
}
