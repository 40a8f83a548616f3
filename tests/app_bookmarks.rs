mod common;

use chrono::Utc;
use common::{StubFetcher, make_page, test_app, test_app_with_store};
use crypto_news::api::Article;
use crypto_news::app::{BOOKMARKS_KEY, ViewMode};
use crypto_news::store::{KeyValueStore, MemoryStore};
use std::sync::Arc;
use url::Url;

fn make_article(path: &str) -> Article {
    Article::new(
        "Headline",
        Url::parse(&format!("https://news.example.com/{}", path)).unwrap(),
        Utc::now(),
    )
}

fn stored(app: &crypto_news::app::App) -> Option<Vec<String>> {
    app.store().read_string_list(BOOKMARKS_KEY)
}

#[test]
fn toggle_bookmark_twice_restores_membership() {
    let mut app = test_app(Arc::new(StubFetcher::new()));
    let article = make_article("a");
    assert!(!app.is_bookmarked(&article));

    app.toggle_bookmark(&article);
    assert!(app.is_bookmarked(&article));
    assert_eq!(stored(&app), Some(vec!["https://news.example.com/a".to_string()]));

    app.toggle_bookmark(&article);
    assert!(!app.is_bookmarked(&article));
    assert_eq!(stored(&app), Some(Vec::new()));
}

#[test]
fn every_toggle_writes_full_set() {
    let mut app = test_app(Arc::new(StubFetcher::new()));
    let a = make_article("a");
    let b = make_article("b");
    app.toggle_bookmark(&b);
    app.toggle_bookmark(&a);
    assert_eq!(
        stored(&app),
        Some(vec![
            "https://news.example.com/a".to_string(),
            "https://news.example.com/b".to_string(),
        ])
    );

    app.toggle_bookmark(&b);
    assert_eq!(stored(&app), Some(vec!["https://news.example.com/a".to_string()]));
}

#[test]
fn saved_bookmarks_load_at_startup() {
    let store = MemoryStore::with_list(BOOKMARKS_KEY, &["https://news.example.com/saved"]);
    let app = test_app_with_store(Arc::new(StubFetcher::new()), store);
    assert!(app.is_bookmarked(&make_article("saved")));
    assert!(!app.is_bookmarked(&make_article("other")));
}

#[test]
fn read_state_is_not_persisted() {
    let mut app = test_app(Arc::new(StubFetcher::new()));
    let article = make_article("a");
    app.toggle_read(&article);
    assert!(app.is_read(&article));
    assert_eq!(stored(&app), None);

    app.toggle_read(&article);
    assert!(!app.is_read(&article));
}

#[test]
fn membership_is_keyed_by_url() {
    let mut app = test_app(Arc::new(StubFetcher::new()));
    let original = make_article("a");
    let mut retitled = make_article("a");
    retitled.title = "Updated headline".to_string();

    app.toggle_bookmark(&original);
    assert!(app.is_bookmarked(&retitled));
}

#[tokio::test]
async fn bookmarks_view_shows_only_bookmarked() {
    let fetcher = Arc::new(StubFetcher::new().with_page("crypto", 1, make_page("p1", 3)));
    let mut app = test_app(fetcher);
    app.load_all().await;
    let second = app.articles[1].clone();
    app.toggle_bookmark(&second);

    app.toggle_view();
    assert_eq!(app.view_mode, ViewMode::Bookmarks);
    let visible = app.visible_articles();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id(), second.id());
}

#[tokio::test]
async fn toggle_selected_bookmark_reports_and_clamps() {
    let fetcher = Arc::new(StubFetcher::new().with_page("crypto", 1, make_page("p1", 3)));
    let mut app = test_app(fetcher);
    app.load_all().await;

    app.move_down();
    app.toggle_selected_bookmark();
    assert_eq!(app.status_message.as_deref(), Some("Article bookmarked"));
    app.move_down();
    app.toggle_selected_bookmark();

    app.toggle_view();
    assert_eq!(app.visible_articles().len(), 2);
    app.move_down();
    assert_eq!(app.selected, 1);

    // Removing the last visible bookmark pulls the selection back
    app.toggle_selected_bookmark();
    assert_eq!(app.status_message.as_deref(), Some("Bookmark removed"));
    assert_eq!(app.visible_articles().len(), 1);
    assert_eq!(app.selected, 0);
}

#[tokio::test]
async fn toggle_selected_read_marks_current_article() {
    let fetcher = Arc::new(StubFetcher::new().with_page("crypto", 1, make_page("p1", 2)));
    let mut app = test_app(fetcher);
    app.load_all().await;
    app.toggle_selected_read();
    assert!(app.is_read(&app.articles[0]));
    assert!(!app.is_read(&app.articles[1]));
}
