pub mod article;
pub mod news;

pub use article::{Article, DecodeError, RawArticle, RawSource, TimestampFormat};
pub use news::{FetchError, NewsClient, NewsFetcher};
