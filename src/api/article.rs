use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;
use std::hash::{Hash, Hasher};
use thiserror::Error;
use tracing::{debug, trace, warn};
use url::Url;

pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// Explicit patterns tried after both RFC 3339 variants fail.
/// Offsets are mandatory, so the result is always anchored to UTC.
const FALLBACK_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M:%S%.3f%:z",
    "%Y-%m-%dT%H:%M:%S%z",
];

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Article is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("The article link '{url}' is not a valid URL: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSource {
    pub name: Option<String>,
}

/// A news record as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub source_name: Option<String>,
    /// NewsAPI nests the publisher name; only used when `sourceName` is absent.
    pub source: Option<RawSource>,
    pub published_at: Option<String>,
}

/// Which tier of the timestamp cascade recognised the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    Iso8601Fractional,
    Iso8601,
    Pattern(&'static str),
}

#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: Url,
    pub image_url: Option<Url>,
    pub source_name: String,
    pub published_at: DateTime<Utc>,
}

impl Article {
    pub fn new(title: &str, url: Url, published_at: DateTime<Utc>) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            url,
            image_url: None,
            source_name: UNKNOWN_SOURCE.to_string(),
            published_at,
        }
    }

    /// Normalize a wire record. Only a missing title or link is fatal;
    /// an unreadable timestamp falls back to the current time.
    pub fn parse(raw: RawArticle) -> Result<Self, DecodeError> {
        let title = raw.title.ok_or(DecodeError::MissingField("title"))?;
        let raw_url = raw.url.ok_or(DecodeError::MissingField("url"))?;
        let url = Url::parse(&raw_url).map_err(|source| DecodeError::InvalidUrl {
            url: raw_url,
            source,
        })?;

        let image_url = raw
            .url_to_image
            .as_deref()
            .and_then(|s| match Url::parse(s) {
                Ok(u) => Some(u),
                Err(e) => {
                    debug!(image = s, error = %e, "ignoring unparsable image url");
                    None
                }
            });

        let source_name = raw
            .source_name
            .or_else(|| raw.source.and_then(|s| s.name))
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());

        let published_at = match raw.published_at.as_deref() {
            Some(s) => {
                trace!(raw = s, "publishedAt raw string");
                match parse_published_at(s) {
                    Some((dt, format)) => {
                        trace!(?format, "publishedAt parsed");
                        dt
                    }
                    None => {
                        warn!(raw = s, "failed to parse publishedAt, defaulting to now");
                        Utc::now()
                    }
                }
            }
            None => {
                warn!(url = %url, "publishedAt missing, defaulting to now");
                Utc::now()
            }
        };

        Ok(Self {
            title,
            description: raw.description,
            url,
            image_url,
            source_name,
            published_at,
        })
    }

    /// Identity key used for read/bookmark membership and scroll restore.
    pub fn id(&self) -> &str {
        self.url.as_str()
    }

    pub fn relative_time(&self) -> String {
        relative_time(self.published_at, &Local::now())
    }
}

impl PartialEq for Article {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Article {}

impl Hash for Article {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

/// Decode a whole page; the first malformed record fails it.
pub fn parse_page(raws: Vec<RawArticle>) -> Result<Vec<Article>, DecodeError> {
    raws.into_iter().map(Article::parse).collect()
}

/// Run the timestamp cascade. First match wins.
pub fn parse_published_at(raw: &str) -> Option<(DateTime<Utc>, TimestampFormat)> {
    if let Some(dt) = parse_iso8601(raw, true) {
        return Some((dt, TimestampFormat::Iso8601Fractional));
    }
    if let Some(dt) = parse_iso8601(raw, false) {
        return Some((dt, TimestampFormat::Iso8601));
    }
    FALLBACK_PATTERNS.iter().find_map(|&pattern| {
        DateTime::parse_from_str(raw, pattern)
            .ok()
            .map(|dt| (dt.with_timezone(&Utc), TimestampFormat::Pattern(pattern)))
    })
}

// RFC 3339 parsing also takes a space or lowercase 't' between date and time.
fn parse_iso8601(raw: &str, fractional: bool) -> Option<DateTime<Utc>> {
    if has_fractional_seconds(raw) != fractional {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// "yyyy-MM-ddTHH:mm:ss" is 19 bytes; a fraction starts right after it.
fn has_fractional_seconds(raw: &str) -> bool {
    raw.as_bytes().get(19) == Some(&b'.')
}

/// Human-friendly age of `published_at` as seen from `now`.
///
/// "Yesterday" is a calendar check in `now`'s time zone and is only
/// consulted once a full day has elapsed, so near midnight it can disagree
/// with the plain day count.
pub fn relative_time<Tz: TimeZone>(published_at: DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let elapsed = now
        .clone()
        .signed_duration_since(published_at)
        .num_seconds();
    if elapsed < 60 {
        "Just now".to_string()
    } else if elapsed < 3_600 {
        format!("{}m ago", elapsed / 60)
    } else if elapsed < 86_400 {
        format!("{}h ago", elapsed / 3_600)
    } else if is_yesterday(published_at, now) {
        "Yesterday".to_string()
    } else {
        format!("{}d ago", elapsed / 86_400)
    }
}

fn is_yesterday<Tz: TimeZone>(published_at: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    let published_day = published_at.with_timezone(&now.timezone()).date_naive();
    now.date_naive().pred_opt() == Some(published_day)
}
