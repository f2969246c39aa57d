//! Post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post or template record.
///
/// Listing produces records with `content: None`; looking a single post up
/// by slug produces the same record with its rendered HTML attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Stable identifier, unique within the store
    pub id: String,

    /// URL-safe lookup key
    pub slug: String,

    /// Display title
    pub title: String,

    /// Short summary
    #[serde(default)]
    pub description: String,

    /// Publication date, absent when unknown or unparsable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// Estimated reading time in minutes
    #[serde(default)]
    pub read_time: u32,

    /// Tags; the first one doubles as the category
    #[serde(default)]
    pub tags: Vec<String>,

    /// Cover image, already resolved against the default image
    pub image_path: String,

    /// Sanitized HTML, only present on detail lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Post {
    /// Create a listing record with empty metadata
    pub fn new(id: impl Into<String>, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: title.into(),
            description: String::new(),
            date: None,
            read_time: 0,
            tags: Vec::new(),
            image_path: String::new(),
            content: None,
        }
    }

    /// The category, i.e. the first tag when it is non-empty
    pub fn category(&self) -> Option<&str> {
        self.tags
            .first()
            .map(String::as_str)
            .filter(|tag| !tag.is_empty())
    }

    /// Tags after the category
    pub fn secondary_tags(&self) -> &[String] {
        self.tags.get(1..).unwrap_or(&[])
    }
}

/// Count whitespace-delimited words in a markdown body
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Reading time in whole minutes, rounded up
pub fn read_time(body: &str, words_per_minute: u32) -> u32 {
    let words = word_count(body) as u32;
    let wpm = words_per_minute.max(1);
    words.div_ceil(wpm)
}

/// Pick the image to display for a post.
///
/// Blank values and anything that is neither site-rooted nor an absolute URL
/// fall back to `default_image`.
pub fn resolve_image(image_path: Option<&str>, default_image: &str) -> String {
    match image_path.map(str::trim) {
        Some(path) if path.starts_with('/') || path.contains("://") => path.to_string(),
        Some(path) if !path.is_empty() => {
            tracing::debug!("Ignoring unusable image path {:?}", path);
            default_image.to_string()
        }
        _ => default_image.to_string(),
    }
}
