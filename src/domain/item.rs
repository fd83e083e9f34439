//! Content items: one record per indexed file.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in the content index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Identifier, stable across rebuilds for the same relative path
    pub id: i64,

    /// Value of the `title: ` line (empty if absent)
    #[serde(default)]
    pub title: String,

    /// Value of the `description: ` line
    #[serde(default)]
    pub description: String,

    /// Value of the `descriptionImage: ` line
    #[serde(default)]
    pub description_image: String,

    /// Tags parsed from the `tags: ` line
    #[serde(default)]
    pub tags: Vec<String>,

    /// Path relative to the content root, forward-slash separated
    pub path: String,

    /// Base URL joined with `path`
    #[serde(rename = "githubPath", alias = "remotePath", default)]
    pub remote_path: String,

    /// Last-modified time of the file
    pub created_at: DateTime<Utc>,

    /// Never populated by the builder; always [`unset_timestamp`]
    #[serde(default = "unset_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Create an item with empty metadata
    pub fn new(
        id: i64,
        path: impl Into<String>,
        base_url: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        let path = path.into();
        Self {
            id,
            title: String::new(),
            description: String::new(),
            description_image: String::new(),
            tags: Vec::new(),
            remote_path: format!("{}{}", base_url, path),
            path,
            created_at,
            updated_at: unset_timestamp(),
        }
    }

    /// Does this item carry the given tag (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// The "zero" timestamp written for fields the builder does not fill in.
///
/// Serializes as `0001-01-01T00:00:00Z`.
pub fn unset_timestamp() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}
