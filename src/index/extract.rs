//! Per-file extraction: relative path + content + mtime -> [`ContentItem`].

use chrono::{DateTime, Utc};

use super::builder::IndexError;
use super::ids::{Assignment, IdMap};
use super::metadata::Metadata;
use crate::domain::{ContentItem, TagRegistry};

/// Mutable state threaded through extraction for one build
#[derive(Debug, Default)]
pub struct ExtractState {
    /// Path -> id mapping (prior ids plus ids minted this run)
    pub ids: IdMap,

    /// Tags seen so far
    pub tags: TagRegistry,
}

impl ExtractState {
    /// Start from a loaded id map and an empty tag registry
    pub fn new(ids: IdMap) -> Self {
        Self {
            ids,
            tags: TagRegistry::new(),
        }
    }
}

/// Produce the item for one file.
///
/// Assigns (or reuses) the id for `rel_path` and merges any non-empty tags
/// into the shared registry. Fails only when no new id can be minted.
pub fn extract_item(
    state: &mut ExtractState,
    rel_path: &str,
    content: &str,
    modified: DateTime<Utc>,
    base_url: &str,
) -> Result<ContentItem, IndexError> {
    let id = match state.ids.assign(rel_path)? {
        Assignment::Reused(id) => {
            tracing::debug!("Using existing id {} for {}", id, rel_path);
            id
        }
        Assignment::Minted(id) => {
            tracing::debug!("Assigning new id {} for {}", id, rel_path);
            id
        }
    };

    let meta = Metadata::parse(content);
    let mut item = ContentItem::new(id, rel_path, base_url, modified);

    item.title = meta.title.unwrap_or_default();
    item.description = meta.description.unwrap_or_default();
    item.description_image = meta.description_image.unwrap_or_default();
    if let Some(tags) = meta.tags {
        state.tags.merge(&tags);
        item.tags = tags;
    }

    Ok(item)
}
