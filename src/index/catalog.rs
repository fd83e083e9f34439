//! Read-only queries over a written index.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{ContentItem, TagRegistry};

/// A loaded index file
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Items in stored order (newest first when written by the builder)
    pub items: Vec<ContentItem>,
}

impl Catalog {
    /// Wrap already loaded items
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    /// Load an index file. Unlike the builder, a missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read index: {}", path.display()))?;

        let items = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse index JSON: {}", path.display()))?;

        Ok(Self { items })
    }

    /// Items in stored order, optionally truncated
    pub fn list(&self, limit: Option<usize>) -> Vec<&ContentItem> {
        let mut items: Vec<_> = self.items.iter().collect();
        if let Some(limit) = limit {
            items.truncate(limit);
        }
        items
    }

    /// Case-insensitive substring match on title, description, path and tags
    pub fn search(&self, query: &str) -> Vec<&ContentItem> {
        let query_lower = query.to_lowercase();

        self.items
            .iter()
            .filter(|item| {
                item.title.to_lowercase().contains(&query_lower)
                    || item.description.to_lowercase().contains(&query_lower)
                    || item.path.to_lowercase().contains(&query_lower)
                    || item.tags.iter().any(|t| t.to_lowercase().contains(&query_lower))
            })
            .collect()
    }

    /// Items carrying exactly this tag
    pub fn filter_by_tag(&self, tag: &str) -> Vec<&ContentItem> {
        self.items.iter().filter(|item| item.has_tag(tag)).collect()
    }

    /// Find an item by id
    pub fn get(&self, id: i64) -> Option<&ContentItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Tag registry recomputed from the stored items
    pub fn tags(&self) -> TagRegistry {
        let mut registry = TagRegistry::new();
        for item in &self.items {
            registry.merge(&item.tags);
        }
        registry
    }

    /// Get the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
