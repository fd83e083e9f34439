//! Deduplicated tag registry.

use std::collections::HashSet;

use serde::{Serialize, Serializer};

/// Every distinct non-empty tag seen during a build, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    tags: Vec<String>,
    seen: HashSet<String>,
}

impl TagRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge tags into the registry, skipping empty strings and duplicates.
    ///
    /// Returns the number of tags that were new.
    pub fn merge<I, S>(&mut self, tags: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for tag in tags {
            let tag = tag.as_ref();
            if tag.is_empty() || self.seen.contains(tag) {
                continue;
            }
            self.seen.insert(tag.to_string());
            self.tags.push(tag.to_string());
            added += 1;
        }
        added
    }

    /// Check whether a tag has been registered
    pub fn contains(&self, tag: &str) -> bool {
        self.seen.contains(tag)
    }

    /// Registered tags in first-seen order
    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    /// Get the number of tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Serialize for TagRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tags.serialize(serializer)
    }
}
