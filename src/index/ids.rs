//! Identifier assignment that survives index rebuilds.
//!
//! The previous index is consulted only for its `path -> id` pairs. Paths seen
//! before keep their id; new paths are minted `max + 1` in the order they are
//! encountered.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// The subset of a prior index entry needed to carry ids forward
#[derive(Debug, Deserialize)]
struct PriorEntry {
    id: i64,
    path: String,
}

/// Mapping from relative path to identifier, plus the running maximum
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdMap {
    ids: HashMap<String, i64>,
    max_id: i64,
}

/// No id above the current maximum fits in an `i64`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No identifier left for {path}: maximum id is already {max_id}")]
pub struct IdOverflow {
    pub path: String,
    pub max_id: i64,
}

/// Outcome of [`IdMap::assign`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// The path already had an id
    Reused(i64),

    /// A fresh id was minted for the path
    Minted(i64),
}

impl Assignment {
    /// The assigned identifier
    pub fn id(self) -> i64 {
        match self {
            Assignment::Reused(id) | Assignment::Minted(id) => id,
        }
    }
}

impl IdMap {
    /// Create an empty map (fresh start)
    pub fn new() -> Self {
        Self::default()
    }

    /// Load ids from a previously written index.
    ///
    /// A missing or unreadable index is not an error: the build starts fresh
    /// with an empty map and a maximum of 0.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No existing index at {}, starting fresh", path.display());
                return Self::new();
            }
            Err(e) => {
                tracing::warn!("Failed to read existing index {}: {}", path.display(), e);
                return Self::new();
            }
        };

        match Self::from_json(&content) {
            Ok(map) => {
                tracing::info!(
                    "Loaded {} existing ids from {} (max id {})",
                    map.len(),
                    path.display(),
                    map.max_id
                );
                map
            }
            Err(e) => {
                tracing::warn!("Failed to parse existing index {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Build a map from the JSON text of a prior index
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<PriorEntry> = serde_json::from_str(content)?;
        Ok(Self::from_pairs(entries.into_iter().map(|e| (e.path, e.id))))
    }

    /// Build a map from `(path, id)` pairs; later pairs win for repeated paths
    pub fn from_pairs<I, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, i64)>,
        P: Into<String>,
    {
        let mut map = Self::new();
        for (path, id) in pairs {
            let path = path.into();
            tracing::debug!("Loaded id {} for {}", id, path);
            map.ids.insert(path, id);
            map.max_id = map.max_id.max(id);
        }
        map
    }

    /// Reuse the recorded id for `path`, or mint and record a new one
    pub fn assign(&mut self, path: &str) -> Result<Assignment, IdOverflow> {
        if let Some(&id) = self.ids.get(path) {
            return Ok(Assignment::Reused(id));
        }

        let id = self.max_id.checked_add(1).ok_or_else(|| IdOverflow {
            path: path.to_string(),
            max_id: self.max_id,
        })?;

        self.max_id = id;
        self.ids.insert(path.to_string(), id);
        Ok(Assignment::Minted(id))
    }

    /// Look up the id recorded for a path
    pub fn get(&self, path: &str) -> Option<i64> {
        self.ids.get(path).copied()
    }

    /// Highest id seen or minted so far (0 when empty)
    pub fn max_id(&self) -> i64 {
        self.max_id
    }

    /// Get the number of recorded paths
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if no paths are recorded
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
