//! Index builder: load prior ids, walk the content root, extract, sort.
//!
//! The build is all-or-nothing. The first walk, read, stat or id-overflow
//! failure aborts the run and nothing is written.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use glob::Pattern;
use thiserror::Error;
use walkdir::WalkDir;

use super::extract::{extract_item, ExtractState};
use super::ids::{IdMap, IdOverflow};
use crate::domain::{ContentItem, TagRegistry};

/// Fatal build errors
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stat {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    IdOverflow(#[from] IdOverflow),

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Result of a build: items sorted newest first, plus the tag registry
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    pub items: Vec<ContentItem>,
    pub tags: TagRegistry,
}

/// Inputs for a build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory to index
    pub root: PathBuf,

    /// Prefix joined with each relative path to form the remote URL
    pub base_url: String,

    /// Glob patterns (matched against relative paths) to skip
    pub exclude: Vec<String>,
}

/// Orchestrates a single build
pub struct IndexBuilder {
    options: BuildOptions,
    exclude: Vec<Pattern>,
}

impl IndexBuilder {
    /// Create a builder, compiling exclude patterns up front
    pub fn new(options: BuildOptions) -> Result<Self, IndexError> {
        let exclude = options
            .exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| IndexError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { options, exclude })
    }

    /// Build the index, carrying ids forward from the prior index at `prior_index`
    pub fn build_from(&self, prior_index: &Path) -> Result<ContentIndex, IndexError> {
        self.build(IdMap::load(prior_index))
    }

    /// Build the index starting from an already loaded id map
    pub fn build(&self, ids: IdMap) -> Result<ContentIndex, IndexError> {
        let root = &self.options.root;
        tracing::info!("Starting walk of {}", root.display());

        let mut state = ExtractState::new(ids);
        let mut items = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| IndexError::Walk {
                root: root.clone(),
                source,
            })?;

            if entry.file_type().is_dir() {
                continue;
            }

            let rel_path = relative_path(root, entry.path());
            if self.is_excluded(&rel_path) {
                tracing::debug!("Skipping excluded {}", rel_path);
                continue;
            }

            let (content, modified) = read_file(entry.path())?;
            tracing::debug!("Processing {}", rel_path);
            items.push(extract_item(
                &mut state,
                &rel_path,
                &content,
                modified,
                &self.options.base_url,
            )?);
        }

        tracing::info!(
            "Processed {} files ({} distinct tags)",
            items.len(),
            state.tags.len()
        );

        sort_newest_first(&mut items);

        Ok(ContentIndex {
            items,
            tags: state.tags,
        })
    }

    fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(rel_path))
    }
}

/// Sort by `created_at` descending; equal timestamps keep their walk order
pub fn sort_newest_first(items: &mut [ContentItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Path relative to `root`, joined with `/` on every platform
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);

    let joined = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Read content (lossy UTF-8) and modification time, following symlinks
fn read_file(path: &Path) -> Result<(String, DateTime<Utc>), IndexError> {
    let bytes = std::fs::read(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| IndexError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

    Ok((
        String::from_utf8_lossy(&bytes).into_owned(),
        DateTime::<Utc>::from(modified),
    ))
}
