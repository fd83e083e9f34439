//! content-indexer - Build-time index of a content tree
//!
//! Walks a content root, pulls `title:` / `description:` /
//! `descriptionImage:` / `tags:` lines out of each file, and writes a JSON
//! index plus a deduplicated tag list for a static site to consume.
//!
//! # Identifier stability
//!
//! Each item's `id` is carried forward from the previous index by relative
//! path. Only paths that were not indexed before get fresh ids, minted above
//! the previous maximum.
//!
//! # Modules
//!
//! - `domain`: Data structures (ContentItem, TagRegistry)
//! - `index`: Loading prior ids, extraction, building, writing, querying
//! - `config`: Layered configuration (flags, env, config file, defaults)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Build ./index.json and ./tag_index.json
//! CONTENT_ROOT=./content CONTENT_BASE_URL=https://raw.example.com/content/ \
//!     content-indexer build
//!
//! # Query the result
//! content-indexer search rust
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod index;

// Re-export main types at crate root for convenience
pub use config::Settings;
pub use domain::{ContentItem, TagRegistry};
pub use index::{Catalog, ContentIndex, IdMap, IndexBuilder, IndexError};
