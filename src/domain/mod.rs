//! Domain types for the content indexer.
//!
//! This module contains the core data structures:
//! - ContentItem: One indexed file's metadata record
//! - TagRegistry: Deduplicated tags across all items

pub mod item;
pub mod tags;

// Re-export commonly used types
pub use item::{unset_timestamp, ContentItem};
pub use tags::TagRegistry;
