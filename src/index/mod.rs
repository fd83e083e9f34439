//! Index construction.
//!
//! A build is a single linear pass:
//!
//! ```text
//! IdMap::load ──► walk + extract_item (per file) ──► sort ──► write_outputs
//! ```
//!
//! - `ids`: Prior-index loader and identifier minting
//! - `metadata`: Line scanner for `title:` / `description:` / `tags:` lines
//! - `extract`: One file in, one `ContentItem` out
//! - `builder`: Walk, extract, sort; fatal error taxonomy
//! - `output`: Atomic writes of the index and tag index
//! - `catalog`: Queries over an index that has already been written

pub mod builder;
pub mod catalog;
pub mod extract;
pub mod ids;
pub mod metadata;
pub mod output;

// Re-export commonly used types
pub use builder::{
    relative_path, sort_newest_first, BuildOptions, ContentIndex, IndexBuilder, IndexError,
};
pub use catalog::Catalog;
pub use extract::{extract_item, ExtractState};
pub use ids::{Assignment, IdMap, IdOverflow};
pub use metadata::{parse_tag_list, Metadata};
pub use output::{write_outputs, OutputOptions, WrittenOutputs};
