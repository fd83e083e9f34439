//! Command-line interface for content-indexer.
//!
//! Provides commands for building the index, querying a built index,
//! and inspecting the resolved configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{self, Overrides, Settings};
use crate::domain::ContentItem;
use crate::index::{write_outputs, Catalog, IndexBuilder};

/// content-indexer - Build a JSON index of a content tree
#[derive(Parser, Debug)]
#[command(name = "content-indexer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk the content root and write the index and tag index
    Build {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Report what would be written without touching any file
        #[arg(long)]
        dry_run: bool,
    },

    /// List items in a built index (newest first)
    List {
        /// Index file to read
        #[arg(long, env = config::ENV_INDEX_PATH, default_value = config::DEFAULT_INDEX_PATH)]
        index: PathBuf,

        /// Only show items with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Maximum number of items to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Search titles, descriptions, paths and tags of a built index
    Search {
        /// Search query
        query: String,

        /// Index file to read
        #[arg(long, env = config::ENV_INDEX_PATH, default_value = config::DEFAULT_INDEX_PATH)]
        index: PathBuf,
    },

    /// Print the distinct tags of a built index
    Tags {
        /// Index file to read
        #[arg(long, env = config::ENV_INDEX_PATH, default_value = config::DEFAULT_INDEX_PATH)]
        index: PathBuf,
    },

    /// Show resolved configuration (debug)
    Config {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Flags shared by commands that need resolved settings
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Content root directory
    #[arg(long, env = config::ENV_ROOT)]
    pub root: Option<PathBuf>,

    /// Base URL prepended to each relative path
    #[arg(long, env = config::ENV_BASE_URL)]
    pub base_url: Option<String>,

    /// Index output path (also the prior index consulted for ids)
    #[arg(long = "index", env = config::ENV_INDEX_PATH)]
    pub index_path: Option<PathBuf>,

    /// Tag index output path
    #[arg(long = "tag-index", env = config::ENV_TAG_INDEX_PATH)]
    pub tag_index_path: Option<PathBuf>,

    /// Do not write the tag index
    #[arg(long)]
    pub no_tag_index: bool,

    /// Glob pattern of relative paths to skip (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Write indented JSON
    #[arg(long)]
    pub pretty: bool,
}

impl From<SettingsArgs> for Overrides {
    fn from(args: SettingsArgs) -> Self {
        Overrides {
            root: args.root,
            base_url: args.base_url,
            index_path: args.index_path,
            tag_index_path: args.tag_index_path,
            no_tag_index: args.no_tag_index,
            exclude: args.exclude,
            pretty: args.pretty,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Build { settings, dry_run } => {
                let settings = config::load(&settings.into())?;
                build_index(&settings, dry_run)
            }
            Commands::List { index, tag, limit } => {
                list_index(&index, tag.as_deref(), limit)
            }
            Commands::Search { query, index } => {
                search_index(&index, &query)
            }
            Commands::Tags { index } => {
                list_tags(&index)
            }
            Commands::Config { settings } => {
                let settings = config::load(&settings.into())?;
                show_config(&settings);
                Ok(())
            }
        }
    }
}

/// Run a full build and write outputs
pub fn build_index(settings: &Settings, dry_run: bool) -> Result<()> {
    tracing::info!("Root: {}", settings.root.display());

    let builder = IndexBuilder::new(settings.build_options())?;
    let index = builder
        .build_from(&settings.index_path)
        .context("Index build failed")?;

    if dry_run {
        eprintln!(
            "Dry run: {} items, {} tags (nothing written)",
            index.items.len(),
            index.tags.len()
        );
        return Ok(());
    }

    let written = write_outputs(&index, &settings.output_options())
        .context("Failed to write index outputs")?;

    eprintln!("Indexed {} items -> {}", index.items.len(), written.index.display());
    if let Some(tag_index) = written.tag_index {
        eprintln!("Tags: {} -> {}", index.tags.len(), tag_index.display());
    }

    Ok(())
}

/// List items in a built index
fn list_index(index_path: &std::path::Path, tag: Option<&str>, limit: usize) -> Result<()> {
    let catalog = Catalog::load(index_path)?;

    if catalog.is_empty() {
        println!("Index is empty. Run 'content-indexer build' first.");
        return Ok(());
    }

    let (items, matching) = select_items(&catalog, tag, limit);

    print_items(items.into_iter());
    println!("\nTotal: {} items", matching);

    Ok(())
}

/// Up to `limit` items (optionally only those tagged `tag`) and how many matched
fn select_items<'a>(
    catalog: &'a Catalog,
    tag: Option<&str>,
    limit: usize,
) -> (Vec<&'a ContentItem>, usize) {
    match tag {
        Some(tag) => {
            let mut items = catalog.filter_by_tag(tag);
            let matching = items.len();
            items.truncate(limit);
            (items, matching)
        }
        None => (catalog.list(Some(limit)), catalog.len()),
    }
}

/// Search a built index
fn search_index(index_path: &std::path::Path, query: &str) -> Result<()> {
    let catalog = Catalog::load(index_path)?;

    let results = catalog.search(query);

    if results.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("Found {} result(s) for \"{}\":\n", results.len(), query);
    print_items(results.into_iter());

    Ok(())
}

/// Print the tag registry of a built index
fn list_tags(index_path: &std::path::Path) -> Result<()> {
    let catalog = Catalog::load(index_path)?;

    for tag in catalog.tags().as_slice() {
        println!("{}", tag);
    }

    Ok(())
}

fn print_items<'a>(items: impl Iterator<Item = &'a ContentItem>) {
    println!("{:<8} {:<22} {:<40} {:<30}", "ID", "MODIFIED", "TITLE", "PATH");
    println!("{}", "-".repeat(100));

    for item in items {
        println!(
            "{:<8} {:<22} {:<40} {:<30}",
            item.id,
            item.created_at.format("%Y-%m-%d %H:%M:%S"),
            truncate(&item.title, 37),
            item.path
        );
    }
}

/// Truncate on a char boundary, appending "..." when shortened
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

/// Show resolved configuration
fn show_config(settings: &Settings) {
    println!("content-indexer configuration");
    println!();
    println!(
        "Config file: {}",
        settings
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using flags, env and defaults)".to_string())
    );
    println!();
    println!("Root:        {}", settings.root.display());
    println!("Base URL:    {}", settings.base_url);
    println!("Index:       {}", settings.index_path.display());
    println!(
        "Tag index:   {}",
        settings
            .tag_index_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(disabled)".to_string())
    );
    println!("Pretty JSON: {}", settings.pretty);
    println!("Exclude:");
    if settings.exclude.is_empty() {
        println!("  (none)");
    } else {
        for pattern in &settings.exclude {
            println!("  {}", pattern);
        }
    }
}
