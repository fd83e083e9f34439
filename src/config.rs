//! Configuration for content-indexer.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags
//! 2. Environment variables (CONTENT_ROOT, CONTENT_BASE_URL,
//!    CONTENT_INDEX_PATH, CONTENT_TAG_INDEX_PATH), merged into the flags by clap
//! 3. Config file (.content-indexer/config.yaml)
//! 4. Defaults (./index.json, ./tag_index.json)
//!
//! Config file discovery:
//! - Searches the current directory and parents for .content-indexer/config.yaml
//! - Paths in the config file are relative to the directory containing .content-indexer/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::index::{BuildOptions, OutputOptions};

/// Directory holding the config file
pub const CONFIG_DIR: &str = ".content-indexer";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_INDEX_PATH: &str = "./index.json";
pub const DEFAULT_TAG_INDEX_PATH: &str = "./tag_index.json";

pub const ENV_ROOT: &str = "CONTENT_ROOT";
pub const ENV_BASE_URL: &str = "CONTENT_BASE_URL";
pub const ENV_INDEX_PATH: &str = "CONTENT_INDEX_PATH";
pub const ENV_TAG_INDEX_PATH: &str = "CONTENT_TAG_INDEX_PATH";

/// Errors in the resolved configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{setting} is not set (use --{flag}, {env}, or `{setting}:` in config.yaml)")]
    Missing {
        setting: &'static str,
        flag: &'static str,
        env: &'static str,
    },
}

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    /// Content root (relative to the project directory)
    pub root: Option<String>,
    pub base_url: Option<String>,
    pub index_path: Option<String>,
    pub tag_index_path: Option<String>,
    /// Set to false to skip writing the tag index
    pub tag_index: Option<bool>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub pretty: Option<bool>,
}

/// Values supplied on the command line (or through their env vars)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub base_url: Option<String>,
    pub index_path: Option<PathBuf>,
    pub tag_index_path: Option<PathBuf>,
    pub no_tag_index: bool,
    pub exclude: Vec<String>,
    pub pretty: bool,
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub base_url: String,
    pub index_path: PathBuf,
    /// `None` when tag-index output is disabled
    pub tag_index_path: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub pretty: bool,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Settings {
    /// Options for [`crate::index::IndexBuilder`]
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            root: self.root.clone(),
            base_url: self.base_url.clone(),
            exclude: self.exclude.clone(),
        }
    }

    /// Options for [`crate::index::write_outputs`]
    pub fn output_options(&self) -> OutputOptions {
        OutputOptions {
            index_path: self.index_path.clone(),
            tag_index_path: self.tag_index_path.clone(),
            pretty: self.pretty,
        }
    }
}

/// Find config file by searching `start` and its parents
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Load the config file visible from the current directory (if any) and resolve settings
pub fn load(overrides: &Overrides) -> Result<Settings> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;

    let file = match find_config_file(&cwd) {
        Some(path) => {
            let config = load_config_file(&path)?;
            tracing::debug!("Using config file {}", path.display());
            Some((path, config))
        }
        None => None,
    };

    Ok(resolve(overrides, file)?)
}

/// Merge overrides over an optional config file, then defaults
pub fn resolve(
    overrides: &Overrides,
    file: Option<(PathBuf, ConfigFile)>,
) -> Result<Settings, ConfigError> {
    let (config_file, config) = match file {
        Some((path, config)) => (Some(path), config),
        None => (None, ConfigFile::default()),
    };

    // Project directory is the parent of .content-indexer/
    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let root = non_empty_path(overrides.root.clone())
        .or_else(|| non_empty(config.root.as_deref()).map(|r| resolve_path(&base_dir, r)))
        .ok_or(ConfigError::Missing {
            setting: "root",
            flag: "root",
            env: ENV_ROOT,
        })?;

    let base_url = non_empty(overrides.base_url.as_deref())
        .or_else(|| non_empty(config.base_url.as_deref()))
        .map(str::to_string)
        .ok_or(ConfigError::Missing {
            setting: "base_url",
            flag: "base-url",
            env: ENV_BASE_URL,
        })?;

    let index_path = non_empty_path(overrides.index_path.clone())
        .or_else(|| non_empty(config.index_path.as_deref()).map(|p| resolve_path(&base_dir, p)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_PATH));

    let tag_index_enabled = !overrides.no_tag_index && config.tag_index.unwrap_or(true);
    let tag_index_path = if tag_index_enabled {
        Some(
            non_empty_path(overrides.tag_index_path.clone())
                .or_else(|| {
                    non_empty(config.tag_index_path.as_deref()).map(|p| resolve_path(&base_dir, p))
                })
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TAG_INDEX_PATH)),
        )
    } else {
        None
    };

    let mut exclude = config.exclude;
    exclude.extend(overrides.exclude.iter().cloned());

    Ok(Settings {
        root,
        base_url,
        index_path,
        tag_index_path,
        exclude,
        pretty: overrides.pretty || config.pretty.unwrap_or(false),
        config_file,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|p| !p.as_os_str().is_empty())
}
