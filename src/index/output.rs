//! Writing the index and tag index.
//!
//! Both documents are serialized into temp files beside their targets before
//! either is renamed into place, so an encode or staging failure leaves the
//! previous outputs untouched. The tag index is persisted first: if the final
//! rename of the index fails, the old index (and the ids it records) is still
//! what the next build reads. Replaced files keep their permissions; new ones
//! are created `0644`.

use std::fs::Permissions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;

use super::builder::{ContentIndex, IndexError};

/// Mode for outputs that do not exist yet
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Where and how to write a build's outputs
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Index file path
    pub index_path: PathBuf,

    /// Tag index file path; `None` disables tag-index output
    pub tag_index_path: Option<PathBuf>,

    /// Indent JSON instead of writing it compact
    pub pretty: bool,
}

/// Paths that were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutputs {
    pub index: PathBuf,
    pub tag_index: Option<PathBuf>,
}

/// Write the index (and tag index, when enabled) atomically
pub fn write_outputs(
    index: &ContentIndex,
    options: &OutputOptions,
) -> Result<WrittenOutputs, IndexError> {
    let index_tmp = stage_json(&options.index_path, &index.items, options.pretty)?;

    let tag_tmp = match &options.tag_index_path {
        Some(path) => Some((path, stage_json(path, &index.tags, options.pretty)?)),
        None => None,
    };

    let tag_index = match tag_tmp {
        Some((path, tmp)) => {
            persist(tmp, path)?;
            tracing::info!(
                "Wrote tag index with {} tags to {}",
                index.tags.len(),
                path.display()
            );
            Some(path.clone())
        }
        None => None,
    };

    persist(index_tmp, &options.index_path)?;
    tracing::info!(
        "Wrote index with {} items to {}",
        index.items.len(),
        options.index_path.display()
    );

    Ok(WrittenOutputs {
        index: options.index_path.clone(),
        tag_index,
    })
}

/// Serialize `value` into a temp file in the target's directory
fn stage_json<T: Serialize + ?Sized>(
    target: &Path,
    value: &T,
    pretty: bool,
) -> Result<NamedTempFile, IndexError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_err = |source| IndexError::Write {
        path: target.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        let encoded = if pretty {
            serde_json::to_writer_pretty(&mut writer, value)
        } else {
            serde_json::to_writer(&mut writer, value)
        };
        encoded.map_err(|source| IndexError::Encode {
            path: target.to_path_buf(),
            source,
        })?;
        writer.write_all(b"\n").map_err(write_err)?;
        writer.flush().map_err(write_err)?;
    }

    if let Some(permissions) = target_permissions(target) {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(write_err)?;
    }

    Ok(tmp)
}

/// Permissions the staged file should carry once it replaces `target`
fn target_permissions(target: &Path) -> Option<Permissions> {
    if let Ok(meta) = std::fs::metadata(target) {
        return Some(meta.permissions());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(Permissions::from_mode(NEW_FILE_MODE))
    }

    #[cfg(not(unix))]
    {
        None
    }
}

fn persist(tmp: NamedTempFile, target: &Path) -> Result<(), IndexError> {
    tmp.persist(target).map_err(|e| IndexError::Write {
        path: target.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
