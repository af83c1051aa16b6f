//! Provider boundary: loads JSON model snapshots from disk.

use super::{CodeModel, ModelError, ModelSnapshot};
use std::path::{Path, PathBuf};

/// Parses snapshot content.
///
/// # Errors
///
/// Returns [`ModelError::Parse`] if the content is not a valid snapshot.
pub fn parse_snapshot(content: &str) -> Result<ModelSnapshot, ModelError> {
    serde_json::from_str(content).map_err(|source| ModelError::Parse {
        path: PathBuf::from("<inline>"),
        source,
    })
}

/// Reads and parses one snapshot file.
///
/// # Errors
///
/// Returns [`ModelError::Io`] or [`ModelError::Parse`].
pub fn load_snapshot(path: &Path) -> Result<ModelSnapshot, ModelError> {
    let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves `pattern` relative to `base`, merges every matching snapshot
/// (in path order) and builds the model.
///
/// # Errors
///
/// Returns an error if the pattern is invalid, matches nothing, a file
/// cannot be read or parsed, or the merged model is inconsistent.
pub fn load_model(base: &Path, pattern: &str) -> Result<CodeModel, ModelError> {
    let full = if Path::new(pattern).is_absolute() {
        PathBuf::from(pattern)
    } else {
        base.join(pattern)
    };
    let full = full.to_string_lossy().into_owned();

    let entries = glob::glob(&full).map_err(|e| ModelError::Glob {
        pattern: pattern.to_string(),
        reason: e.msg.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(path = %e.path().display(), "Skipping unreadable snapshot path");
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(ModelError::NoSnapshots {
            pattern: pattern.to_string(),
        });
    }

    let mut snapshot = ModelSnapshot::default();
    for path in &paths {
        tracing::debug!(path = %path.display(), "Loading model snapshot");
        snapshot.merge(load_snapshot(path)?);
    }

    tracing::info!(
        snapshots = paths.len(),
        classes = snapshot.classes.len(),
        "Loaded code model"
    );
    CodeModel::from_snapshot(snapshot)
}
