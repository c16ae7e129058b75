use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Normalize a document key: strip leading/trailing slashes, reject `.`/`..`
/// segments, and collapse repeated slashes.
///
/// Unlike a tree path, a key must name a file, so an input that collapses
/// to nothing is an error.
///
/// # Arguments
/// * `key` - The raw key string to normalize.
///
/// # Errors
/// Returns [`Error::InvalidPath`] if the key is empty, contains `..`
/// segments, or collapses to nothing.
pub fn normalize_key(key: &str) -> Result<String> {
    let mut segments: Vec<&str> = Vec::new();
    for seg in key.split('/') {
        if seg.is_empty() {
            // skip empty segments (from leading/trailing/double slashes)
            continue;
        }
        if seg == ".." {
            return Err(Error::invalid_path(format!(
                "key segment '{}' is not allowed",
                seg,
            )));
        }
        if seg == "." {
            continue; // collapse current-directory markers
        }
        segments.push(seg);
    }

    if segments.is_empty() {
        return Err(Error::invalid_path("key must not be empty"));
    }

    Ok(segments.join("/"))
}

/// Map a document key to its absolute location under `base`.
///
/// # Errors
/// Returns [`Error::InvalidPath`] if the key fails [`normalize_key`].
pub fn key_path(base: &Path, key: &str) -> Result<PathBuf> {
    Ok(base.join(normalize_key(key)?))
}

/// Validate a collection name.
///
/// Collections map onto direct subdirectories of the repository base path,
/// so a name must normalize to a single path segment.
///
/// # Errors
/// Returns [`Error::InvalidPath`] if the name fails [`normalize_key`] or
/// spans more than one segment.
pub fn collection_name(name: &str) -> Result<String> {
    let name = normalize_key(name)?;
    if name.contains('/') {
        return Err(Error::invalid_path(format!(
            "collection name '{}' must be a single path segment",
            name,
        )));
    }
    Ok(name)
}
