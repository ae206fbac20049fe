//! Filesystem helpers shared by the pipelines
//!
//! Two concerns live here: scanning the output directory for completed
//! swath outputs (the retrieval resume check) and writing files atomically
//! so an interrupted run never persists a half-written unit of work.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::warn;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Create a directory (and parents) if it does not exist yet
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::io(format!("failed to create {}", dir.display()), e))?;
    }
    Ok(())
}

/// File stems (names without extension) directly inside `dir`. Missing
/// directories scan as empty, matching a first run with no outputs yet.
pub fn file_stems(dir: &Path) -> Result<HashSet<String>> {
    let mut stems = HashSet::new();
    if !dir.exists() {
        return Ok(stems);
    }
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.insert(stem.to_string());
            }
        }
    }
    Ok(stems)
}

/// Write `bytes` to `path` atomically: a temp file in the same directory
/// takes the content first, then a rename puts it in place
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        Error::io(
            format!("{} has no parent directory", path.display()),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing parent"),
        )
    })?;
    ensure_dir(dir)?;

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::io(format!("failed to create temp file in {}", dir.display()), e))?;
    temp.write_all(bytes)
        .map_err(|e| Error::io(format!("failed to write temp file for {}", path.display()), e))?;
    temp.persist(path)
        .map_err(|e| Error::io(format!("failed to move temp file to {}", path.display()), e.error))?;
    Ok(())
}

/// Remove a file, logging rather than failing when it cannot be removed.
/// Temp-cache cleanup never escalates.
pub fn remove_file_best_effort(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!("could not remove {}: {e}", path.display());
    }
}
