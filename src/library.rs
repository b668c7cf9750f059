//! Library directory scanning.
//!
//! Enumerates supported documents under a root directory with a stable id per
//! file, derived from a hash of its path so ids survive rescans. Decoding the
//! files is someone else's job; this module only lists them.

use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extensions the decoders downstream can handle.
pub const SUPPORTED_EXTS: [&str; 3] = ["pdf", "epub", "docx"];

#[derive(Debug, Clone, Serialize)]
pub struct LibraryEntry {
    pub id: String,
    pub title: String,
    pub path: PathBuf,
    pub ext: String,
}

/// Recursively scan `root` for supported documents, sorted by title
/// case-insensitively. Unreadable subdirectories are skipped, not fatal.
pub fn scan_library(root: &Path) -> Result<Vec<LibraryEntry>> {
    let mut entries = Vec::new();
    collect_entries(root, &mut entries)
        .with_context(|| format!("Failed to scan library at {}", root.display()))?;
    entries.sort_by_key(|entry| entry.title.to_lowercase());
    info!(root = %root.display(), count = entries.len(), "Scanned library");
    Ok(entries)
}

/// Stable id for a book file: hex SHA-256 of its path.
pub fn book_id(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_os_str().to_string_lossy().as_bytes());
    format!("{:x}", hasher.finalize())
}

fn collect_entries(dir: &Path, entries: &mut Vec<LibraryEntry>) -> Result<()> {
    let reader = fs::read_dir(dir)?;
    for entry in reader {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if path.is_dir() {
            if let Err(err) = collect_entries(&path, entries) {
                debug!(path = %path.display(), "Skipping unreadable directory: {err}");
            }
            continue;
        }
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            continue;
        };
        let ext = ext.to_lowercase();
        if !SUPPORTED_EXTS.contains(&ext.as_str()) {
            continue;
        }
        let title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("untitled")
            .to_string();
        entries.push(LibraryEntry {
            id: book_id(&path),
            title,
            path,
            ext,
        });
    }
    Ok(())
}
