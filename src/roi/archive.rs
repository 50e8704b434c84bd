//! Page archive handling
//!
//! Each page's ROI set arrives as a zip archive named `<page>roiset.zip`.
//! The archive pairs with the page image `<page>.png`; extraction happens
//! into a scoped temp directory that is removed when it goes out of scope,
//! on every exit path.

use crate::error::ArchiveError;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Suffix stripped from an archive name to recover the page base name.
pub const ARCHIVE_SUFFIX: &str = "roiset.zip";

/// Base name shared by an archive and its page image.
pub fn page_base_name(zip_path: &Path) -> String {
    let name = zip_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.to_lowercase().ends_with(ARCHIVE_SUFFIX) {
        name[..name.len() - ARCHIVE_SUFFIX.len()].to_string()
    } else {
        zip_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or(name)
    }
}

/// Unpack the archive into a fresh temp directory. The directory is
/// deleted when the returned handle is dropped.
pub fn extract_archive(zip_path: &Path) -> Result<TempDir, ArchiveError> {
    let file = File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let dir = tempfile::tempdir()?;
    archive.extract(dir.path())?;
    Ok(dir)
}

/// All `.roi` files directly under `dir`, sorted by name for reproducible
/// processing order.
pub fn roi_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("roi"))
                .unwrap_or(false)
        })
        .collect();
    entries.sort();
    Ok(entries)
}
