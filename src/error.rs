//! Error taxonomy for the batch pipeline.
//!
//! Failures are contained at the smallest meaningful unit: a `RoiError`
//! skips one region, an `ArchiveError` skips one page archive. Nothing in
//! either enum aborts the batch.

use crate::geometry::Rect;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while processing a single ROI. The batch driver logs these and
/// moves on to the next region.
#[derive(Debug, Error)]
pub enum RoiError {
    #[error("polygon has {0} usable vertices, need at least 2")]
    InsufficientGeometry(usize),

    #[error("region bounds {0} are degenerate")]
    DegenerateRegion(Rect),

    #[error("ROI shape kind {0} is not handled")]
    UnsupportedShape(u8),

    #[error("malformed ROI file: {0}")]
    Malformed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Failure while processing a whole page archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("no matching page image at {}", .0.display())]
    MissingPageImage(PathBuf),

    #[error("unreadable archive: {0}")]
    Unreadable(#[from] zip::result::ZipError),

    #[error("unreadable page image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
