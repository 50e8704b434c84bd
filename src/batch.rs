//! Batch driver
//!
//! Walks the annotated directory, pairs each ROI archive with its page
//! image, and funnels every region through the resolution pipeline.
//! Failures are contained: a bad ROI skips that region, a bad archive
//! skips that page, and the batch keeps going either way.

use crate::error::{ArchiveError, RoiError};
use crate::output::{log_summary, write_csv, OutputRecord};
use crate::pipeline::debug::{compose, debug_file_name, Labeler};
use crate::pipeline::resolve_region;
use crate::roi;
use crate::roi::archive::{extract_archive, page_base_name, roi_entries};
use crate::validate::Validator;
use crate::vision::isolate::isolate_region;
use crate::vision::ocr::OcrEngine;
use anyhow::{Context, Result};
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub struct BatchPaths {
    pub annotated_dir: PathBuf,
    pub images_dir: PathBuf,
    pub debug_dir: PathBuf,
    pub output_csv: PathBuf,
}

pub fn run(
    paths: &BatchPaths,
    engine: &dyn OcrEngine,
    validator: &Validator,
) -> Result<Vec<OutputRecord>> {
    reset_debug_dir(&paths.debug_dir)?;
    let labeler = Labeler::new();
    let mut records = Vec::new();

    for zip_path in archive_entries(&paths.annotated_dir)? {
        info!("processing archive {}", zip_path.display());
        if let Err(err) =
            process_archive(&zip_path, paths, engine, validator, &labeler, &mut records)
        {
            warn!("skipping archive {}: {err}", zip_path.display());
        }
    }

    write_csv(&paths.output_csv, &records)?;
    info!("results saved to {}", paths.output_csv.display());
    log_summary(&records);
    Ok(records)
}

fn process_archive(
    zip_path: &Path,
    paths: &BatchPaths,
    engine: &dyn OcrEngine,
    validator: &Validator,
    labeler: &Labeler,
    records: &mut Vec<OutputRecord>,
) -> Result<(), ArchiveError> {
    let base = page_base_name(zip_path);
    let image_path = paths.images_dir.join(format!("{base}.png"));
    if !image_path.exists() {
        return Err(ArchiveError::MissingPageImage(image_path));
    }
    let page = image::open(&image_path)?.to_rgb8();

    // extraction dir is removed when `extracted` drops, on every path
    let extracted = extract_archive(zip_path)?;
    for roi_path in roi_entries(extracted.path())? {
        match process_roi(&roi_path, &base, &page, paths, engine, validator, labeler) {
            Ok(record) => {
                info!(
                    "processed {}: text='{}', bbox={}, method={}",
                    roi_path.display(),
                    record.ocr_text,
                    record
                        .ocr_bbox
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "none".to_string()),
                    record.ocr_method
                );
                records.push(record);
            }
            Err(
                err @ (RoiError::InsufficientGeometry(_)
                | RoiError::DegenerateRegion(_)
                | RoiError::UnsupportedShape(_)),
            ) => {
                warn!("skipping ROI {}: {err}", roi_path.display());
            }
            Err(err) => {
                error!("error processing ROI {}: {err}", roi_path.display());
            }
        }
    }
    Ok(())
}

fn process_roi(
    roi_path: &Path,
    page_base: &str,
    page: &RgbImage,
    paths: &BatchPaths,
    engine: &dyn OcrEngine,
    validator: &Validator,
    labeler: &Labeler,
) -> Result<OutputRecord, RoiError> {
    let shape = roi::read_roi_file(roi_path)?;
    let region = isolate_region(page, &shape)?;
    let resolution = resolve_region(&region, engine, validator, labeler);

    let roi_stem = roi_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = debug_file_name(page_base, &roi_stem, &resolution.text);
    let composite = compose(&region.image, &resolution.attempts);
    composite.save(paths.debug_dir.join(&file_name))?;

    Ok(OutputRecord {
        page: page_base.to_string(),
        roi_file: roi_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        roi_type: region.kind.as_str().to_string(),
        ocr_text: resolution.text.clone(),
        ocr_bbox: resolution.page_bbox(&region.bbox),
        debug_image: file_name,
        ocr_method: resolution.strategy_name().to_string(),
    })
}

/// All `.zip` archives directly under `dir`, sorted by name.
fn archive_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("zip"))
                .unwrap_or(false)
        })
        .collect();
    entries.sort();
    Ok(entries)
}

/// Clear out the debug folder if it exists, then recreate it.
fn reset_debug_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("clearing debug dir {}", dir.display()))?;
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating debug dir {}", dir.display()))?;
    Ok(())
}
