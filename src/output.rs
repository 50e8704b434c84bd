//! CSV output and the end-of-run summary.

use crate::geometry::Rect;
use crate::vision::cascade::Strategy;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub const CSV_COLUMNS: [&str; 7] = [
    "page",
    "roi_file",
    "roi_type",
    "ocr_text",
    "ocr_bbox",
    "debug_image",
    "ocr_method",
];

/// One row per processed region, appended in processing order.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    pub page: String,
    pub roi_file: String,
    pub roi_type: String,
    pub ocr_text: String,
    pub ocr_bbox: Option<Rect>,
    pub debug_image: String,
    pub ocr_method: String,
}

/// Write all records. The header row is written even when there are no
/// data rows; an absent bbox serializes as an empty field.
pub fn write_csv(path: &Path, records: &[OutputRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        let bbox = record
            .ocr_bbox
            .map(|b| b.to_string())
            .unwrap_or_default();
        writer.write_record([
            record.page.as_str(),
            record.roi_file.as_str(),
            record.roi_type.as_str(),
            record.ocr_text.as_str(),
            bbox.as_str(),
            record.debug_image.as_str(),
            record.ocr_method.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Log how many regions each cascade stage resolved, `none` included.
pub fn log_summary(records: &[OutputRecord]) {
    let total = records.len();
    if total == 0 {
        info!("no ROIs were processed");
        return;
    }
    info!("total ROIs processed: {total}");
    let methods = Strategy::ALL
        .iter()
        .map(|s| s.name())
        .chain(std::iter::once("none"));
    for method in methods {
        let count = records.iter().filter(|r| r.ocr_method == method).count();
        info!(
            "{method}: {count} ({:.1}%)",
            count as f64 / total as f64 * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(method: &str, bbox: Option<Rect>) -> OutputRecord {
        OutputRecord {
            page: "page_001".to_string(),
            roi_file: "0042-0117.roi".to_string(),
            roi_type: "Rectangular".to_string(),
            ocr_text: "cat".to_string(),
            ocr_bbox: bbox,
            debug_image: "page_001_0042-0117_cat.png".to_string(),
            ocr_method: method.to_string(),
        }
    }

    #[test]
    fn header_is_written_even_without_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        write_csv(&path, &[]).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents.trim(),
            "page,roi_file,roi_type,ocr_text,ocr_bbox,debug_image,ocr_method"
        );
    }

    #[test]
    fn bbox_serializes_as_tuple_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        write_csv(
            &path,
            &[
                record("otsu", Some(Rect::new(100, 50, 140, 75))),
                record("none", None),
            ],
        )
        .unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("\"(100, 50, 140, 75)\""));
        assert!(lines[2].contains("cat,,page_001"));
    }
}
