//! OCR engine seam and result reduction
//!
//! The engine is a trait so the resolution controller can be exercised
//! with scripted detections in tests; the production implementation runs
//! Tesseract word-level recognition via `rusty_tesseract`.

use crate::config::OcrSettings;
use crate::geometry::Rect;
use anyhow::{anyhow, Result};
use image::DynamicImage;
use std::collections::HashMap;

/// Padding added around the union of accepted word boxes.
const RESULT_PADDING: i32 = 5;

/// One word-level detection, in candidate-image coordinates.
#[derive(Debug, Clone)]
pub struct WordDetection {
    pub text: String,
    pub confidence: f32,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Word-level OCR over a single image.
pub trait OcrEngine {
    fn detect_words(&self, image: &DynamicImage) -> Result<Vec<WordDetection>>;
}

/// Combined result for one candidate image. `bbox` is `None` exactly when
/// no detection survived the confidence/emptiness filter.
#[derive(Debug, Clone, Default)]
pub struct OcrOutcome {
    pub text: String,
    pub bbox: Option<Rect>,
}

/// Reduce raw detections to one space-joined string and one padded box
/// covering every accepted word. Words with empty trimmed text or
/// non-positive confidence are dropped. The padded box is clamped to >= 0
/// on the left/top only; the right/bottom may exceed the candidate image.
pub fn combine_detections(detections: &[WordDetection]) -> OcrOutcome {
    let mut texts: Vec<&str> = Vec::new();
    let mut union: Option<Rect> = None;

    for detection in detections {
        let text = detection.text.trim();
        if text.is_empty() || detection.confidence <= 0.0 {
            continue;
        }
        texts.push(text);
        let rect = Rect::new(
            detection.left,
            detection.top,
            detection.left + detection.width,
            detection.top + detection.height,
        );
        union = Some(match union {
            Some(current) => current.union(&rect),
            None => rect,
        });
    }

    match union {
        None => OcrOutcome::default(),
        Some(bbox) => OcrOutcome {
            text: texts.join(" "),
            bbox: Some(bbox.pad(RESULT_PADDING).clamp_low()),
        },
    }
}

/// Tesseract-backed engine.
pub struct TesseractEngine {
    args: rusty_tesseract::Args,
}

impl TesseractEngine {
    pub fn new(settings: &OcrSettings) -> Self {
        Self {
            args: rusty_tesseract::Args {
                lang: settings.lang.clone(),
                config_variables: HashMap::new(),
                dpi: settings.dpi,
                psm: settings.psm,
                oem: settings.oem,
            },
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn detect_words(&self, image: &DynamicImage) -> Result<Vec<WordDetection>> {
        let tess_image = rusty_tesseract::Image::from_dynamic_image(image)
            .map_err(|e| anyhow!("converting image for tesseract: {e}"))?;
        let data = rusty_tesseract::image_to_data(&tess_image, &self.args)
            .map_err(|e| anyhow!("tesseract image_to_data: {e}"))?;
        Ok(data
            .data
            .into_iter()
            .map(|record| WordDetection {
                text: record.text,
                confidence: record.conf,
                left: record.left,
                top: record.top,
                width: record.width,
                height: record.height,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, confidence: f32, left: i32, top: i32, width: i32, height: i32) -> WordDetection {
        WordDetection { text: text.to_string(), confidence, left, top, width, height }
    }

    #[test]
    fn single_word_box_is_padded_and_low_clamped() {
        let outcome = combine_detections(&[word("cat", 90.0, 10, 10, 30, 15)]);
        assert_eq!(outcome.text, "cat");
        // union (10,10,40,25), padded by 5, negatives clamped to 0
        assert_eq!(outcome.bbox, Some(Rect::new(5, 5, 45, 30)));
    }

    #[test]
    fn high_edges_are_not_clamped() {
        // box flush against the top-left corner of a small candidate
        let outcome = combine_detections(&[word("cat", 90.0, 0, 0, 30, 15)]);
        let bbox = outcome.bbox.unwrap();
        assert_eq!((bbox.left, bbox.top), (0, 0));
        // right/bottom keep the full padding even past the image edge
        assert_eq!((bbox.right, bbox.bottom), (35, 20));
    }

    #[test]
    fn low_confidence_and_blank_words_are_dropped() {
        let outcome = combine_detections(&[
            word("  ", 95.0, 0, 0, 10, 10),
            word("ghost", 0.0, 0, 0, 10, 10),
            word("ghost", -1.0, 0, 0, 10, 10),
        ]);
        assert_eq!(outcome.text, "");
        assert_eq!(outcome.bbox, None);
    }

    #[test]
    fn multiple_words_join_in_order_and_union_boxes() {
        let outcome = combine_detections(&[
            word("dictionary", 88.0, 10, 10, 40, 15),
            word("page", 73.0, 60, 12, 25, 14),
        ]);
        assert_eq!(outcome.text, "dictionary page");
        assert_eq!(outcome.bbox, Some(Rect::new(5, 5, 90, 31)));
    }

    #[test]
    fn whitespace_is_trimmed_from_kept_words() {
        let outcome = combine_detections(&[word(" cat ", 90.0, 10, 10, 30, 15)]);
        assert_eq!(outcome.text, "cat");
    }
}
