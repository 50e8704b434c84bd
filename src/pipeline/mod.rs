//! Resolution of one region
//!
//! Drives the preprocessing cascade: each stage's candidate goes through
//! OCR and validation, and the first stage whose text passes with a
//! detection box present wins. Every attempt leaves an annotated image
//! behind for the debug composite, winner or not.

pub mod debug;

use crate::geometry::Rect;
use crate::validate::Validator;
use crate::vision::cascade::{Candidate, Cascade, Strategy};
use crate::vision::isolate::RegionCrop;
use crate::vision::ocr::{combine_detections, OcrEngine, OcrOutcome};
use image::{DynamicImage, RgbImage};
use tracing::{debug as trace_debug, warn};

/// Terminal outcome of one region's cascade.
#[derive(Debug)]
pub struct Resolution {
    /// Winning stage, `None` when every stage was exhausted.
    pub strategy: Option<Strategy>,
    pub text: String,
    /// Detection box in region-local coordinates.
    pub local_bbox: Option<Rect>,
    /// Annotated copy of every attempted candidate, in cascade order.
    pub attempts: Vec<RgbImage>,
}

impl Resolution {
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.map(Strategy::name).unwrap_or("none")
    }

    /// Detection box translated into page coordinates.
    pub fn page_bbox(&self, region_bbox: &Rect) -> Option<Rect> {
        self.local_bbox
            .map(|bbox| bbox.translate(region_bbox.left, region_bbox.top))
    }
}

pub fn resolve_region(
    region: &RegionCrop,
    engine: &dyn OcrEngine,
    validator: &Validator,
    labeler: &debug::Labeler,
) -> Resolution {
    let mut attempts = Vec::new();

    for candidate in Cascade::new(&region.image) {
        let outcome = run_stage(engine, &candidate);
        attempts.push(labeler.annotate(&candidate, outcome.bbox.as_ref()));

        match (validator.validate(&outcome.text), outcome.bbox) {
            (Some(text), Some(bbox)) => {
                trace_debug!(
                    "stage {} accepted text '{}' at {}",
                    candidate.strategy.name(),
                    text,
                    bbox
                );
                return Resolution {
                    strategy: Some(candidate.strategy),
                    text,
                    local_bbox: Some(bbox),
                    attempts,
                };
            }
            _ => trace_debug!("stage {} rejected", candidate.strategy.name()),
        }
    }

    Resolution { strategy: None, text: String::new(), local_bbox: None, attempts }
}

/// An engine failure on one stage is an empty result, not a fatal error;
/// the cascade moves on to the next stage.
fn run_stage(engine: &dyn OcrEngine, candidate: &Candidate) -> OcrOutcome {
    let image = DynamicImage::ImageLuma8(candidate.image.clone());
    match engine.detect_words(&image) {
        Ok(detections) => combine_detections(&detections),
        Err(err) => {
            warn!(
                "OCR engine failed on stage {}, treating as empty: {err:#}",
                candidate.strategy.name()
            );
            OcrOutcome::default()
        }
    }
}
