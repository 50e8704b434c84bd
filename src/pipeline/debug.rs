//! Debug annotation and the per-region composite image.
//!
//! Every attempted candidate gets its detection box drawn and, when a
//! system font is available, its stage name in the top-left corner. The
//! composite lines up the original crop and all attempts left to right.

use crate::geometry::Rect;
use crate::vision::cascade::Candidate;
use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect as DrawRect;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const LABEL_SCALE: f32 = 14.0;
const FILENAME_MAX: usize = 32;

/// Draws detection boxes and stage labels onto candidate copies. Labels
/// are skipped when no usable system font is found.
pub struct Labeler {
    font: Option<FontVec>,
}

impl Labeler {
    pub fn new() -> Self {
        Self { font: load_font() }
    }

    pub fn annotate(&self, candidate: &Candidate, bbox: Option<&Rect>) -> RgbImage {
        let mut canvas = DynamicImage::ImageLuma8(candidate.image.clone()).to_rgb8();
        if let Some(bbox) = bbox {
            draw_box(&mut canvas, bbox);
        }
        if let Some(font) = &self.font {
            draw_text_mut(
                &mut canvas,
                BOX_COLOR,
                2,
                2,
                PxScale::from(LABEL_SCALE),
                font,
                candidate.strategy.name(),
            );
        }
        canvas
    }
}

impl Default for Labeler {
    fn default() -> Self {
        Self::new()
    }
}

/// Two nested hollow rectangles approximate a 2 px stroke.
fn draw_box(canvas: &mut RgbImage, bbox: &Rect) {
    for inset in 0..2 {
        let width = bbox.width() - 2 * inset;
        let height = bbox.height() - 2 * inset;
        if width < 1 || height < 1 {
            break;
        }
        draw_hollow_rect_mut(
            canvas,
            DrawRect::at(bbox.left + inset, bbox.top + inset)
                .of_size(width as u32, height as u32),
            BOX_COLOR,
        );
    }
}

/// Original crop followed by every attempted candidate, left to right,
/// top-aligned on a black canvas of summed widths and maximum height.
pub fn compose(original: &RgbImage, attempts: &[RgbImage]) -> RgbImage {
    let width = original.width() + attempts.iter().map(|a| a.width()).sum::<u32>();
    let height = attempts
        .iter()
        .map(|a| a.height())
        .fold(original.height(), u32::max);

    let mut canvas = RgbImage::new(width, height);
    let mut x: i64 = 0;
    for tile in std::iter::once(original).chain(attempts.iter()) {
        image::imageops::replace(&mut canvas, tile, x, 0);
        x += tile.width() as i64;
    }
    canvas
}

/// Replace everything outside `[A-Za-z0-9_-]` with underscores and cap
/// the length.
pub fn sanitize_filename(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .take(FILENAME_MAX)
        .collect()
}

/// `{page}_{roi_stem}_{word}.png`, with `[none]` standing in for empty text.
pub fn debug_file_name(page: &str, roi_stem: &str, text: &str) -> String {
    let word = if text.trim().is_empty() {
        "[none]".to_string()
    } else {
        sanitize_filename(text)
    };
    format!("{page}_{roi_stem}_{word}.png")
}

fn load_font() -> Option<FontVec> {
    const FONT_PATHS: [&str; 4] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    for path in FONT_PATHS {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }
    None
}
