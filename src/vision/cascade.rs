//! Preprocessing strategy cascade
//!
//! The fixed, ordered list of image transforms tried against a region
//! until one of them yields a validated word. Stages are produced lazily
//! so an early acceptance skips all remaining work.

use image::{GrayImage, RgbImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::erode;

/// Sigma matching a 5x5 Gaussian kernel.
const BLUR_SIGMA: f32 = 1.1;
/// L-infinity radius of the erosion applied to the Otsu output.
const ERODE_RADIUS: u8 = 2;

/// Cascade stages, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Otsu,
    Eroded,
    Fallback,
    CropTop10,
    CropTop20,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Otsu,
        Strategy::Eroded,
        Strategy::Fallback,
        Strategy::CropTop10,
        Strategy::CropTop20,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Otsu => "otsu",
            Strategy::Eroded => "eroded",
            Strategy::Fallback => "fallback",
            Strategy::CropTop10 => "croptop10",
            Strategy::CropTop20 => "croptop20",
        }
    }
}

/// One preprocessed image produced by a single cascade stage.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub strategy: Strategy,
    pub image: GrayImage,
}

/// Pull-based iterator over the cascade. A stage's image is not computed
/// until `next` reaches it; `eroded` reuses the cached `otsu` intermediate
/// instead of recomputing the binarization.
pub struct Cascade<'a> {
    region: &'a RgbImage,
    index: usize,
    otsu: Option<GrayImage>,
}

impl<'a> Cascade<'a> {
    pub fn new(region: &'a RgbImage) -> Self {
        Self { region, index: 0, otsu: None }
    }

    fn otsu_image(&mut self) -> &GrayImage {
        let region = self.region;
        self.otsu.get_or_insert_with(|| binarize(region))
    }
}

impl Iterator for Cascade<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        let strategy = *Strategy::ALL.get(self.index)?;
        self.index += 1;
        let image = match strategy {
            Strategy::Otsu => self.otsu_image().clone(),
            Strategy::Eroded => erode(self.otsu_image(), Norm::LInf, ERODE_RADIUS),
            Strategy::Fallback => image::imageops::grayscale(self.region),
            Strategy::CropTop10 => crop_top(&image::imageops::grayscale(self.region), 10),
            Strategy::CropTop20 => crop_top(&image::imageops::grayscale(self.region), 20),
        };
        Some(Candidate { strategy, image })
    }
}

/// Blur + Otsu binarization. The result is normalized to light text on a
/// dark background: whenever the mean comes out above mid-gray the image
/// is inverted.
pub fn binarize(region: &RgbImage) -> GrayImage {
    let gray = image::imageops::grayscale(region);
    let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
    let level = otsu_level(&blurred);
    let mut binary = threshold(&blurred, level, ThresholdType::Binary);
    if mean_brightness(&binary) > 127.0 {
        image::imageops::invert(&mut binary);
    }
    binary
}

/// Drop the top `percent` of rows. Keeps the full image when the cut
/// would leave nothing.
fn crop_top(gray: &GrayImage, percent: u32) -> GrayImage {
    let cut = gray.height() * percent / 100;
    if cut == 0 || cut >= gray.height() {
        return gray.clone();
    }
    image::imageops::crop_imm(gray, 0, cut, gray.width(), gray.height() - cut).to_image()
}

fn mean_brightness(image: &GrayImage) -> f64 {
    if image.is_empty() {
        return 0.0;
    }
    let sum: u64 = image.iter().map(|&p| p as u64).sum();
    sum as f64 / image.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn dark_text_region() -> RgbImage {
        // light background with a dark 10x4 bar
        let mut region = RgbImage::from_pixel(40, 20, Rgb([220, 220, 220]));
        for y in 8..12 {
            for x in 10..20 {
                region.put_pixel(x, y, Rgb([20, 20, 20]));
            }
        }
        region
    }

    #[test]
    fn cascade_order_is_fixed() {
        let region = dark_text_region();
        let order: Vec<&str> = Cascade::new(&region).map(|c| c.strategy.name()).collect();
        assert_eq!(order, vec!["otsu", "eroded", "fallback", "croptop10", "croptop20"]);
    }

    #[test]
    fn binarize_is_bilevel_and_mostly_dark() {
        let binary = binarize(&dark_text_region());
        assert!(binary.iter().all(|&p| p == 0 || p == 255));
        assert!(mean_brightness(&binary) <= 127.0);
    }

    #[test]
    fn binarize_is_deterministic() {
        let region = dark_text_region();
        assert_eq!(binarize(&region), binarize(&region));
    }

    #[test]
    fn crop_top_removes_requested_rows() {
        let gray = GrayImage::new(40, 20);
        assert_eq!(crop_top(&gray, 10).height(), 18);
        assert_eq!(crop_top(&gray, 20).height(), 16);
        assert_eq!(crop_top(&gray, 10).width(), 40);
    }

    #[test]
    fn crop_top_keeps_tiny_images_whole() {
        let gray = GrayImage::new(10, 3);
        // 10% of 3 rows rounds down to zero rows
        assert_eq!(crop_top(&gray, 10).height(), 3);
    }

    #[test]
    fn cascade_candidates_match_region_width() {
        let region = dark_text_region();
        for candidate in Cascade::new(&region) {
            assert_eq!(candidate.image.width(), 40);
        }
    }
}
