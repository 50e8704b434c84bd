//! Region isolation
//!
//! Cuts one annotated region out of a page image. Rectangles become a
//! plain padded crop; polygons are rasterized into a full-page mask and
//! every pixel outside the polygon is zeroed in the crop.

use crate::error::RoiError;
use crate::geometry::Rect;
use crate::roi::{RoiShape, ShapeKind};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

/// Fixed margin added around every region before clamping to the page.
pub const REGION_PADDING: i32 = 5;

/// One isolated region: shape kind, padded bounding box in page
/// coordinates, and the cropped pixels (masked for polygons).
#[derive(Debug, Clone)]
pub struct RegionCrop {
    pub kind: ShapeKind,
    pub bbox: Rect,
    pub image: RgbImage,
}

pub fn isolate_region(page: &RgbImage, shape: &RoiShape) -> Result<RegionCrop, RoiError> {
    match shape {
        RoiShape::Rectangle { left, top, right, bottom } => {
            let bbox = Rect::new(*left, *top, *right, *bottom)
                .pad(REGION_PADDING)
                .clamp_to(page.width(), page.height());
            if bbox.is_degenerate() {
                return Err(RoiError::DegenerateRegion(bbox));
            }
            Ok(RegionCrop {
                kind: ShapeKind::Rectangle,
                bbox,
                image: crop_rgb(page, &bbox),
            })
        }
        RoiShape::Polygon { vertices } => isolate_polygon(page, vertices),
        RoiShape::Unsupported { kind } => Err(RoiError::UnsupportedShape(*kind)),
    }
}

fn isolate_polygon(page: &RgbImage, vertices: &[(i32, i32)]) -> Result<RegionCrop, RoiError> {
    if vertices.len() < 2 {
        return Err(RoiError::InsufficientGeometry(vertices.len()));
    }

    let bbox = vertex_bounds(vertices)
        .pad(REGION_PADDING)
        .clamp_to(page.width(), page.height());
    if bbox.is_degenerate() {
        return Err(RoiError::DegenerateRegion(bbox));
    }

    // The mask is rasterized against the full page with an identity
    // transform, so vertex coordinates need no shifting before the crop.
    let mask = rasterize_polygon(page.width(), page.height(), vertices)?;
    let mask_crop = crop_gray(&mask, &bbox);

    let mut image = crop_rgb(page, &bbox);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        if mask_crop.get_pixel(x, y)[0] == 0 {
            *pixel = Rgb([0, 0, 0]);
        }
    }

    Ok(RegionCrop { kind: ShapeKind::Polygon, bbox, image })
}

fn vertex_bounds(vertices: &[(i32, i32)]) -> Rect {
    let mut bounds = Rect::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN);
    for &(x, y) in vertices {
        bounds.left = bounds.left.min(x);
        bounds.top = bounds.top.min(y);
        bounds.right = bounds.right.max(x);
        bounds.bottom = bounds.bottom.max(y);
    }
    bounds
}

fn rasterize_polygon(
    width: u32,
    height: u32,
    vertices: &[(i32, i32)],
) -> Result<GrayImage, RoiError> {
    let mut points: Vec<Point<i32>> = vertices.iter().map(|&(x, y)| Point::new(x, y)).collect();
    points.dedup();
    // draw_polygon_mut wants an open ring
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() < 2 {
        return Err(RoiError::InsufficientGeometry(points.len()));
    }

    let mut mask = GrayImage::new(width, height);
    draw_polygon_mut(&mut mask, &points, Luma([255u8]));
    Ok(mask)
}

fn crop_rgb(page: &RgbImage, bbox: &Rect) -> RgbImage {
    image::imageops::crop_imm(
        page,
        bbox.left as u32,
        bbox.top as u32,
        bbox.width() as u32,
        bbox.height() as u32,
    )
    .to_image()
}

fn crop_gray(mask: &GrayImage, bbox: &Rect) -> GrayImage {
    image::imageops::crop_imm(
        mask,
        bbox.left as u32,
        bbox.top as u32,
        bbox.width() as u32,
        bbox.height() as u32,
    )
    .to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_page(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([200, 200, 200]))
    }

    #[test]
    fn rectangle_bbox_is_padded_and_clamped() {
        let page = white_page(500, 400);
        let shape = RoiShape::Rectangle { left: 100, top: 50, right: 180, bottom: 90 };
        let region = isolate_region(&page, &shape).unwrap();
        assert_eq!(region.bbox, Rect::new(95, 45, 185, 95));
        assert_eq!(region.image.dimensions(), (90, 50));
        assert_eq!(region.kind, ShapeKind::Rectangle);
    }

    #[test]
    fn rectangle_near_origin_clamps_to_page() {
        let page = white_page(100, 100);
        let shape = RoiShape::Rectangle { left: 2, top: 3, right: 40, bottom: 30 };
        let region = isolate_region(&page, &shape).unwrap();
        assert_eq!(region.bbox, Rect::new(0, 0, 45, 35));
    }

    #[test]
    fn polygon_pixels_outside_are_zeroed_inside_untouched() {
        let page = white_page(100, 100);
        // closed square 20..40 x 20..40
        let shape = RoiShape::Polygon {
            vertices: vec![(20, 20), (40, 20), (40, 40), (20, 40), (20, 20)],
        };
        let region = isolate_region(&page, &shape).unwrap();
        assert_eq!(region.bbox, Rect::new(15, 15, 45, 45));
        assert_eq!(region.kind, ShapeKind::Polygon);

        // center of the square, in crop coordinates
        let inside = region.image.get_pixel(30 - 15, 30 - 15);
        assert_eq!(*inside, Rgb([200, 200, 200]));
        // padding ring is outside the polygon
        let outside = region.image.get_pixel(0, 0);
        assert_eq!(*outside, Rgb([0, 0, 0]));
    }

    #[test]
    fn single_vertex_polygon_is_insufficient() {
        let page = white_page(100, 100);
        let shape = RoiShape::Polygon { vertices: vec![(20, 20)] };
        assert!(matches!(
            isolate_region(&page, &shape),
            Err(RoiError::InsufficientGeometry(1))
        ));
    }

    #[test]
    fn repeated_identical_vertices_are_insufficient() {
        let page = white_page(100, 100);
        let shape = RoiShape::Polygon { vertices: vec![(20, 20), (20, 20), (20, 20)] };
        assert!(matches!(
            isolate_region(&page, &shape),
            Err(RoiError::InsufficientGeometry(_))
        ));
    }

    #[test]
    fn unsupported_shape_is_reported() {
        let page = white_page(100, 100);
        assert!(matches!(
            isolate_region(&page, &RoiShape::Unsupported { kind: 2 }),
            Err(RoiError::UnsupportedShape(2))
        ));
    }
}
