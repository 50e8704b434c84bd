//! Axis-aligned integer rectangles in image coordinates.
//!
//! Shared by the region isolator (page coordinates), the OCR adapter
//! (candidate coordinates) and the output records.

use std::fmt;

/// A rectangle with exclusive right/bottom edges, `(left, top, right, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Grow the rectangle by `margin` on every side. No clamping.
    pub fn pad(&self, margin: i32) -> Rect {
        Rect::new(
            self.left - margin,
            self.top - margin,
            self.right + margin,
            self.bottom + margin,
        )
    }

    /// Clamp every edge into `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: u32, height: u32) -> Rect {
        let w = width as i32;
        let h = height as i32;
        Rect::new(
            self.left.clamp(0, w),
            self.top.clamp(0, h),
            self.right.clamp(0, w),
            self.bottom.clamp(0, h),
        )
    }

    /// Clamp only the left/top edges to be non-negative.
    pub fn clamp_low(&self) -> Rect {
        Rect::new(self.left.max(0), self.top.max(0), self.right, self.bottom)
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() < 1 || self.height() < 1
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.left, self.top, self.right, self.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_and_clamp_within_page() {
        // 80x40 word box on a 500x400 page
        let rect = Rect::new(100, 50, 180, 90).pad(5).clamp_to(500, 400);
        assert_eq!(rect, Rect::new(95, 45, 185, 95));
    }

    #[test]
    fn pad_and_clamp_at_page_edges() {
        let rect = Rect::new(2, 3, 499, 399).pad(5).clamp_to(500, 400);
        assert_eq!(rect, Rect::new(0, 0, 500, 400));
    }

    #[test]
    fn clamp_low_leaves_high_edges_alone() {
        let rect = Rect::new(-3, -7, 120, 60).clamp_low();
        assert_eq!(rect, Rect::new(0, 0, 120, 60));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(10, 10, 40, 25);
        let b = Rect::new(50, 8, 70, 20);
        assert_eq!(a.union(&b), Rect::new(10, 8, 70, 25));
    }

    #[test]
    fn translate_shifts_all_edges() {
        let rect = Rect::new(5, 5, 45, 30).translate(95, 45);
        assert_eq!(rect, Rect::new(100, 50, 140, 75));
    }

    #[test]
    fn degenerate_detection() {
        assert!(Rect::new(10, 10, 10, 20).is_degenerate());
        assert!(!Rect::new(10, 10, 11, 11).is_degenerate());
    }

    #[test]
    fn display_matches_output_format() {
        assert_eq!(Rect::new(95, 45, 185, 95).to_string(), "(95, 45, 185, 95)");
    }
}
