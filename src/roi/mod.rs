//! ImageJ `.roi` file decoding
//!
//! Decodes the binary region-of-interest format written by ImageJ's ROI
//! manager. Only the fields the pipeline needs are read: the shape kind,
//! the rectangle corners and, for polygon/freehand shapes, the vertex
//! arrays. Layout: `Iout` magic, shape type byte at offset 6, big-endian
//! i16 top/left/bottom/right at offsets 8-14, vertex count at 16, and the
//! relative x then y vertex arrays from offset 64.

pub mod archive;

use crate::error::RoiError;
use std::path::Path;

const MAGIC: &[u8; 4] = b"Iout";
const HEADER_LEN: usize = 64;

const TYPE_POLYGON: u8 = 0;
const TYPE_RECT: u8 = 1;
const TYPE_FREEHAND: u8 = 7;

/// Decoded boundary of one annotated region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoiShape {
    Rectangle { left: i32, top: i32, right: i32, bottom: i32 },
    /// Vertices in absolute page coordinates, in file order.
    Polygon { vertices: Vec<(i32, i32)> },
    Unsupported { kind: u8 },
}

/// Shape kind as reported in the output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Polygon,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangular",
            ShapeKind::Polygon => "Freehand",
        }
    }
}

pub fn read_roi_file(path: &Path) -> Result<RoiShape, RoiError> {
    decode_roi(&std::fs::read(path)?)
}

pub fn decode_roi(bytes: &[u8]) -> Result<RoiShape, RoiError> {
    if bytes.len() < HEADER_LEN {
        return Err(RoiError::Malformed(format!(
            "{} bytes, shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        )));
    }
    if &bytes[0..4] != MAGIC {
        return Err(RoiError::Malformed("missing Iout magic".to_string()));
    }

    let kind = bytes[6];
    let top = be_i16(bytes, 8) as i32;
    let left = be_i16(bytes, 10) as i32;
    let bottom = be_i16(bytes, 12) as i32;
    let right = be_i16(bytes, 14) as i32;

    match kind {
        TYPE_RECT => Ok(RoiShape::Rectangle { left, top, right, bottom }),
        TYPE_POLYGON | TYPE_FREEHAND => {
            let count = be_u16(bytes, 16) as usize;
            let needed = HEADER_LEN + 4 * count;
            if bytes.len() < needed {
                return Err(RoiError::Malformed(format!(
                    "vertex data truncated: need {needed} bytes, have {}",
                    bytes.len()
                )));
            }
            // x coordinates first, then y, both relative to the bounds corner
            let mut vertices = Vec::with_capacity(count);
            for i in 0..count {
                let x = be_i16(bytes, HEADER_LEN + 2 * i) as i32 + left;
                let y = be_i16(bytes, HEADER_LEN + 2 * count + 2 * i) as i32 + top;
                vertices.push((x, y));
            }
            Ok(RoiShape::Polygon { vertices })
        }
        other => Ok(RoiShape::Unsupported { kind: other }),
    }
}

fn be_i16(bytes: &[u8], at: usize) -> i16 {
    i16::from_be_bytes([bytes[at], bytes[at + 1]])
}

fn be_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([bytes[at], bytes[at + 1]])
}

#[cfg(test)]
pub(crate) fn encode_rect_roi(left: i16, top: i16, right: i16, bottom: i16) -> Vec<u8> {
    let mut bytes = vec![0u8; HEADER_LEN];
    bytes[0..4].copy_from_slice(MAGIC);
    bytes[6] = TYPE_RECT;
    bytes[8..10].copy_from_slice(&top.to_be_bytes());
    bytes[10..12].copy_from_slice(&left.to_be_bytes());
    bytes[12..14].copy_from_slice(&bottom.to_be_bytes());
    bytes[14..16].copy_from_slice(&right.to_be_bytes());
    bytes
}

#[cfg(test)]
pub(crate) fn encode_polygon_roi(vertices: &[(i16, i16)]) -> Vec<u8> {
    let left = vertices.iter().map(|v| v.0).min().unwrap_or(0);
    let top = vertices.iter().map(|v| v.1).min().unwrap_or(0);
    let mut bytes = vec![0u8; HEADER_LEN + 4 * vertices.len()];
    bytes[0..4].copy_from_slice(MAGIC);
    bytes[6] = TYPE_FREEHAND;
    bytes[8..10].copy_from_slice(&top.to_be_bytes());
    bytes[10..12].copy_from_slice(&left.to_be_bytes());
    bytes[16..18].copy_from_slice(&(vertices.len() as u16).to_be_bytes());
    for (i, (x, _)) in vertices.iter().enumerate() {
        let at = HEADER_LEN + 2 * i;
        bytes[at..at + 2].copy_from_slice(&(x - left).to_be_bytes());
    }
    for (i, (_, y)) in vertices.iter().enumerate() {
        let at = HEADER_LEN + 2 * vertices.len() + 2 * i;
        bytes[at..at + 2].copy_from_slice(&(y - top).to_be_bytes());
    }
    bytes
}
