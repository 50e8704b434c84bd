//! Region isolation, preprocessing and OCR over annotated word regions.

pub mod cascade;
pub mod isolate;
pub mod ocr;
