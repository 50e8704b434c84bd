//! Pipeline configuration
//!
//! Runtime settings stored in TOML format. Every field has a default so a
//! config file is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level pipeline settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// OCR engine settings
    pub ocr: OcrSettings,
    /// Text validation settings
    pub validation: ValidationSettings,
}

/// Settings passed through to the Tesseract engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Tesseract language code
    pub lang: String,
    /// Assumed DPI of candidate images
    pub dpi: Option<i32>,
    /// Page segmentation mode
    pub psm: Option<i32>,
    /// OCR engine mode
    pub oem: Option<i32>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            lang: "eng".to_string(),
            dpi: None,
            psm: None,
            oem: None,
        }
    }
}

/// Settings for the recognized-text acceptance gate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// How a string with some invalid tokens is treated
    pub mode: ValidationMode,
    /// Tokens accepted verbatim without a lexicon lookup
    pub exceptions: Vec<String>,
    /// Word list path; falls back to the system word list when unset
    pub wordlist: Option<PathBuf>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            mode: ValidationMode::StrictAll,
            exceptions: vec!["&".to_string(), "-".to_string(), "'".to_string()],
            wordlist: None,
        }
    }
}

/// The two historical validation behaviors, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Reject the whole string when any token is invalid.
    StrictAll,
    /// Drop invalid tokens and keep the reassembled remainder.
    FilterValid,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
}
