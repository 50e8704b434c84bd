//! wordsnip - extracts annotated word images and their OCR text from
//! scanned dictionary pages.
//!
//! Annotators mark words on page images with ImageJ ROIs, bundled per
//! page in zip archives. For every region the pipeline isolates its
//! pixels, runs a cascade of preprocessing strategies through Tesseract
//! until a lexicon-validated word comes out, and writes a CSV row plus a
//! side-by-side debug composite.

mod batch;
mod config;
mod error;
mod geometry;
mod lexicon;
mod output;
mod pipeline;
mod roi;
mod validate;
mod vision;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::PipelineConfig;
use crate::lexicon::{Lexicon, WordListLexicon};
use crate::roi::RoiShape;
use crate::validate::Validator;
use crate::vision::ocr::TesseractEngine;

/// Word extraction from annotated dictionary scans
#[derive(Parser, Debug)]
#[command(name = "wordsnip")]
#[command(about = "Extracts annotated word images and their OCR text from scanned dictionary pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the extraction pipeline over a directory of ROI archives
    Extract {
        /// Directory of per-page ROI zip archives
        annotated_dir: PathBuf,
        /// Directory of rasterized page images
        images_dir: PathBuf,
        /// Directory for per-ROI debug composites (cleared at startup)
        debug_dir: PathBuf,
        /// Output CSV path
        #[arg(short, long, default_value = "output.csv")]
        output: PathBuf,
        /// Optional TOML config path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print decoded geometry for every .roi file in a directory
    Inspect {
        /// Directory of .roi files
        roi_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    match cli.command {
        Command::Extract { annotated_dir, images_dir, debug_dir, output, config } => {
            run_extract(annotated_dir, images_dir, debug_dir, output, config)
        }
        Command::Inspect { roi_dir } => run_inspect(&roi_dir),
    }
}

fn run_extract(
    annotated_dir: PathBuf,
    images_dir: PathBuf,
    debug_dir: PathBuf,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    for dir in [&annotated_dir, &images_dir] {
        if !dir.is_dir() {
            bail!("{} is not a valid directory", dir.display());
        }
    }

    let config = match config_path {
        Some(path) => config::load_config(&path)?,
        None => PipelineConfig::default(),
    };

    let lexicon: Arc<dyn Lexicon> = Arc::new(match &config.validation.wordlist {
        Some(path) => WordListLexicon::load(path)?,
        None => WordListLexicon::system()?,
    });
    let validator = Validator::new(&config.validation, lexicon);
    let engine = TesseractEngine::new(&config.ocr);

    info!("wordsnip starting");
    let paths = batch::BatchPaths {
        annotated_dir,
        images_dir,
        debug_dir,
        output_csv: output,
    };
    batch::run(&paths, &engine, &validator)?;
    Ok(())
}

fn run_inspect(roi_dir: &Path) -> Result<()> {
    if !roi_dir.is_dir() {
        bail!("{} is not a valid directory", roi_dir.display());
    }

    let mut entries: Vec<PathBuf> = std::fs::read_dir(roi_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("roi"))
                .unwrap_or(false)
        })
        .collect();
    entries.sort();

    for path in entries {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("File: {name}");
        match roi::read_roi_file(&path) {
            Ok(RoiShape::Rectangle { left, top, right, bottom }) => {
                println!("Type: Rectangular");
                println!("Coordinates: Top-Left ({left}, {top}), Bottom-Right ({right}, {bottom})");
            }
            Ok(RoiShape::Polygon { vertices }) => {
                println!("Type: Freehand");
                println!("Found {} points.", vertices.len());
                if let (Some(first), Some(last)) = (vertices.first(), vertices.last()) {
                    println!("first point: {}, {}", first.0, first.1);
                    println!("last point: {}, {}", last.0, last.1);
                }
            }
            Ok(RoiShape::Unsupported { kind }) => {
                println!("Type: {kind} (not specifically handled)");
            }
            Err(err) => {
                println!("Error reading ROI: {err}");
            }
        }
        println!("{}", "-".repeat(40));
    }
    Ok(())
}
