//! Document assembly: turns generated questions into the question and solution
//! `.docx` files plus the downloadable SVG figures.
//!
//! - `assembler` - walks the questions and drives both documents
//! - `builder` - thin layer over `docx-rs` for the paragraphs we emit
//! - `handlers` - download endpoint for generated files
//! - `raster` - SVG to PNG conversion with scoped temporary files
//! - `naming` - file-name conventions and fixed document labels

pub mod assembler;
pub mod builder;
pub mod handlers;
pub mod naming;
pub mod raster;

pub use assembler::DocumentAssembler;
pub use raster::{RasterOutcome, RenderedImage, SvgRasterizer};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Fatal errors while assembling documents. Image conversion problems are not
/// represented here; they are logged and the image is skipped.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("invalid run identifier '{0}'")]
    InvalidRunId(String),
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create temporary file for {file}: {source}")]
    TempFile {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to pack document {file}: {reason}")]
    Pack { file: String, reason: String },
    #[error("failed to persist document {file}: {source}")]
    Persist {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

/// Files produced by one generation run, relative to the output directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedFiles {
    #[schema(example = "sorular_1a2b3c4d.docx")]
    pub questions_word: String,
    #[schema(example = "cozumler_1a2b3c4d.docx")]
    pub solutions_word: String,
    #[serde(default)]
    pub svg_files: Vec<String>,
}

/// A field of [`GeneratedFiles`], either one file or a list of files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileSlot<'a> {
    Single(&'a str),
    Many(&'a [String]),
}

impl GeneratedFiles {
    pub fn slots(&self) -> [FileSlot<'_>; 3] {
        [
            FileSlot::Single(&self.questions_word),
            FileSlot::Single(&self.solutions_word),
            FileSlot::Many(&self.svg_files),
        ]
    }

    /// Every referenced file name, in slot order.
    pub fn file_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(2 + self.svg_files.len());
        for slot in self.slots() {
            match slot {
                FileSlot::Single(name) => names.push(name),
                FileSlot::Many(list) => names.extend(list.iter().map(String::as_str)),
            }
        }
        names
    }
}

#[cfg(test)]
mod tests;
