//! SVG to PNG conversion.
//!
//! The markup and the rendered PNG both pass through temporary files created in
//! the scratch directory. They are removed when their guards drop, whether the
//! conversion succeeded, failed, or panicked. A successful conversion hands the
//! SVG guard back so the caller can persist it under its permanent name.

use std::fs;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use anyhow::{bail, Context};
use resvg::usvg::fontdb;
use resvg::{tiny_skia, usvg};
use tempfile::{Builder, NamedTempFile};

const DEFAULT_MAX_DIMENSION: u32 = 4096;

/// A rendered PNG and its pixel size.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug)]
pub enum RasterOutcome {
    Rendered {
        image: RenderedImage,
        /// Temporary file holding the original markup.
        source: NamedTempFile,
    },
    Failed(String),
}

pub struct SvgRasterizer {
    scratch_dir: PathBuf,
    max_dimension: u32,
    /// System fonts, scanned on the first conversion and shared afterwards.
    fonts: OnceLock<Arc<fontdb::Database>>,
}

impl SvgRasterizer {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            max_dimension: DEFAULT_MAX_DIMENSION,
            fonts: OnceLock::new(),
        }
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn convert(&self, markup: &str) -> RasterOutcome {
        let source = match self.write_source(markup) {
            Ok(file) => file,
            Err(err) => return RasterOutcome::Failed(format!("{err:#}")),
        };
        let target = match self.scratch_file(".png") {
            Ok(file) => file,
            Err(err) => return RasterOutcome::Failed(format!("{err:#}")),
        };

        let max_dimension = self.max_dimension;
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            let options = usvg::Options {
                fontdb: self.fonts(),
                ..usvg::Options::default()
            };
            rasterize_file(source.path(), target.path(), &options, max_dimension)
        }));

        match rendered {
            Ok(Ok(image)) => RasterOutcome::Rendered { image, source },
            Ok(Err(err)) => RasterOutcome::Failed(format!("{err:#}")),
            Err(payload) => RasterOutcome::Failed(format!(
                "renderer panicked: {}",
                panic_message(payload.as_ref())
            )),
        }
    }

    fn fonts(&self) -> Arc<fontdb::Database> {
        self.fonts
            .get_or_init(|| {
                let mut db = fontdb::Database::new();
                db.load_system_fonts();
                Arc::new(db)
            })
            .clone()
    }

    fn scratch_file(&self, suffix: &str) -> anyhow::Result<NamedTempFile> {
        Builder::new()
            .prefix(".raster-")
            .suffix(suffix)
            .tempfile_in(&self.scratch_dir)
            .with_context(|| {
                format!(
                    "failed to create temporary file in {}",
                    self.scratch_dir.display()
                )
            })
    }

    fn write_source(&self, markup: &str) -> anyhow::Result<NamedTempFile> {
        let mut file = self.scratch_file(".svg")?;
        file.write_all(markup.as_bytes())
            .context("failed to write SVG source")?;
        file.flush().context("failed to flush SVG source")?;
        Ok(file)
    }
}

fn rasterize_file(
    svg_path: &Path,
    png_path: &Path,
    options: &usvg::Options,
    max_dimension: u32,
) -> anyhow::Result<RenderedImage> {
    let data = fs::read(svg_path).context("failed to read SVG source")?;
    let tree = usvg::Tree::from_data(&data, options).context("failed to parse SVG")?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    if width > max_dimension || height > max_dimension {
        bail!("SVG is {width}x{height}, larger than {max_dimension}px");
    }

    let mut pixmap = tiny_skia::Pixmap::new(width, height).context("failed to create pixmap")?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap.save_png(png_path).context("failed to encode PNG")?;
    let png = fs::read(png_path).context("failed to read rendered PNG")?;

    Ok(RenderedImage { png, width, height })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
