//! Paragraph-level document building on top of `docx-rs`.

use std::path::Path;

use docx_rs::{
    AbstractNumbering, BreakType, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat,
    Numbering, NumberingId, Paragraph, Pic, Run, SpecialIndentType, Start, Style, StyleType,
};
use tempfile::Builder;

use super::naming::section_heading;
use super::raster::RenderedImage;
use super::AssemblyError;

/// EMUs per inch, the unit Word uses for drawing extents.
pub const EMU_PER_INCH: f64 = 914_400.0;

const BULLET_NUMBERING: usize = 2;

/// An in-progress Word document.
pub struct QuizDocument {
    paragraphs: Vec<Paragraph>,
}

impl QuizDocument {
    pub fn new(title: &str) -> Self {
        let mut doc = Self {
            paragraphs: Vec::new(),
        };
        doc.paragraphs
            .push(Paragraph::new().style("Title").add_run(text_run(title)));
        doc
    }

    /// Numbered level-1 heading that opens the `index`-th question.
    pub fn section(&mut self, index: usize) {
        self.heading(1, &section_heading(index));
    }

    pub fn heading(&mut self, level: u8, text: &str) {
        let style = if level <= 1 { "Heading1" } else { "Heading2" };
        self.paragraphs
            .push(Paragraph::new().style(style).add_run(text_run(text)));
    }

    pub fn paragraph(&mut self, text: &str) {
        self.paragraphs.push(Paragraph::new().add_run(text_run(text)));
    }

    pub fn blank_line(&mut self) {
        self.paragraphs.push(Paragraph::new());
    }

    pub fn bullet(&mut self, text: &str) {
        self.paragraphs.push(
            Paragraph::new()
                .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0))
                .add_run(text_run(text)),
        );
    }

    /// Embed `image` at `width_emu`, keeping its aspect ratio.
    pub fn picture(&mut self, image: &RenderedImage, width_emu: u32) {
        let height_emu = if image.width == 0 {
            width_emu
        } else {
            (u64::from(width_emu) * u64::from(image.height) / u64::from(image.width)) as u32
        };
        let pic = Pic::new(&image.png).size(width_emu, height_emu);
        self.paragraphs
            .push(Paragraph::new().add_run(Run::new().add_image(pic)));
    }

    pub fn page_break(&mut self) {
        self.paragraphs
            .push(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
    }

    /// Pack the document into `dir/file_name`.
    ///
    /// The archive is written to a temporary file in `dir` first and renamed into
    /// place, so a failed write never leaves a truncated document behind.
    pub fn save(self, dir: &Path, file_name: &str) -> Result<(), AssemblyError> {
        let docx = self
            .paragraphs
            .into_iter()
            .fold(base_document(), |docx, paragraph| docx.add_paragraph(paragraph));

        let mut temp = Builder::new()
            .prefix(".docx-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|source| AssemblyError::TempFile {
                file: file_name.to_string(),
                source,
            })?;

        docx.build()
            .pack(temp.as_file_mut())
            .map_err(|e| AssemblyError::Pack {
                file: file_name.to_string(),
                reason: e.to_string(),
            })?;

        temp.persist(dir.join(file_name))
            .map_err(|e| AssemblyError::Persist {
                file: file_name.to_string(),
                source: e.error,
            })?;

        Ok(())
    }
}

fn base_document() -> Docx {
    let bullet_level = Level::new(
        0,
        Start::new(1),
        NumberFormat::new("bullet"),
        LevelText::new("•"),
        LevelJc::new("left"),
    )
    .indent(Some(720), Some(SpecialIndentType::Hanging(360)), None, None);

    Docx::new()
        .add_style(Style::new("Title", StyleType::Paragraph).name("Title").size(48).bold())
        .add_style(
            Style::new("Heading1", StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_style(
            Style::new("Heading2", StyleType::Paragraph)
                .name("Heading 2")
                .size(26)
                .bold(),
        )
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING).add_level(bullet_level))
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
}

/// A run for `text`, with embedded newlines turned into line breaks.
fn text_run(text: &str) -> Run {
    let mut run = Run::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    run
}
