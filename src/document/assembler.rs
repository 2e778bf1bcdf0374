use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use super::builder::{QuizDocument, EMU_PER_INCH};
use super::naming::{
    image_file_name, is_plain_file_name, option_label, questions_file_name, solutions_file_name,
    ANSWER_PREFIX, QUESTIONS_TITLE_SUFFIX, SOLUTIONS_TITLE_SUFFIX, SOLUTION_STEPS_HEADING,
};
use super::raster::{RasterOutcome, SvgRasterizer};
use super::{AssemblyError, GeneratedFiles};
use crate::question::QuestionRecord;

pub const DEFAULT_IMAGE_WIDTH_INCHES: f64 = 4.0;

/// Builds the question and solution documents for one generation run.
pub struct DocumentAssembler {
    output_dir: PathBuf,
    image_width_emu: u32,
    rasterizer: SvgRasterizer,
}

impl DocumentAssembler {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            rasterizer: SvgRasterizer::new(&output_dir),
            output_dir,
            image_width_emu: inches_to_emu(DEFAULT_IMAGE_WIDTH_INCHES),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn ensure_output_dir(&self) -> Result<(), AssemblyError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| AssemblyError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })
    }

    /// Write `sorular_{run_id}.docx`, `cozumler_{run_id}.docx` and one
    /// `gorsel_{run_id}_{n}.svg` per successfully rendered figure.
    ///
    /// A figure that fails to render is skipped. A document that cannot be
    /// written aborts the run and removes whatever the run already persisted.
    pub fn assemble(
        &self,
        questions: &[QuestionRecord],
        label: &str,
        run_id: &str,
    ) -> Result<GeneratedFiles, AssemblyError> {
        if !is_plain_file_name(run_id) {
            return Err(AssemblyError::InvalidRunId(run_id.to_string()));
        }
        self.ensure_output_dir()?;

        info!(
            "Assembling documents for run {} ({} questions)",
            run_id,
            questions.len()
        );

        let mut questions_doc = QuizDocument::new(&format!("{label} - {QUESTIONS_TITLE_SUFFIX}"));
        let mut solutions_doc = QuizDocument::new(&format!("{label} - {SOLUTIONS_TITLE_SUFFIX}"));
        let mut svg_files = Vec::new();

        for (index, item) in questions.iter().enumerate().map(|(i, q)| (i + 1, q)) {
            for doc in [&mut questions_doc, &mut solutions_doc] {
                doc.section(index);
                doc.paragraph(&item.question);
            }

            if let Some(markup) = item.svg_markup() {
                match self.rasterizer.convert(markup) {
                    RasterOutcome::Rendered { image, source } => {
                        questions_doc.picture(&image, self.image_width_emu);
                        solutions_doc.picture(&image, self.image_width_emu);

                        let file_name = image_file_name(run_id, index);
                        match source.persist(self.output_dir.join(&file_name)) {
                            Ok(_) => {
                                debug!("Saved figure {}", file_name);
                                svg_files.push(file_name);
                            }
                            Err(e) => error!("Failed to save figure {}: {}", file_name, e.error),
                        }
                    }
                    RasterOutcome::Failed(reason) => {
                        warn!(
                            "Skipping figure for question {} of run {}: {}",
                            index, run_id, reason
                        );
                    }
                }
            }

            if let Some(options) = item.choices() {
                for (idx, option) in options.iter().enumerate() {
                    let line = format!("{}) {}", option_label(idx), option);
                    questions_doc.paragraph(&line);
                    solutions_doc.paragraph(&line);
                }
                if item
                    .correct_answer_index
                    .map_or(true, |idx| idx >= options.len())
                {
                    warn!(
                        "Question {} of run {} has no valid correct_answer_index",
                        index, run_id
                    );
                }
            }
            questions_doc.blank_line();

            solutions_doc.heading(2, SOLUTION_STEPS_HEADING);
            for step in &item.solution_steps {
                solutions_doc.bullet(step);
            }
            solutions_doc.blank_line();
            solutions_doc.paragraph(&format!("{} {}", ANSWER_PREFIX, item.correct_answer()));
            solutions_doc.page_break();
        }

        let files = GeneratedFiles {
            questions_word: questions_file_name(run_id),
            solutions_word: solutions_file_name(run_id),
            svg_files,
        };

        let saved = questions_doc
            .save(&self.output_dir, &files.questions_word)
            .and_then(|_| solutions_doc.save(&self.output_dir, &files.solutions_word));

        if let Err(e) = saved {
            error!("Failed to write documents for run {}: {}", run_id, e);
            self.discard(&files);
            return Err(e);
        }

        info!(
            "Run {} produced {} and {} with {} figures",
            run_id,
            files.questions_word,
            files.solutions_word,
            files.svg_files.len()
        );
        Ok(files)
    }

    /// Best-effort removal of every file in `files`.
    pub fn discard(&self, files: &GeneratedFiles) {
        for name in files.file_names() {
            let path = self.output_dir.join(name);
            if path.exists() {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Failed to remove {} after aborted run: {}", path.display(), e);
                }
            }
        }
    }
}

fn inches_to_emu(inches: f64) -> u32 {
    (inches * EMU_PER_INCH).round() as u32
}
