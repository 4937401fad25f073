use super::fragment::to_fragments;
use super::headings::{classify_lines, LineKind};
use super::lines::group_into_lines;
use super::markdown::{compose, Block};
use super::paragraphs::detect_paragraph_breaks;
use super::LayoutOptions;
use crate::error::FormatError;
use crate::models::OcrResult;
use serde::Serialize;
use std::time::Instant;

/// Timing information for a single layout step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_us: u64,
}

/// Summary of one layout run
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutStats {
    pub fragments: usize,
    pub lines: usize,
    pub paragraphs: usize,
    pub headings: usize,
    /// Mean recognizer confidence over all fragments
    pub mean_score: f64,
    pub total_time_us: u64,
    pub steps: Vec<StepTiming>,
}

/// Markdown plus the stats of the run that produced it
#[derive(Debug, Clone)]
pub struct LayoutOutput {
    pub markdown: String,
    pub stats: LayoutStats,
}

/// Runs fragment conversion, line grouping, paragraph segmentation, heading
/// classification and Markdown composition in that order
pub struct Pipeline {
    options: LayoutOptions,
}

impl Pipeline {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn run(
        &self,
        results: &[OcrResult],
        image_size: (u32, u32),
    ) -> Result<LayoutOutput, FormatError> {
        let start = Instant::now();
        let mut steps = Vec::new();
        let image_width = f64::from(image_size.0);

        let fragments = self.run_step("fragments", &mut steps, || to_fragments(results))?;

        let lines = self.run_step("lines", &mut steps, || {
            Ok(group_into_lines(&fragments, self.options.line_threshold_ratio))
        })?;

        let breaks = self.run_step("paragraphs", &mut steps, || {
            Ok(detect_paragraph_breaks(&lines, self.options.paragraph_gap_ratio))
        })?;

        let classified = self.run_step("headings", &mut steps, || {
            Ok(classify_lines(&lines, image_width, &self.options))
        })?;

        let (blocks, markdown) =
            self.run_step("markdown", &mut steps, || Ok(compose(&classified, &breaks)))?;

        let mean_score = if fragments.is_empty() {
            0.0
        } else {
            fragments.iter().map(|f| f.score).sum::<f64>() / fragments.len() as f64
        };

        let stats = LayoutStats {
            fragments: fragments.len(),
            lines: lines.len(),
            paragraphs: blocks
                .iter()
                .filter(|b| matches!(b, Block::Paragraph(_)))
                .count(),
            headings: classified.iter().filter(|l| l.kind.is_heading()).count(),
            mean_score,
            total_time_us: start.elapsed().as_micros() as u64,
            steps,
        };

        tracing::debug!(
            "Layout finished: {} fragments, {} lines, {} paragraphs, {} headings in {}us",
            stats.fragments,
            stats.lines,
            stats.paragraphs,
            stats.headings,
            stats.total_time_us
        );

        Ok(LayoutOutput { markdown, stats })
    }

    /// The lines' fragment texts, top to bottom and left to right
    pub fn reading_order(&self, results: &[OcrResult]) -> Result<Vec<String>, FormatError> {
        let fragments = to_fragments(results)?;
        Ok(group_into_lines(&fragments, self.options.line_threshold_ratio)
            .iter()
            .flat_map(|line| line.fragments().iter().map(|f| f.text.clone()))
            .collect())
    }

    fn run_step<T, F>(
        &self,
        name: &str,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<T, FormatError>
    where
        F: FnOnce() -> Result<T, FormatError>,
    {
        let step_start = Instant::now();
        let result = step_fn()?;
        timings.push(StepTiming {
            name: name.to_string(),
            time_us: step_start.elapsed().as_micros() as u64,
        });
        Ok(result)
    }
}
