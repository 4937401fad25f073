//! Local layout reconstruction
//!
//! Turns an unordered set of positioned OCR fragments into Markdown by
//! rebuilding reading order, lines, paragraphs and probable headings. The
//! computation is pure and synchronous; all failures are reported through
//! [`FormattedResult`] rather than returned to the caller.

pub mod fragment;
pub mod headings;
pub mod lines;
pub mod markdown;
pub mod paragraphs;
pub mod pipeline;

pub use pipeline::{LayoutStats, Pipeline};

use crate::models::{FormattedResult, OcrResult};
use serde::Serialize;

/// Tunable thresholds of the layout heuristics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOptions {
    /// Fraction of a line's average height within which centers may differ
    pub line_threshold_ratio: f64,
    /// Multiple of the mean line gap that separates paragraphs
    pub paragraph_gap_ratio: f64,
    /// Longest text, in characters, that can still be a heading
    pub heading_max_chars: usize,
    /// Headings must be narrower than this fraction of the image width
    pub heading_max_width_ratio: f64,
    /// Max distance of a centered heading's midpoint from the image center,
    /// as a fraction of the image width
    pub heading_center_tolerance: f64,
    /// Max distance of a flush-left heading from the left edge, as a
    /// fraction of the image width
    pub heading_left_margin: f64,
    /// A first-line heading shorter than this becomes a level one heading
    pub title_max_chars: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_threshold_ratio: 0.5,
            paragraph_gap_ratio: 1.5,
            heading_max_chars: 50,
            heading_max_width_ratio: 0.6,
            heading_center_tolerance: 0.2,
            heading_left_margin: 0.15,
            title_max_chars: 30,
        }
    }
}

/// Format recognizer output as Markdown.
///
/// Empty input is a successful empty document. Any failure in the pipeline
/// yields `success: false` with the error message; stats are only present
/// when the pipeline ran to completion.
pub fn format_locally(
    results: &[OcrResult],
    image_size: (u32, u32),
    options: &LayoutOptions,
) -> (FormattedResult, Option<LayoutStats>) {
    if results.is_empty() {
        return (FormattedResult::ok(""), None);
    }

    match Pipeline::new(options.clone()).run(results, image_size) {
        Ok(output) => (FormattedResult::ok(output.markdown), Some(output.stats)),
        Err(e) => {
            tracing::error!("Local formatting failed: {}", e);
            (FormattedResult::failed(e), None)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::fragment::TextFragment;
    use crate::models::OcrResult;

    pub fn fragment(text: &str, x: f64, y: f64, width: f64, height: f64) -> TextFragment {
        TextFragment {
            text: text.to_string(),
            x,
            y,
            width,
            height,
            score: 1.0,
        }
    }

    pub fn ocr_result(text: &str, x: f64, y: f64, width: f64, height: f64) -> OcrResult {
        let (x2, y2) = (x + width, y + height);
        OcrResult {
            dt_boxes: vec![vec![x, y], vec![x2, y], vec![x2, y2], vec![x, y2]],
            rec_txt: text.to_string(),
            score: 0.9,
        }
    }
}
