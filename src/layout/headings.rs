//! Heading detection
//!
//! The recognizer gives no font information, so headings are guessed from
//! geometry alone: short text, not spanning the page, and either centered or
//! flush left.

use super::lines::Line;
use super::LayoutOptions;

/// Role assigned to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading1,
    Heading2,
    Body,
}

impl LineKind {
    pub fn is_heading(self) -> bool {
        !matches!(self, Self::Body)
    }
}

/// A line with its merged text and role
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    pub kind: LineKind,
    pub text: String,
}

/// Whether a line looks like a heading, independently of its neighbours
pub fn is_heading_candidate(
    line: &Line,
    text_len: usize,
    image_width: f64,
    options: &LayoutOptions,
) -> bool {
    if text_len > options.heading_max_chars || image_width <= 0.0 {
        return false;
    }

    if line.width() >= image_width * options.heading_max_width_ratio {
        return false;
    }

    let left = line.left();
    let center_offset = ((left + line.right()) / 2.0 - image_width / 2.0).abs();
    let is_centered = center_offset < image_width * options.heading_center_tolerance;
    let is_left_aligned = left < image_width * options.heading_left_margin;

    is_centered || is_left_aligned
}

/// Classify every line. Only the first line can become a level one heading.
pub fn classify_lines(
    lines: &[Line],
    image_width: f64,
    options: &LayoutOptions,
) -> Vec<ClassifiedLine> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let text = line.text();
            let len = text.chars().count();
            let kind = if !is_heading_candidate(line, len, image_width, options) {
                LineKind::Body
            } else if i == 0 && len < options.title_max_chars {
                LineKind::Heading1
            } else {
                LineKind::Heading2
            };
            ClassifiedLine { kind, text }
        })
        .collect()
}
