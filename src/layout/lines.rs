//! Line grouping
//!
//! Fragments are clustered into horizontal lines by comparing each fragment's
//! vertical center with the running average center of the line being built.
//! The tolerance is a fraction of that line's running average height, so the
//! rule adapts to the font size of each region of the page.

use super::fragment::TextFragment;

/// Fragments sharing one text line, ordered left to right. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    fragments: Vec<TextFragment>,
}

impl Line {
    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    /// Fragment texts joined by a single space
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn left(&self) -> f64 {
        self.fragments
            .iter()
            .map(|f| f.x)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn right(&self) -> f64 {
        self.fragments
            .iter()
            .map(TextFragment::right_x)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn top(&self) -> f64 {
        self.fragments
            .iter()
            .map(|f| f.y)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn bottom(&self) -> f64 {
        self.fragments
            .iter()
            .map(TextFragment::bottom_y)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Running state of the line currently being filled
struct OpenLine {
    members: Vec<TextFragment>,
    height_sum: f64,
    center_sum: f64,
}

impl OpenLine {
    fn start(fragment: TextFragment) -> Self {
        Self {
            height_sum: fragment.height,
            center_sum: fragment.center_y(),
            members: vec![fragment],
        }
    }

    fn accepts(&self, fragment: &TextFragment, threshold_ratio: f64) -> bool {
        if fragment.is_degenerate() || self.members.iter().any(TextFragment::is_degenerate) {
            return false;
        }

        let count = self.members.len() as f64;
        let threshold = (self.height_sum / count) * threshold_ratio;
        (fragment.center_y() - self.center_sum / count).abs() <= threshold
    }

    fn push(&mut self, fragment: TextFragment) {
        self.height_sum += fragment.height;
        self.center_sum += fragment.center_y();
        self.members.push(fragment);
    }

    fn close(mut self) -> Line {
        self.members.sort_by(TextFragment::line_cmp);
        Line {
            fragments: self.members,
        }
    }
}

/// Group fragments into lines ordered top to bottom.
///
/// `threshold_ratio` is the fraction of the open line's average height that a
/// fragment's center may deviate from the line's average center.
pub fn group_into_lines(fragments: &[TextFragment], threshold_ratio: f64) -> Vec<Line> {
    let mut sorted = fragments.to_vec();
    sorted.sort_by(TextFragment::reading_cmp);

    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let (mut lines, open) = iter.fold(
        (Vec::new(), OpenLine::start(first)),
        |(mut lines, mut open), fragment| {
            if open.accepts(&fragment, threshold_ratio) {
                open.push(fragment);
            } else {
                lines.push(open.close());
                open = OpenLine::start(fragment);
            }
            (lines, open)
        },
    );
    lines.push(open.close());

    lines
}
