//! Positioned text fragments, the input of the layout pipeline

use crate::error::FormatError;
use crate::models::OcrResult;
use std::cmp::Ordering;

/// One recognized text span with an axis-aligned pixel box
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub score: f64,
}

impl TextFragment {
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn bottom_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn right_x(&self) -> f64 {
        self.x + self.width
    }

    /// Zero, negative or NaN height; such fragments always sit on a line of their own
    pub fn is_degenerate(&self) -> bool {
        self.height.partial_cmp(&0.0) != Some(Ordering::Greater)
    }

    /// Top-to-bottom order used before grouping. Ties are broken on the
    /// remaining geometry and the text so the input order never matters.
    pub(crate) fn reading_cmp(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
            .then_with(|| self.height.total_cmp(&other.height))
            .then_with(|| self.width.total_cmp(&other.width))
            .then_with(|| self.text.cmp(&other.text))
    }

    /// Left-to-right order inside a line
    pub(crate) fn line_cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
            .then_with(|| self.text.cmp(&other.text))
    }

    /// Build a fragment from a recognizer result.
    ///
    /// Point 0 of `dt_boxes` is the top-left corner and point 2 the
    /// bottom-right one.
    pub fn from_ocr_result(index: usize, result: &OcrResult) -> Result<Self, FormatError> {
        let malformed = |reason: String| FormatError::MalformedFragment { index, reason };

        if result.dt_boxes.len() < 3 {
            return Err(malformed(format!(
                "expected 4 box points, got {}",
                result.dt_boxes.len()
            )));
        }

        let point = |i: usize| -> Result<(f64, f64), FormatError> {
            match result.dt_boxes[i].as_slice() {
                [x, y, ..] if x.is_finite() && y.is_finite() => Ok((*x, *y)),
                [_, _, ..] => Err(malformed(format!("box point {} is not finite", i))),
                other => Err(malformed(format!(
                    "box point {} has {} coordinates",
                    i,
                    other.len()
                ))),
            }
        };

        let (x1, y1) = point(0)?;
        let (x2, y2) = point(2)?;

        Ok(Self {
            text: result.rec_txt.clone(),
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            score: result.score,
        })
    }
}

/// Convert every recognizer result, failing on the first malformed one
pub fn to_fragments(results: &[OcrResult]) -> Result<Vec<TextFragment>, FormatError> {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| TextFragment::from_ocr_result(i, r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::fragment;

    fn result(dt_boxes: Vec<Vec<f64>>) -> OcrResult {
        OcrResult {
            dt_boxes,
            rec_txt: "text".to_string(),
            score: 0.75,
        }
    }

    #[test]
    fn test_converts_quad_to_box() {
        let r = result(vec![
            vec![10.0, 20.0],
            vec![110.0, 20.0],
            vec![110.0, 45.0],
            vec![10.0, 45.0],
        ]);

        let fragment = TextFragment::from_ocr_result(0, &r).unwrap();

        assert_eq!(fragment.x, 10.0);
        assert_eq!(fragment.y, 20.0);
        assert_eq!(fragment.width, 100.0);
        assert_eq!(fragment.height, 25.0);
        assert_eq!(fragment.score, 0.75);
        assert_eq!(fragment.center_y(), 32.5);
        assert_eq!(fragment.bottom_y(), 45.0);
        assert_eq!(fragment.right_x(), 110.0);
    }

    #[test]
    fn test_too_few_points_is_malformed() {
        let r = result(vec![vec![0.0, 0.0], vec![1.0, 0.0]]);

        match TextFragment::from_ocr_result(3, &r) {
            Err(FormatError::MalformedFragment { index, .. }) => assert_eq!(index, 3),
            other => panic!("Expected malformed fragment, got {:?}", other),
        }
    }

    #[test]
    fn test_short_point_is_malformed() {
        let r = result(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0], vec![0.0, 1.0]]);
        let err = TextFragment::from_ocr_result(0, &r).unwrap_err();
        assert!(err.to_string().contains("point 2"), "got {}", err);
    }

    #[test]
    fn test_non_finite_point_is_malformed() {
        let r = result(vec![
            vec![f64::NAN, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
        ]);
        assert!(TextFragment::from_ocr_result(0, &r).is_err());
    }

    #[test]
    fn test_to_fragments_reports_first_bad_index() {
        let good = result(vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
        ]);
        let bad = result(vec![]);

        let err = to_fragments(&[good.clone(), bad, good]).unwrap_err();
        assert!(err.to_string().contains("index 1"), "got {}", err);
    }

    #[test]
    fn test_degenerate_height() {
        assert!(fragment("a", 0.0, 0.0, 10.0, 0.0).is_degenerate());
        assert!(fragment("a", 0.0, 0.0, 10.0, f64::NAN).is_degenerate());
        assert!(!fragment("a", 0.0, 0.0, 10.0, 1.0).is_degenerate());
    }
}
