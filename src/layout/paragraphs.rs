//! Paragraph segmentation from vertical line spacing

use super::lines::Line;
use std::collections::BTreeSet;

/// Indices of lines that start a new paragraph.
///
/// The gap before line `i` is the distance from the lowest bottom edge of
/// line `i - 1` to the highest top edge of line `i`. A gap larger than
/// `gap_ratio` times the mean gap marks a break. When the mean gap is not
/// positive (touching or overlapping lines) there are no breaks. Index 0 is
/// never part of the result.
pub fn detect_paragraph_breaks(lines: &[Line], gap_ratio: f64) -> BTreeSet<usize> {
    if lines.len() <= 1 {
        return BTreeSet::new();
    }

    let gaps: Vec<f64> = lines
        .windows(2)
        .map(|pair| pair[1].top() - pair[0].bottom())
        .collect();
    let avg_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;

    if avg_gap <= 0.0 {
        return BTreeSet::new();
    }

    gaps.iter()
        .enumerate()
        .filter(|(_, gap)| **gap > avg_gap * gap_ratio)
        .map(|(i, _)| i + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::lines::group_into_lines;
    use crate::layout::test_support::fragment;

    fn lines_at(tops: &[f64]) -> Vec<Line> {
        let fragments: Vec<_> = tops
            .iter()
            .enumerate()
            .map(|(i, y)| fragment(&format!("line{}", i), 0.0, *y, 500.0, 20.0))
            .collect();
        group_into_lines(&fragments, 0.5)
    }

    #[test]
    fn test_single_line_has_no_breaks() {
        assert!(detect_paragraph_breaks(&lines_at(&[10.0]), 1.5).is_empty());
    }

    #[test]
    fn test_even_spacing_has_no_breaks() {
        let lines = lines_at(&[0.0, 30.0, 60.0, 90.0]);
        assert!(detect_paragraph_breaks(&lines, 1.5).is_empty());
    }

    #[test]
    fn test_large_gap_breaks() {
        // Gaps 10 and 50, mean 30, threshold 45
        let lines = lines_at(&[100.0, 130.0, 200.0]);

        let breaks = detect_paragraph_breaks(&lines, 1.5);

        assert_eq!(breaks.into_iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_gap_equal_to_threshold_does_not_break() {
        // Gaps 10, 10, 25 with mean 15: a ratio of 25/15 puts the last gap on the threshold
        let lines = lines_at(&[0.0, 30.0, 60.0, 105.0]);
        let ratio = 25.0 / 15.0;

        assert!(detect_paragraph_breaks(&lines, ratio).is_empty());
        assert_eq!(
            detect_paragraph_breaks(&lines, 1.5)
                .into_iter()
                .collect::<Vec<_>>(),
            vec![3]
        );
    }

    #[test]
    fn test_overlapping_lines_have_no_breaks() {
        // Tops 11 apart with height 20: every gap is negative
        let lines = lines_at(&[0.0, 11.0, 22.0, 33.0]);
        assert_eq!(lines.len(), 4);
        assert!(detect_paragraph_breaks(&lines, 1.5).is_empty());
    }

    #[test]
    fn test_multiple_breaks() {
        // Gaps 5, 40, 5, 40, 5: mean 19, threshold 28.5
        let lines = lines_at(&[0.0, 25.0, 85.0, 110.0, 170.0, 195.0]);

        let breaks = detect_paragraph_breaks(&lines, 1.5);

        assert_eq!(breaks.into_iter().collect::<Vec<_>>(), vec![2, 4]);
    }
}
