//! Request and response types exchanged with clients

use crate::layout::LayoutStats;
use serde::{Deserialize, Serialize};

/// A single recognized text span as produced by the upstream recognizer.
///
/// `dt_boxes` holds the four corners of the detection box in pixel
/// coordinates, clockwise from the top-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrResult {
    pub dt_boxes: Vec<Vec<f64>>,
    pub rec_txt: String,
    pub score: f64,
}

/// Bounding box normalized to 0-1 with a bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Recognizer output that still carries a normalized box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub text: String,
    pub confidence: f64,
    pub bbox: NormalizedBox,
}

impl Observation {
    /// Convert to a pixel space result for an image of the given size.
    ///
    /// The y axis is flipped so that the top-left corner becomes the origin.
    pub fn to_ocr_result(&self, (width, height): (u32, u32)) -> OcrResult {
        let (w, h) = (f64::from(width), f64::from(height));
        let b = self.bbox;
        let x1 = b.x * w;
        let y1 = (1.0 - b.y - b.height) * h;
        let x2 = (b.x + b.width) * w;
        let y2 = (1.0 - b.y) * h;

        OcrResult {
            dt_boxes: vec![vec![x1, y1], vec![x2, y1], vec![x2, y2], vec![x1, y2]],
            rec_txt: self.text.clone(),
            score: self.confidence,
        }
    }
}

/// Body of `POST /format`
#[derive(Debug, Clone, Deserialize)]
pub struct FormatRequest {
    #[serde(default)]
    pub results: Vec<OcrResult>,
    #[serde(default)]
    pub observations: Vec<Observation>,
    /// Source image size as `[width, height]`
    pub image_size: (u32, u32),
    #[serde(default)]
    pub confidence_threshold: Option<f64>,
    #[serde(default)]
    pub enable_llm_format: bool,
}

impl FormatRequest {
    /// All results in pixel space, with low confidence ones removed
    pub fn pixel_results(&self) -> Vec<OcrResult> {
        let threshold = self.confidence_threshold.unwrap_or(0.0);
        self.results
            .iter()
            .cloned()
            .chain(
                self.observations
                    .iter()
                    .map(|o| o.to_ocr_result(self.image_size)),
            )
            .filter(|r| r.score >= threshold)
            .collect()
    }
}

/// Outcome of one formatting strategy. Failures are reported here rather
/// than as an HTTP error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedResult {
    pub markdown: String,
    pub success: bool,
    pub error: Option<String>,
}

impl FormattedResult {
    pub fn ok(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            markdown: String::new(),
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Response of `POST /format`
#[derive(Debug, Serialize)]
pub struct FormatResponse {
    pub results: Vec<OcrResult>,
    pub local_format: FormattedResult,
    pub llm_format: Option<FormattedResult>,
    pub stats: Option<LayoutStats>,
    pub processing_time_ms: u64,
    pub image_size: (u32, u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(text: &str, confidence: f64, bbox: NormalizedBox) -> Observation {
        Observation {
            text: text.to_string(),
            confidence,
            bbox,
        }
    }

    #[test]
    fn test_observation_flips_y_axis() {
        let obs = observation(
            "Title",
            0.9,
            NormalizedBox {
                x: 0.1,
                y: 0.8,
                width: 0.5,
                height: 0.1,
            },
        );

        let result = obs.to_ocr_result((1000, 500));

        let expect = |got: f64, want: f64| {
            assert!((got - want).abs() < 1e-9, "Expected {}, got {}", want, got);
        };
        expect(result.dt_boxes[0][0], 100.0);
        expect(result.dt_boxes[0][1], 50.0);
        expect(result.dt_boxes[2][0], 600.0);
        expect(result.dt_boxes[2][1], 100.0);
        assert_eq!(result.rec_txt, "Title");
        assert_eq!(result.score, 0.9);
    }

    #[test]
    fn test_request_defaults() {
        let request: FormatRequest =
            serde_json::from_str(r#"{"image_size": [640, 480]}"#).unwrap();

        assert!(request.results.is_empty());
        assert!(request.observations.is_empty());
        assert_eq!(request.image_size, (640, 480));
        assert!(!request.enable_llm_format);
        assert!(request.pixel_results().is_empty());
    }

    #[test]
    fn test_confidence_threshold_drops_low_scores() {
        let request: FormatRequest = serde_json::from_str(
            r#"{
                "results": [
                    {"dt_boxes": [[0,0],[10,0],[10,10],[0,10]], "rec_txt": "keep", "score": 0.8},
                    {"dt_boxes": [[0,20],[10,20],[10,30],[0,30]], "rec_txt": "drop", "score": 0.2}
                ],
                "observations": [
                    {"text": "edge", "confidence": 0.5,
                     "bbox": {"x": 0.0, "y": 0.0, "width": 0.1, "height": 0.1}}
                ],
                "image_size": [100, 100],
                "confidence_threshold": 0.5
            }"#,
        )
        .unwrap();

        let texts: Vec<String> = request
            .pixel_results()
            .into_iter()
            .map(|r| r.rec_txt)
            .collect();
        assert_eq!(texts, vec!["keep".to_string(), "edge".to_string()]);
    }

    #[test]
    fn test_formatted_result_serializes_null_error() {
        let json = serde_json::to_value(FormattedResult::ok("# Hi")).unwrap();
        assert_eq!(json["markdown"], "# Hi");
        assert_eq!(json["success"], true);
        assert!(json["error"].is_null());

        let failed = FormattedResult::failed("boom");
        assert!(!failed.success);
        assert!(failed.markdown.is_empty());
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }
}
