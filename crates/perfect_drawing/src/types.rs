use geo_types::Coord;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

/// A single stroke sample in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for Coord<f64> {
    fn from(point: Point) -> Self {
        Coord { x: point.x, y: point.y }
    }
}

impl From<Coord<f64>> for Point {
    fn from(coord: Coord<f64>) -> Self {
        Self { x: coord.x, y: coord.y }
    }
}

/// Axis-aligned bounds of a stroke, derived on demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `width / height`, or `None` for a box with no vertical extent
    pub fn aspect_ratio(&self) -> Option<f64> {
        let height = self.height();
        if height == 0.0 {
            None
        } else {
            Some(self.width() / height)
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ShapeLabel {
    Circle,
    Triangle,
    Square,
    Rectangle,
    Line,
    #[default]
    Unknown,
}

impl ShapeLabel {
    /// Whether the synthesizer has a canonical outline for this label
    pub fn is_idealizable(&self) -> bool {
        matches!(
            self,
            Self::Circle | Self::Triangle | Self::Square | Self::Rectangle
        )
    }
}

/// Heuristic shape verdict. The confidence is an uncalibrated score in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Classification {
    pub label: ShapeLabel,
    pub confidence: f64,
}

impl Classification {
    pub fn new(label: ShapeLabel, confidence: f64) -> Self {
        Self { label, confidence }
    }

    pub fn unknown() -> Self {
        Self::new(ShapeLabel::Unknown, 0.0)
    }
}

/// Which subsystem supplied `recognized_as`
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecognitionSource {
    Remote,
    Local,
    None,
}

/// Terminal artifact of the perfection pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerfectedDrawing {
    /// Points accepted at ingestion, in drawing order
    pub original_points: Vec<Point>,
    /// Smoothed and simplified points, or the idealized outline
    pub smoothed_points: Vec<Point>,
    pub recognized_as: Option<String>,
    pub confidence: f64,
    /// Prediction records as returned by the remote classifier
    pub all_predictions: Vec<serde_json::Value>,
    pub error: Option<String>,
    pub source: RecognitionSource,
    /// Local heuristic verdict, when the local classifier ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<Classification>,
}

impl PerfectedDrawing {
    /// An empty result carrying only an error message
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            original_points: Vec::new(),
            smoothed_points: Vec::new(),
            recognized_as: None,
            confidence: 0.0,
            all_predictions: Vec::new(),
            error: Some(message.into()),
            source: RecognitionSource::None,
            local: None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.recognized_as.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_aspect_ratio_guards_flat_boxes() {
        let flat = BoundingBox { min_x: 0.0, min_y: 5.0, max_x: 10.0, max_y: 5.0 };
        assert_eq!(flat.aspect_ratio(), None);

        let tall = BoundingBox { min_x: 0.0, min_y: 0.0, max_x: 10.0, max_y: 20.0 };
        assert_eq!(tall.aspect_ratio(), Some(0.5));
    }

    #[test]
    fn test_shape_label_names() {
        assert_eq!(ShapeLabel::Rectangle.to_string(), "rectangle");
        assert_eq!(ShapeLabel::from_str("Circle").unwrap(), ShapeLabel::Circle);
        assert!(ShapeLabel::from_str("cat").is_err());
        assert_eq!(
            serde_json::to_string(&ShapeLabel::Triangle).unwrap(),
            "\"triangle\""
        );
    }

    #[test]
    fn test_failure_payload() {
        let result = PerfectedDrawing::failure("No valid points provided");
        assert!(result.original_points.is_empty());
        assert!(result.smoothed_points.is_empty());
        assert!(!result.is_recognized());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.error.as_deref(), Some("No valid points provided"));

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["recognized_as"].is_null());
        assert!(json.get("local").is_none());
    }
}
