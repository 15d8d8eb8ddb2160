use std::fs;
use std::path::Path;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use tracing::warn;

use crate::{
    error::{PerfectError, Result},
    ingest::{ParsedStroke, parse_stroke},
    pipeline::{Perfector, builder::PipelineBuilder},
    types::{Classification, PerfectedDrawing, Point, ShapeLabel},
};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum DrawingCommand {
    /// Recognize the stroke and return its perfected version
    #[serde(rename = "perfect")]
    Perfect {
        #[serde(default)]
        smoothing_window: Option<usize>,
        #[serde(default)]
        simplify_epsilon: Option<f64>,
    },

    /// Run only the local heuristic classifier
    #[serde(rename = "classify")]
    Classify,

    /// Replace the stroke with the idealized outline of a shape
    #[serde(rename = "synthesize")]
    Synthesize { label: ShapeLabel },

    /// Moving-average smoothing only
    #[serde(rename = "smooth")]
    Smooth {
        #[schemars(range(min = 0, max = 50))]
        window: usize,
    },

    /// Ramer-Douglas-Peucker simplification only
    #[serde(rename = "simplify")]
    Simplify {
        #[schemars(range(min = 0.0, max = 100.0))]
        epsilon: f64,
    },
}

impl DrawingCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DrawingCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// Get a description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Self::Perfect { .. } => "Recognize the stroke and return smoothed, simplified or idealized points",
            Self::Classify => "Classify the stroke with the local heuristic rules",
            Self::Synthesize { .. } => "Replace the stroke with a canonical outline of the given shape",
            Self::Smooth { .. } => "Apply windowed moving-average smoothing",
            Self::Simplify { .. } => "Apply Ramer-Douglas-Peucker simplification",
        }
    }
}

/// Result of a [`DrawingCommand`]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "type", content = "result", rename_all = "snake_case")]
pub enum CommandOutput {
    Perfected(PerfectedDrawing),
    Classification(Classification),
    Points(Vec<Point>),
}

/// Read a stroke document: either a bare array of points or an object
/// with a `points` array.
pub fn stroke_from_json(content: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("points") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(PerfectError::InvalidParameter(
                "stroke document needs a `points` array".to_string(),
            )),
        },
        _ => Err(PerfectError::InvalidParameter(
            "stroke document must be an array or an object".to_string(),
        )),
    }
}

/// Public entry point: holds the loaded stroke and validates it before
/// any command runs.
#[derive(Clone)]
pub struct DrawingService {
    stroke: Option<Vec<Value>>,
    perfector: Arc<Perfector>,
}

impl DrawingService {
    /// Service backed by the default orchestrator (no remote transport)
    pub fn new() -> Self {
        Self::with_perfector(PipelineBuilder::new().build())
    }

    pub fn with_perfector(perfector: Perfector) -> Self {
        Self {
            stroke: None,
            perfector: Arc::new(perfector),
        }
    }

    pub fn perfector(&self) -> &Perfector {
        &self.perfector
    }

    /// Load a stroke document from file
    pub fn load_stroke<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.stroke = Some(stroke_from_json(&content)?);
        Ok(())
    }

    /// Set the raw stroke directly
    pub fn set_stroke(&mut self, stroke: Vec<Value>) {
        self.stroke = Some(stroke);
    }

    pub fn stroke(&self) -> Option<&[Value]> {
        self.stroke.as_deref()
    }

    /// Check the stroke size against the configured bounds.
    ///
    /// The upper bound applies to the raw elements, the lower bound to the
    /// points that survive parsing.
    pub fn validate(&self, stroke: &[Value]) -> Result<ParsedStroke> {
        let config = self.perfector.config();
        if stroke.len() > config.max_points {
            return Err(PerfectError::InputTooLarge {
                max: config.max_points,
                actual: stroke.len(),
            });
        }

        let parsed = parse_stroke(stroke);
        if parsed.points.len() < config.min_points {
            return Err(PerfectError::InsufficientData {
                required: config.min_points,
                actual: parsed.points.len(),
            });
        }
        if parsed.points.is_empty() {
            return Err(PerfectError::EmptyInput);
        }
        Ok(parsed)
    }

    pub async fn execute(&self, command: DrawingCommand) -> Result<CommandOutput> {
        let stroke = self.stroke.as_deref().ok_or(PerfectError::NoStrokeLoaded)?;
        let parsed = self.validate(stroke)?;

        match command {
            DrawingCommand::Perfect { smoothing_window, simplify_epsilon } => {
                let config = self.perfector.config();
                let window = smoothing_window.unwrap_or(config.smoothing_window);
                let epsilon = simplify_epsilon.unwrap_or(config.simplify_epsilon);
                check_epsilon(epsilon)?;

                // The orchestrator reparses so skipped points reach its observer
                let result = self.perfector.perfect_drawing(stroke, window, epsilon).await;
                Ok(CommandOutput::Perfected(result))
            }
            DrawingCommand::Classify => {
                let points = accepted_points(parsed);
                Ok(CommandOutput::Classification(
                    self.perfector.classifier().classify(&points),
                ))
            }
            DrawingCommand::Synthesize { label } => {
                let points = accepted_points(parsed);
                Ok(CommandOutput::Points(
                    self.perfector.synthesizer().synthesize(label, &points),
                ))
            }
            DrawingCommand::Smooth { window } => {
                let points = accepted_points(parsed);
                Ok(CommandOutput::Points(self.perfector.smoother().smooth(&points, window)))
            }
            DrawingCommand::Simplify { epsilon } => {
                check_epsilon(epsilon)?;
                let points = accepted_points(parsed);
                Ok(CommandOutput::Points(
                    self.perfector.simplifier().simplify(&points, epsilon),
                ))
            }
        }
    }
}

impl Default for DrawingService {
    fn default() -> Self {
        Self::new()
    }
}

fn check_epsilon(epsilon: f64) -> Result<()> {
    if epsilon.is_finite() && epsilon >= 0.0 {
        Ok(())
    } else {
        Err(PerfectError::InvalidParameter(format!(
            "simplify epsilon must be a non-negative number, got {}",
            epsilon
        )))
    }
}

fn accepted_points(parsed: ParsedStroke) -> Vec<Point> {
    for rejected in &parsed.rejected {
        warn!("{}", rejected);
    }
    parsed.points
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square_stroke() -> Vec<Value> {
        let mut stroke = Vec::new();
        for i in 1..10 {
            stroke.push(json!({"x": i * 10, "y": 0}));
        }
        for i in 1..10 {
            stroke.push(json!([100, i * 10]));
        }
        for i in 1..10 {
            stroke.push(json!(format!("{},100", 100 - i * 10)));
        }
        for i in 1..10 {
            stroke.push(json!({"x": 0, "y": 100 - i * 10}));
        }
        stroke
    }

    #[test]
    fn test_command_names() {
        assert_eq!(
            DrawingCommand::command_names(),
            &["perfect", "classify", "synthesize", "smooth", "simplify"]
        );
    }

    #[test]
    fn test_command_json() {
        let command: DrawingCommand = serde_json::from_value(json!({
            "type": "perfect",
            "params": {"simplify_epsilon": 3.5}
        }))
        .unwrap();
        assert_eq!(
            command,
            DrawingCommand::Perfect { smoothing_window: None, simplify_epsilon: Some(3.5) }
        );

        let command: DrawingCommand =
            serde_json::from_value(json!({"type": "synthesize", "params": {"label": "circle"}})).unwrap();
        assert_eq!(command, DrawingCommand::Synthesize { label: ShapeLabel::Circle });
        assert_eq!(command.to_string(), "synthesize");
    }

    #[test]
    fn test_schema_lists_commands() {
        let schema = serde_json::to_string(&DrawingCommand::schema()).unwrap();
        for name in DrawingCommand::command_names() {
            assert!(schema.contains(name), "{name} missing from schema");
        }
    }

    #[test]
    fn test_stroke_documents() {
        assert_eq!(stroke_from_json("[[1, 2], [3, 4]]").unwrap().len(), 2);
        assert_eq!(stroke_from_json(r#"{"points": [{"x": 1, "y": 2}]}"#).unwrap().len(), 1);
        assert!(matches!(
            stroke_from_json(r#"{"pts": []}"#),
            Err(PerfectError::InvalidParameter(_))
        ));
        assert!(matches!(stroke_from_json("12"), Err(PerfectError::InvalidParameter(_))));
        assert!(matches!(stroke_from_json("[1,"), Err(PerfectError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_requires_loaded_stroke() {
        let service = DrawingService::new();
        let err = service.execute(DrawingCommand::Classify).await.unwrap_err();
        assert!(matches!(err, PerfectError::NoStrokeLoaded));
    }

    #[tokio::test]
    async fn test_rejects_undersized_stroke() {
        let mut service = DrawingService::new();
        service.set_stroke(vec![json!([0, 0]), json!([1, 1])]);
        let err = service.execute(DrawingCommand::Classify).await.unwrap_err();
        assert!(matches!(err, PerfectError::InsufficientData { required: 3, actual: 2 }));
    }

    #[tokio::test]
    async fn test_minimum_counts_parsed_points() {
        let mut service = DrawingService::new();
        service.set_stroke(vec![json!("bad"), json!(null), json!([1, 1])]);

        let err = service
            .execute(DrawingCommand::Perfect { smoothing_window: None, simplify_epsilon: None })
            .await
            .unwrap_err();
        assert!(matches!(err, PerfectError::InsufficientData { required: 3, actual: 1 }));

        let err = service.execute(DrawingCommand::Smooth { window: 2 }).await.unwrap_err();
        assert!(matches!(err, PerfectError::InsufficientData { required: 3, actual: 1 }));
    }

    #[tokio::test]
    async fn test_smooth_with_huge_window() {
        let mut service = DrawingService::new();
        service.set_stroke(vec![json!([0, 0]), json!([6, 3]), json!([12, 6])]);
        let output = service
            .execute(DrawingCommand::Smooth { window: usize::MAX })
            .await
            .unwrap();
        assert_eq!(output, CommandOutput::Points(vec![Point::new(6.0, 3.0); 3]));
    }

    #[tokio::test]
    async fn test_rejects_oversized_stroke() {
        let perfector = PipelineBuilder::new()
            .with_config(crate::config::PerfectConfig { max_points: 4, ..Default::default() })
            .build();
        let mut service = DrawingService::with_perfector(perfector);
        service.set_stroke((0..5).map(|i| json!([i, i])).collect());
        let err = service.execute(DrawingCommand::Classify).await.unwrap_err();
        assert!(matches!(err, PerfectError::InputTooLarge { max: 4, actual: 5 }));
    }

    #[tokio::test]
    async fn test_classify_mixed_encodings() {
        let mut service = DrawingService::new();
        service.set_stroke(square_stroke());
        let output = service.execute(DrawingCommand::Classify).await.unwrap();
        match output {
            CommandOutput::Classification(c) => assert_eq!(c.label, ShapeLabel::Square),
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_simplify_rejects_negative_epsilon() {
        let mut service = DrawingService::new();
        service.set_stroke(square_stroke());
        let err = service
            .execute(DrawingCommand::Simplify { epsilon: -1.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, PerfectError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_perfect_without_remote_uses_local_label() {
        let mut service = DrawingService::new();
        service.set_stroke(square_stroke());
        let output = service
            .execute(DrawingCommand::Perfect { smoothing_window: None, simplify_epsilon: None })
            .await
            .unwrap();
        let CommandOutput::Perfected(result) = output else {
            panic!("expected a perfected drawing");
        };
        assert_eq!(result.recognized_as.as_deref(), Some("square"));
        assert_eq!(result.smoothed_points.len(), 5);
        assert_eq!(result.original_points.len(), 36);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_load_stroke_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stroke.json");
        std::fs::write(&path, serde_json::to_string(&json!({"points": square_stroke()})).unwrap())
            .unwrap();

        let mut service = DrawingService::new();
        service.load_stroke(&path).unwrap();
        assert_eq!(service.stroke().map(|s| s.len()), Some(36));

        let output = service
            .execute(DrawingCommand::Synthesize { label: ShapeLabel::Rectangle })
            .await
            .unwrap();
        assert_eq!(
            output,
            CommandOutput::Points(vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 100.0),
                Point::new(0.0, 100.0),
                Point::new(0.0, 0.0),
            ])
        );
    }
}
