//! Remote classification contract and its HTTP transport.
//!
//! The remote service is treated as an opaque classifier: it receives the
//! stroke scaled into a `0..255` canvas and answers with prediction records
//! ordered by descending score.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    config::RemoteConfig,
    error::{PerfectError, Result},
    traits::RemoteClassifier,
    types::Point,
};

/// Side length of the canonical canvas expected by the remote service
pub const CANONICAL_EXTENT: f64 = 255.0;

/// Remote answer. Prediction records are kept opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognized: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Name and score of the top prediction
#[derive(Debug, Clone, PartialEq)]
pub struct TopPrediction {
    pub name: String,
    pub score: f64,
}

impl RecognitionResponse {
    /// Degraded answer for a failed call
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            recognized: Some(Vec::new()),
            predictions: None,
            error: Some(message.into()),
        }
    }

    /// The `recognized` list, or `predictions` when that is absent or empty
    pub fn prediction_list(&self) -> &[Value] {
        match (&self.recognized, &self.predictions) {
            (Some(recognized), _) if !recognized.is_empty() => recognized,
            (_, Some(predictions)) => predictions,
            _ => &[],
        }
    }

    /// Index 0 of the prediction list, when it carries a name
    pub fn top_prediction(&self) -> Option<TopPrediction> {
        let top = self.prediction_list().first()?;
        let name = top.get("name")?.as_str()?.to_string();
        let score = match top.get("score") {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        };
        Some(TopPrediction { name, score })
    }
}

/// Scale canvas pixel coordinates into the canonical `0..255` range.
///
/// A non-positive canvas dimension leaves that axis unscaled.
pub fn normalize_points(points: &[Point], canvas_width: f64, canvas_height: f64) -> Vec<Point> {
    let scale = |value: f64, extent: f64| {
        if extent > 0.0 {
            value / extent * CANONICAL_EXTENT
        } else {
            value
        }
    };

    points
        .iter()
        .map(|p| Point::new(scale(p.x, canvas_width), scale(p.y, canvas_height)))
        .collect()
}

/// Request body: a single stroke of `[x, y]` pairs
pub fn drawing_payload(points: &[Point], canvas_width: f64, canvas_height: f64) -> Value {
    let stroke: Vec<[f64; 2]> = normalize_points(points, canvas_width, canvas_height)
        .into_iter()
        .map(|p| [p.x, p.y])
        .collect();
    json!({ "drawing": [stroke] })
}

/// HTTP transport for the QuickDraw-style classify endpoint
#[derive(Debug, Clone)]
pub struct HttpRemoteClassifier {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl HttpRemoteClassifier {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[async_trait]
impl RemoteClassifier for HttpRemoteClassifier {
    async fn recognize(&self, points: &[Point]) -> Result<RecognitionResponse> {
        let payload = drawing_payload(points, self.config.canvas_width, self.config.canvas_height);
        debug!(endpoint = %self.config.endpoint, points = points.len(), "Sending stroke to remote classifier");

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PerfectError::RemoteTransport(format!(
                "HTTP status {} from {}",
                status, self.config.endpoint
            )));
        }

        let body = response.text().await?;
        let parsed: RecognitionResponse = serde_json::from_str(&body).map_err(|e| {
            PerfectError::RemoteTransport(format!("malformed response body: {}", e))
        })?;
        debug!(predictions = parsed.prediction_list().len(), "Remote classifier answered");
        Ok(parsed)
    }
}
