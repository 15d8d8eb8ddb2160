//! # Perfect Drawing
//!
//! Turns a noisy freehand stroke into a cleaner, recognized shape.
//!
//! ## Core Features
//!
//! - **Trait-based Architecture**: smoothing, simplification, classification and synthesis are swappable
//! - **Remote Recognition**: optional QuickDraw-style HTTP classifier, run concurrently with local work
//! - **Heuristic Classifier**: ordered rule table for circles, triangles, squares, rectangles and lines
//! - **Never-failing Orchestrator**: every problem is reported inside the result payload
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use perfect_drawing::Perfector;
//! use serde_json::json;
//!
//! # async fn run() {
//! let perfector = Perfector::builder().build();
//! let stroke = vec![json!({"x": 0, "y": 0}), json!([10, 12]), json!("20,21")];
//!
//! let result = perfector.perfect_drawing(&stroke, 3, 2.0).await;
//! println!("{:?} ({})", result.recognized_as, result.confidence);
//! # }
//! ```
//!
//! ## Remote Classifier
//!
//! ```rust,no_run
//! use perfect_drawing::{PerfectConfig, PipelineBuilder};
//!
//! let perfector = PipelineBuilder::build_remote(PerfectConfig::default())?;
//! # Ok::<(), perfect_drawing::PerfectError>(())
//! ```

pub mod error;
pub mod types;
pub mod geometry;
pub mod ingest;
pub mod traits;
pub mod algorithms;
pub mod config;
pub mod remote;
pub mod observer;
pub mod pipeline;
pub mod service;

pub use error::{PerfectError, Result};
pub use types::*;
pub use traits::*;
pub use algorithms::*;
pub use config::{IdealizePolicy, PerfectConfig, RecognitionStrategy, RemoteConfig};
pub use ingest::{ParsedStroke, parse_stroke};
pub use observer::{NoopObserver, PipelineEvent, PipelineObserver, TracingObserver};
pub use pipeline::{Perfector, builder::PipelineBuilder};
pub use remote::{HttpRemoteClassifier, RecognitionResponse};
pub use service::{CommandOutput, DrawingCommand, DrawingService};

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(radius: f64, samples: usize) -> Vec<Point> {
        (0..samples)
            .map(|i| {
                let t = i as f64 / samples as f64 * std::f64::consts::TAU;
                Point::new(200.0 + radius * t.cos(), 150.0 + radius * t.sin())
            })
            .collect()
    }

    #[test]
    fn test_components_compose() {
        let points = circle(100.0, 72);
        let smoothed = MovingAverageSmoother.smooth(&points, 2);
        let simplified = RamerDouglasPeuckerSimplifier.simplify(&smoothed, 2.0);
        assert!(simplified.len() < smoothed.len());

        let verdict = HeuristicClassifier::default().classify(&points);
        assert_eq!(verdict.label, ShapeLabel::Circle);

        let outline = IdealShapeSynthesizer.synthesize(verdict.label, &points);
        assert_eq!(outline.len(), 60);
    }

    #[tokio::test]
    async fn test_local_build_idealizes() {
        let perfector = PipelineBuilder::build_local();
        assert!(!perfector.has_remote());

        let result = perfector.perfect_points(circle(100.0, 72), 3, 2.0).await;
        assert_eq!(result.recognized_as.as_deref(), Some("circle"));
        assert_eq!(result.source, RecognitionSource::Local);
        assert_eq!(result.smoothed_points.len(), 60);
        assert!(result.error.is_none());
    }
}
