use async_trait::async_trait;

use crate::{
    error::Result,
    remote::RecognitionResponse,
    types::{Classification, Point, ShapeLabel},
};

/// Trait for stroke noise-reduction algorithms
pub trait StrokeSmoother: Send + Sync {
    /// Smooth the stroke, returning a sequence of the same length
    fn smooth(&self, points: &[Point], window: usize) -> Vec<Point>;
}

/// Trait for polyline reduction algorithms
pub trait StrokeSimplifier: Send + Sync {
    /// Reduce the point count, keeping the first and last points
    fn simplify(&self, points: &[Point], epsilon: f64) -> Vec<Point>;
}

/// Trait for local shape classification
pub trait ShapeClassifier: Send + Sync {
    /// Classify a raw stroke. Never fails: undersized input is `unknown`.
    fn classify(&self, points: &[Point]) -> Classification;
}

/// Trait for idealized outline generation
pub trait ShapeSynthesizer: Send + Sync {
    /// Emit a canonical outline for `label` sized to the stroke's bounds
    fn synthesize(&self, label: ShapeLabel, points: &[Point]) -> Vec<Point>;
}

/// Trait for the remote classification transport
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    /// Recognize a stroke given in canvas pixel coordinates
    async fn recognize(&self, points: &[Point]) -> Result<RecognitionResponse>;
}
