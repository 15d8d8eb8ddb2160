//! Structured pipeline events. The orchestrator reports to a single
//! [`PipelineObserver`]; control flow never depends on it.

use tracing::{debug, info, warn};

use crate::types::{Classification, RecognitionSource};

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Received { elements: usize },
    PointSkipped { index: usize, reason: String },
    Parsed { points: usize },
    ParameterClamped { name: &'static str, requested: f64, used: f64 },
    RemoteSkipped { reason: &'static str },
    RemoteRecognized { name: String, score: f64, predictions: usize },
    RemoteFailed { message: String },
    LocalClassified { classification: Classification },
    Smoothed { before: usize, after: usize },
    Simplified { before: usize, after: usize },
    Idealized { label: String, points: usize },
    Completed { source: RecognitionSource, points: usize },
    Aborted { message: String },
}

pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Default observer: forwards every event to `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Received { elements } => {
                debug!(elements, "Perfect drawing requested");
            }
            PipelineEvent::PointSkipped { index, reason } => {
                warn!(index, %reason, "Skipping malformed point");
            }
            PipelineEvent::Parsed { points } => {
                debug!(points, "Converted input points");
            }
            PipelineEvent::ParameterClamped { name, requested, used } => {
                warn!(name, requested, used, "Clamped out-of-range parameter");
            }
            PipelineEvent::RemoteSkipped { reason } => {
                debug!(reason, "Remote classifier not called");
            }
            PipelineEvent::RemoteRecognized { name, score, predictions } => {
                info!(%name, score, predictions, "Remote classifier recognized stroke");
            }
            PipelineEvent::RemoteFailed { message } => {
                warn!(%message, "Remote classifier unavailable, continuing locally");
            }
            PipelineEvent::LocalClassified { classification } => {
                debug!(
                    label = %classification.label,
                    confidence = classification.confidence,
                    "Local classification"
                );
            }
            PipelineEvent::Smoothed { before, after } => {
                debug!(before, after, "Smoothed points");
            }
            PipelineEvent::Simplified { before, after } => {
                debug!(before, after, "Simplified points");
            }
            PipelineEvent::Idealized { label, points } => {
                debug!(%label, points, "Substituted idealized outline");
            }
            PipelineEvent::Completed { source, points } => {
                info!(%source, points, "Perfect drawing complete");
            }
            PipelineEvent::Aborted { message } => {
                warn!(%message, "Perfect drawing aborted");
            }
        }
    }
}

/// Observer that drops every event
#[derive(Debug, Clone, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_event(&self, _event: &PipelineEvent) {}
}
