pub mod builder;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    config::{IdealizePolicy, PerfectConfig, RecognitionStrategy},
    error::{PerfectError, Result},
    ingest::parse_stroke,
    observer::{PipelineEvent, PipelineObserver},
    remote::{HttpRemoteClassifier, RecognitionResponse},
    traits::{RemoteClassifier, ShapeClassifier, ShapeSynthesizer, StrokeSimplifier, StrokeSmoother},
    types::{Classification, PerfectedDrawing, Point, RecognitionSource, ShapeLabel},
};

/// Stroke perfection orchestrator.
///
/// Runs the optional remote classifier concurrently with the local stage
/// (classification, smoothing, simplification), merges the two according to
/// the configured [`RecognitionStrategy`] and never fails: every problem ends
/// up in [`PerfectedDrawing::error`].
#[derive(Clone)]
pub struct Perfector {
    config: PerfectConfig,
    smoother: Arc<dyn StrokeSmoother>,
    simplifier: Arc<dyn StrokeSimplifier>,
    classifier: Arc<dyn ShapeClassifier>,
    synthesizer: Arc<dyn ShapeSynthesizer>,
    remote: Option<Arc<dyn RemoteClassifier>>,
    observer: Arc<dyn PipelineObserver>,
}

/// Output of the CPU-bound half of the pipeline
struct LocalStage {
    classification: Classification,
    simplified: Vec<Point>,
}

impl Perfector {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new orchestrator with the given components
    pub fn new(
        config: PerfectConfig,
        smoother: Arc<dyn StrokeSmoother>,
        simplifier: Arc<dyn StrokeSimplifier>,
        classifier: Arc<dyn ShapeClassifier>,
        synthesizer: Arc<dyn ShapeSynthesizer>,
        remote: Option<Arc<dyn RemoteClassifier>>,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            config,
            smoother,
            simplifier,
            classifier,
            synthesizer,
            remote,
            observer,
        }
    }

    /// Default components, with the HTTP transport wired in when the
    /// configuration asks for a remote classifier
    pub fn from_config(config: PerfectConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Self::builder().with_config(config.clone());
        if config.remote.enabled && config.strategy != RecognitionStrategy::Local {
            builder = builder.set_remote(HttpRemoteClassifier::new(config.remote.clone())?);
        }
        Ok(builder.build())
    }

    pub fn config(&self) -> &PerfectConfig {
        &self.config
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn smoother(&self) -> &dyn StrokeSmoother {
        self.smoother.as_ref()
    }

    pub fn simplifier(&self) -> &dyn StrokeSimplifier {
        self.simplifier.as_ref()
    }

    pub fn classifier(&self) -> &dyn ShapeClassifier {
        self.classifier.as_ref()
    }

    pub fn synthesizer(&self) -> &dyn ShapeSynthesizer {
        self.synthesizer.as_ref()
    }

    /// Perfect a raw stroke using the configured smoothing window and epsilon
    pub async fn perfect_with_defaults(&self, raw: &[Value]) -> PerfectedDrawing {
        self.perfect_drawing(raw, self.config.smoothing_window, self.config.simplify_epsilon)
            .await
    }

    /// Perfect a raw stroke.
    ///
    /// Elements that cannot be coerced into points are skipped. With no valid
    /// point left the result is empty and carries an error message.
    pub async fn perfect_drawing(
        &self,
        raw: &[Value],
        smoothing_window: usize,
        simplify_epsilon: f64,
    ) -> PerfectedDrawing {
        self.observer.on_event(&PipelineEvent::Received { elements: raw.len() });

        let parsed = parse_stroke(raw);
        for rejected in &parsed.rejected {
            if let PerfectError::MalformedPoint { index, reason } = rejected {
                self.observer.on_event(&PipelineEvent::PointSkipped {
                    index: *index,
                    reason: reason.clone(),
                });
            }
        }

        self.perfect_points(parsed.points, smoothing_window, simplify_epsilon)
            .await
    }

    /// Perfect an already parsed stroke
    pub async fn perfect_points(
        &self,
        points: Vec<Point>,
        smoothing_window: usize,
        simplify_epsilon: f64,
    ) -> PerfectedDrawing {
        if points.is_empty() {
            let message = "No valid points provided";
            self.observer.on_event(&PipelineEvent::Aborted { message: message.to_string() });
            return PerfectedDrawing::failure(message);
        }
        self.observer.on_event(&PipelineEvent::Parsed { points: points.len() });

        let epsilon = self.bounded_epsilon(simplify_epsilon);

        let (local, remote) = tokio::join!(
            self.run_local(points.clone(), smoothing_window, epsilon),
            self.recognize_remote(&points),
        );

        let local = match local {
            Ok(local) => local,
            Err(message) => {
                self.observer.on_event(&PipelineEvent::Aborted { message: message.clone() });
                return PerfectedDrawing::failure(message);
            }
        };

        self.assemble(points, local, remote)
    }

    fn bounded_epsilon(&self, requested: f64) -> f64 {
        if requested.is_finite() && requested >= 0.0 {
            return requested;
        }
        self.observer.on_event(&PipelineEvent::ParameterClamped {
            name: "simplify_epsilon",
            requested,
            used: 0.0,
        });
        0.0
    }

    /// Classification, smoothing and simplification on the blocking pool.
    /// A panic in any stage becomes a server-error message.
    async fn run_local(
        &self,
        points: Vec<Point>,
        window: usize,
        epsilon: f64,
    ) -> std::result::Result<LocalStage, String> {
        let classifier = Arc::clone(&self.classifier);
        let smoother = Arc::clone(&self.smoother);
        let simplifier = Arc::clone(&self.simplifier);
        let observer = Arc::clone(&self.observer);

        let task = tokio::task::spawn_blocking(move || {
            let classification = classifier.classify(&points);
            observer.on_event(&PipelineEvent::LocalClassified { classification });

            let smoothed = smoother.smooth(&points, window);
            observer.on_event(&PipelineEvent::Smoothed {
                before: points.len(),
                after: smoothed.len(),
            });

            let simplified = simplifier.simplify(&smoothed, epsilon);
            observer.on_event(&PipelineEvent::Simplified {
                before: smoothed.len(),
                after: simplified.len(),
            });

            LocalStage { classification, simplified }
        });

        task.await.map_err(|e| format!("Server error: {}", e))
    }

    /// `None` when the remote classifier was not consulted
    async fn recognize_remote(&self, points: &[Point]) -> Option<RecognitionResponse> {
        if self.config.strategy == RecognitionStrategy::Local {
            self.observer.on_event(&PipelineEvent::RemoteSkipped { reason: "local strategy" });
            return None;
        }

        let Some(remote) = &self.remote else {
            self.observer.on_event(&PipelineEvent::RemoteSkipped {
                reason: "no remote classifier configured",
            });
            return match self.config.strategy {
                RecognitionStrategy::Remote => {
                    Some(RecognitionResponse::failed("No remote classifier configured"))
                }
                _ => None,
            };
        };

        let timeout = self.config.remote.timeout();
        let remote = Arc::clone(remote);
        let owned = points.to_vec();
        // Own task so a panicking transport surfaces as a JoinError
        let mut call = tokio::spawn(async move { remote.recognize(&owned).await });

        let response = match tokio::time::timeout(timeout, &mut call).await {
            Ok(Ok(Ok(response))) => response,
            Ok(Ok(Err(e))) => RecognitionResponse::failed(e.to_string()),
            Ok(Err(e)) => RecognitionResponse::failed(format!("Server error: {}", e)),
            Err(_) => {
                call.abort();
                RecognitionResponse::failed(PerfectError::RemoteTimeout(timeout).to_string())
            }
        };

        match (response.top_prediction(), &response.error) {
            (_, Some(message)) => {
                self.observer.on_event(&PipelineEvent::RemoteFailed { message: message.clone() });
            }
            (Some(top), None) => {
                self.observer.on_event(&PipelineEvent::RemoteRecognized {
                    name: top.name,
                    score: top.score,
                    predictions: response.prediction_list().len(),
                });
            }
            (None, None) => {
                self.observer.on_event(&PipelineEvent::RemoteFailed {
                    message: "no predictions in response".to_string(),
                });
            }
        }

        Some(response)
    }

    fn assemble(
        &self,
        points: Vec<Point>,
        local: LocalStage,
        remote: Option<RecognitionResponse>,
    ) -> PerfectedDrawing {
        let top = remote.as_ref().and_then(|r| r.top_prediction());
        let local_verdict = || {
            (
                Some(local.classification.label.to_string()),
                local.classification.confidence,
                RecognitionSource::Local,
            )
        };
        let unrecognized = || (None, 0.0, RecognitionSource::None);

        let (recognized_as, confidence, source) = match (self.config.strategy, top) {
            (RecognitionStrategy::Local, _) => local_verdict(),
            (_, Some(top)) => (Some(top.name), top.score, RecognitionSource::Remote),
            (RecognitionStrategy::Remote, None) => unrecognized(),
            // A local `unknown` is no better than no answer
            (RecognitionStrategy::RemoteWithLocalFallback, None)
                if local.classification.label == ShapeLabel::Unknown =>
            {
                unrecognized()
            }
            (RecognitionStrategy::RemoteWithLocalFallback, None) => local_verdict(),
        };

        let idealize_as = match self.config.idealize {
            IdealizePolicy::Never => None,
            IdealizePolicy::LocalOnly => {
                (source == RecognitionSource::Local).then_some(local.classification.label)
            }
            IdealizePolicy::Always => recognized_as
                .as_deref()
                .and_then(|name| ShapeLabel::from_str(name).ok()),
        }
        .filter(ShapeLabel::is_idealizable);

        let smoothed_points = match idealize_as {
            Some(label) => {
                let synthesized = panic::catch_unwind(AssertUnwindSafe(|| {
                    self.synthesizer.synthesize(label, &points)
                }));
                let outline = match synthesized {
                    Ok(outline) => outline,
                    Err(payload) => {
                        let message = format!("Server error: {}", panic_message(payload.as_ref()));
                        self.observer.on_event(&PipelineEvent::Aborted { message: message.clone() });
                        return PerfectedDrawing::failure(message);
                    }
                };
                self.observer.on_event(&PipelineEvent::Idealized {
                    label: label.to_string(),
                    points: outline.len(),
                });
                outline
            }
            None => local.simplified,
        };

        let (all_predictions, error) = match remote {
            Some(response) => (response.prediction_list().to_vec(), response.error),
            None => (Vec::new(), None),
        };

        self.observer.on_event(&PipelineEvent::Completed {
            source,
            points: smoothed_points.len(),
        });

        PerfectedDrawing {
            original_points: points,
            smoothed_points,
            recognized_as,
            confidence,
            all_predictions,
            error,
            source,
            local: Some(local.classification),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked with message \"{}\"", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked with message \"{}\"", message)
    } else {
        "panicked".to_string()
    }
}

impl std::fmt::Debug for Perfector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Perfector")
            .field("config", &self.config)
            .field("has_remote", &self.remote.is_some())
            .finish()
    }
}
