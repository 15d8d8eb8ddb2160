use std::sync::Arc;

use crate::{
    algorithms::{
        HeuristicClassifier, IdealShapeSynthesizer, MovingAverageSmoother,
        RamerDouglasPeuckerSimplifier,
    },
    config::{IdealizePolicy, PerfectConfig, RecognitionStrategy},
    error::Result,
    observer::{PipelineObserver, TracingObserver},
    pipeline::Perfector,
    remote::HttpRemoteClassifier,
    traits::{RemoteClassifier, ShapeClassifier, ShapeSynthesizer, StrokeSimplifier, StrokeSmoother},
};

/// Builder for creating orchestrators with a fluent API
pub struct PipelineBuilder {
    config: PerfectConfig,
    smoother: Option<Arc<dyn StrokeSmoother>>,
    simplifier: Option<Arc<dyn StrokeSimplifier>>,
    classifier: Option<Arc<dyn ShapeClassifier>>,
    synthesizer: Option<Arc<dyn ShapeSynthesizer>>,
    remote: Option<Arc<dyn RemoteClassifier>>,
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PerfectConfig::default(),
            smoother: None,
            simplifier: None,
            classifier: None,
            synthesizer: None,
            remote: None,
            observer: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: PerfectConfig) -> Self {
        self.config = config;
        self
    }

    pub fn smoothing_window(mut self, window: usize) -> Self {
        self.config.smoothing_window = window;
        self
    }

    pub fn simplify_epsilon(mut self, epsilon: f64) -> Self {
        self.config.simplify_epsilon = epsilon;
        self
    }

    pub fn strategy(mut self, strategy: RecognitionStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn idealize(mut self, policy: IdealizePolicy) -> Self {
        self.config.idealize = policy;
        self
    }

    /// Set the smoother (replaces any existing one)
    pub fn set_smoother<S>(mut self, smoother: S) -> Self
    where
        S: StrokeSmoother + 'static,
    {
        self.smoother = Some(Arc::new(smoother));
        self
    }

    /// Set the simplifier (replaces any existing one)
    pub fn set_simplifier<S>(mut self, simplifier: S) -> Self
    where
        S: StrokeSimplifier + 'static,
    {
        self.simplifier = Some(Arc::new(simplifier));
        self
    }

    /// Set the local classifier (replaces any existing one)
    pub fn set_classifier<C>(mut self, classifier: C) -> Self
    where
        C: ShapeClassifier + 'static,
    {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    /// Set the synthesizer (replaces any existing one)
    pub fn set_synthesizer<S>(mut self, synthesizer: S) -> Self
    where
        S: ShapeSynthesizer + 'static,
    {
        self.synthesizer = Some(Arc::new(synthesizer));
        self
    }

    /// Set the remote transport (replaces any existing one)
    pub fn set_remote<R>(mut self, remote: R) -> Self
    where
        R: RemoteClassifier + 'static,
    {
        self.remote = Some(Arc::new(remote));
        self
    }

    /// Share an already constructed remote transport
    pub fn set_shared_remote(mut self, remote: Arc<dyn RemoteClassifier>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Use the HTTP transport described by the current configuration
    pub fn with_http_remote(self) -> Result<Self> {
        let remote = HttpRemoteClassifier::new(self.config.remote.clone())?;
        Ok(self.set_remote(remote))
    }

    pub fn without_remote(mut self) -> Self {
        self.remote = None;
        self
    }

    /// Set the event observer (defaults to [`TracingObserver`])
    pub fn set_observer<O>(mut self, observer: O) -> Self
    where
        O: PipelineObserver + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Share an observer with the caller, e.g. to inspect recorded events
    pub fn set_shared_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the orchestrator with default components where none were given
    pub fn build(self) -> Perfector {
        Perfector::new(
            self.config,
            self.smoother.unwrap_or_else(|| Arc::new(MovingAverageSmoother)),
            self.simplifier.unwrap_or_else(|| Arc::new(RamerDouglasPeuckerSimplifier)),
            self.classifier.unwrap_or_else(|| Arc::new(HeuristicClassifier::default())),
            self.synthesizer.unwrap_or_else(|| Arc::new(IdealShapeSynthesizer)),
            self.remote,
            self.observer.unwrap_or_else(|| Arc::new(TracingObserver)),
        )
    }

    /// Build the fully local variant: heuristic label, idealized outline
    pub fn build_local() -> Perfector {
        Self::new().with_config(PerfectConfig::local()).build()
    }

    /// Build the remote variant: remote label, smoothed and simplified points
    pub fn build_remote(config: PerfectConfig) -> Result<Perfector> {
        Ok(Self::new()
            .with_config(config)
            .strategy(RecognitionStrategy::Remote)
            .idealize(IdealizePolicy::Never)
            .with_http_remote()?
            .build())
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
