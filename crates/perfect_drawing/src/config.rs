use std::fs;
use std::path::Path;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::{PerfectError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://quickdraw-api.appspot.com/api/classify";

/// Where `recognized_as` comes from
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecognitionStrategy {
    /// Remote top prediction only; the local verdict is reported but not used
    Remote,
    /// Local heuristic classifier only; the remote service is never called
    Local,
    /// Remote top prediction when present, otherwise the local verdict
    #[default]
    RemoteWithLocalFallback,
}

/// When the idealized outline replaces the smoothed/simplified points
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IdealizePolicy {
    Never,
    /// Only when the label came from the local classifier
    #[default]
    LocalOnly,
    /// Whenever the final label names an idealizable shape
    Always,
}

/// Remote classifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// Canvas size the strokes were captured on; used to scale into 0..255
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub timeout_secs: f64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            canvas_width: 800.0,
            canvas_height: 500.0,
            timeout_secs: 10.0,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::from_secs(10))
    }
}

/// All pipeline parameters in one struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PerfectConfig {
    /// Moving-average half window
    pub smoothing_window: usize,
    /// RDP tolerance in canvas units
    pub simplify_epsilon: f64,
    /// Smallest stroke accepted by the public entry point
    pub min_points: usize,
    /// Largest stroke accepted by the public entry point
    pub max_points: usize,
    pub strategy: RecognitionStrategy,
    pub idealize: IdealizePolicy,
    pub remote: RemoteConfig,
}

impl Default for PerfectConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 3,
            simplify_epsilon: 2.0,
            min_points: 3,
            max_points: 10_000,
            strategy: RecognitionStrategy::default(),
            idealize: IdealizePolicy::default(),
            remote: RemoteConfig::default(),
        }
    }
}

impl PerfectConfig {
    /// Configuration for the earlier, fully local service variant
    pub fn local() -> Self {
        Self {
            strategy: RecognitionStrategy::Local,
            remote: RemoteConfig { enabled: false, ..RemoteConfig::default() },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.simplify_epsilon.is_finite() || self.simplify_epsilon < 0.0 {
            return Err(PerfectError::InvalidParameter(format!(
                "simplify_epsilon must be a non-negative number, got {}",
                self.simplify_epsilon
            )));
        }
        if self.min_points > self.max_points {
            return Err(PerfectError::InvalidParameter(format!(
                "min_points ({}) exceeds max_points ({})",
                self.min_points, self.max_points
            )));
        }
        if !self.remote.timeout_secs.is_finite() || self.remote.timeout_secs <= 0.0 {
            return Err(PerfectError::InvalidParameter(format!(
                "remote.timeout_secs must be positive, got {}",
                self.remote.timeout_secs
            )));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PerfectConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: PerfectConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(PerfectError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a file, choosing the format from the extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_ref = path.as_ref();
        let content = match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(PerfectError::UnsupportedFileFormat),
        };
        fs::write(path_ref, content)?;
        Ok(())
    }
}
