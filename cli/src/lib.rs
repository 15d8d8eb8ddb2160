use perfect_drawing::{DrawingCommand, PerfectConfig, PerfectError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    PerfectError(#[from] PerfectError),
    #[error("Job has no steps")]
    EmptyJob,
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// One named command applied to the job's stroke
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DrawingStep {
    pub name: String,
    pub description: Option<String>,
    pub command: Option<DrawingCommand>,
}

/// Batch job: a stroke file, where to write results, and the steps to run
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DrawingJob {
    pub stroke: String,
    pub output_dir: String,
    /// Optional pipeline configuration file (.toml or .json)
    #[serde(default)]
    pub config: Option<String>,
    pub steps: Vec<DrawingStep>,
}

impl DrawingJob {
    /// Load a job from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a job from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let job: DrawingJob = toml::from_str(content)?;
        job.check()
    }

    /// Load a job from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a job from a JSON string
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        let job: DrawingJob = serde_json::from_str(content)?;
        job.check()
    }

    /// Auto-detect file format and load the job
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Convert the job to a TOML string
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert the job to a JSON string
    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Pipeline configuration named by the job, or the defaults
    pub fn load_config(&self) -> Result<PerfectConfig, CliError> {
        load_config(self.config.as_deref().map(Path::new))
    }

    fn check(self) -> Result<Self, CliError> {
        if self.steps.is_empty() {
            return Err(CliError::EmptyJob);
        }
        Ok(self)
    }
}

/// Read a configuration file, falling back to defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<PerfectConfig, CliError> {
    let config = match path {
        Some(path) => PerfectConfig::from_file(path)?,
        None => PerfectConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfect_drawing::ShapeLabel;

    const JOB_TOML: &str = r#"
stroke = "strokes/circle.json"
output_dir = "out"

[[steps]]
name = "perfected"
command = { type = "perfect", params = { simplify_epsilon = 3.0 } }

[[steps]]
name = "ideal"
description = "Canonical circle"
command = { type = "synthesize", params = { label = "circle" } }

[[steps]]
name = "notes"
description = "No command, skipped"
"#;

    #[test]
    fn test_job_from_toml() {
        let job = DrawingJob::from_toml(JOB_TOML).unwrap();
        assert_eq!(job.stroke, "strokes/circle.json");
        assert_eq!(job.config, None);
        assert_eq!(job.steps.len(), 3);
        assert_eq!(
            job.steps[0].command,
            Some(DrawingCommand::Perfect { smoothing_window: None, simplify_epsilon: Some(3.0) })
        );
        assert_eq!(
            job.steps[1].command,
            Some(DrawingCommand::Synthesize { label: ShapeLabel::Circle })
        );
        assert_eq!(job.steps[2].command, None);
    }

    #[test]
    fn test_job_json_roundtrip() {
        let job = DrawingJob::from_toml(JOB_TOML).unwrap();
        let json = job.to_json().unwrap();
        assert_eq!(DrawingJob::from_json(&json).unwrap(), job);
    }

    #[test]
    fn test_empty_job_rejected() {
        let err = DrawingJob::from_json(r#"{"stroke": "s.json", "output_dir": "o", "steps": []}"#)
            .unwrap_err();
        assert!(matches!(err, CliError::EmptyJob));
    }

    #[test]
    fn test_job_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("job.toml");
        fs::write(&toml_path, JOB_TOML).unwrap();
        assert_eq!(DrawingJob::from_file(&toml_path).unwrap().steps.len(), 3);

        let yaml_path = dir.path().join("job.yaml");
        fs::write(&yaml_path, JOB_TOML).unwrap();
        assert!(matches!(
            DrawingJob::from_file(&yaml_path),
            Err(CliError::UnsupportedFileFormat)
        ));
    }

    #[test]
    fn test_load_config_defaults_and_file() {
        assert_eq!(load_config(None).unwrap(), PerfectConfig::default());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perfect.toml");
        fs::write(&path, "smoothing_window = 5\n[remote]\nenabled = false\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.smoothing_window, 5);
        assert!(!config.remote.enabled);
        assert_eq!(config.simplify_epsilon, 2.0);
    }
}
