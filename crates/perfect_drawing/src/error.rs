use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PerfectError {
    #[error("Empty point set")]
    EmptyInput,

    #[error("Malformed point at index {index}: {reason}")]
    MalformedPoint { index: usize, reason: String },

    #[error("Insufficient data: {required} points required, {actual} provided")]
    InsufficientData { required: usize, actual: usize },

    #[error("Stroke too large: at most {max} points accepted, {actual} provided")]
    InputTooLarge { max: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("No stroke loaded")]
    NoStrokeLoaded,

    #[error("Remote transport error: {0}")]
    RemoteTransport(String),

    #[error("Remote classifier timed out after {0:?}")]
    RemoteTimeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

pub type Result<T> = std::result::Result<T, PerfectError>;
