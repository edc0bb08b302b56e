//! Error type shared by the classification and layout core and the loader.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadingLogError {
    #[error("invalid sort policy: {0:?}")]
    InvalidPolicy(String),

    #[error("partition layout needs at least one segment")]
    EmptyPartition,

    #[error("partition width must be positive, got {0}")]
    InvalidWidth(u32),

    #[error("weight for {label:?} must be a positive finite number, got {weight}")]
    InvalidWeight { label: String, weight: f64 },

    #[error("lightness range must satisfy 0 <= min <= max <= 100, got [{min}, {max}]")]
    InvalidLightness { min: f64, max: f64 },

    #[error("{segments} segments need {needed}px of gaps but the bar is {width}px wide")]
    BarTooNarrow {
        segments: usize,
        width: u32,
        needed: u32,
    },

    #[error("rating must be between 0 and 5, got {0}")]
    InvalidRating(u8),

    #[error("no group named {0:?}")]
    MissingKey(String),

    #[error("malformed date {value:?}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = ReadingLogError> = std::result::Result<T, E>;
