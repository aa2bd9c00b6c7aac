// src/error.rs
//
// Error types for the evaluation engine and artifact storage.

use std::path::PathBuf;
use thiserror::Error;

/// Precondition violations and sweep failures raised by the engine.
///
/// Numeric degenerate cases (no detections, no reference intervals) are not
/// errors; metrics fall back to zero instead.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("sampling frequency must be positive and finite, got {0}")]
    InvalidSamplingRate(f64),

    #[error("lockout duration must be non-negative and finite, got {0}")]
    InvalidLockout(f64),

    #[error("envelope sample {index} is not finite ({value})")]
    NonFiniteSample { index: usize, value: f32 },

    #[error("threshold is not finite: {0}")]
    NonFiniteThreshold(f64),

    #[error("reference interval {index} is malformed: start {start}, stop {stop}")]
    MalformedInterval { index: usize, start: f64, stop: f64 },

    #[error("reference intervals are not sorted by start at index {index}")]
    UnsortedIntervals { index: usize },

    #[error("detection timestamps are not sorted at index {index}")]
    UnsortedEvents { index: usize },

    #[error("probe range ({low}, {high}) is not finite")]
    InvalidRange { low: f64, high: f64 },

    #[error("threshold {0} has already been evaluated in this sweep")]
    DuplicateThreshold(f64),

    #[error("sweep stalled at probe {probe}: threshold {threshold} was already evaluated (probe range exhausted)")]
    Stalled { probe: usize, threshold: f64 },

    #[error("percentile must lie in [0, 100], got {0}")]
    InvalidPercentile(f64),

    #[error("cannot take a percentile of an empty envelope")]
    EmptyEnvelope,

    #[error("invalid sweep configuration: {0}")]
    InvalidConfig(String),

    #[error("evaluation at threshold {threshold} is inconsistent: {reason}")]
    InconsistentEvaluation { threshold: f64, reason: String },
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Failures reading or writing persisted artifacts.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error on {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid artifact {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: EvalError,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;
