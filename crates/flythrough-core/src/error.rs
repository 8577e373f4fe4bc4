//! Error types for flythrough-rs.

use thiserror::Error;

/// The main error type for flythrough-rs operations.
#[derive(Error, Debug)]
pub enum FlythroughError {
    /// A path cannot be built without keyframes.
    #[error("insufficient keyframes - add at least one keyframe before creating a path")]
    InsufficientKeyFrames,

    /// The path was queried before being (re)built.
    #[error("path not built - call create_path() after modifying keyframes")]
    PathNotBuilt,

    /// Keyframe times must be finite and non-negative.
    #[error("invalid keyframe time: {0}")]
    InvalidTime(f64),

    /// No keyframe exists at the given index.
    #[error("no keyframe at index {index} (path has {len})")]
    KeyFrameIndexOutOfRange { index: usize, len: usize },

    /// Spline knots were not strictly increasing.
    #[error("spline knots must be strictly increasing in time")]
    NonIncreasingKnots,

    /// An option value is out of its valid range.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A scene node with the given ID already exists.
    #[error("node '{0}' already exists")]
    NodeExists(String),

    /// A scene node with the given ID was not found.
    #[error("node '{0}' not found")]
    NodeNotFound(String),

    /// Playback was requested before a path was created.
    #[error("fly-through disabled - create a path first")]
    FlyDisabled,

    /// Malformed keyframe file content.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flythrough-rs operations.
pub type Result<T> = std::result::Result<T, FlythroughError>;
