//! Core abstractions for flythrough-rs.
//!
//! This crate provides the keyframe and interpolation types used throughout flythrough-rs:
//! - [`CameraPath`] holding time-stamped [`Keyframe`]s and their fitted curves
//! - [`KochanekSpline`] interpolating one 3D channel over time
//! - [`CameraPose`] and its view-up re-orthogonalization
//! - Configuration [`Options`] and the shared error type

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Sample counts are bounded by `MAX_SAMPLES` before casting
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
// Exact comparisons are intended for keyframe times
#![allow(clippy::float_cmp)]

pub mod camera_path;
pub mod error;
pub mod keyframe;
pub mod options;
pub mod pose;
pub mod spline;

pub use camera_path::{CameraPath, PathCurves, PathState};
pub use error::{FlythroughError, Result};
pub use keyframe::Keyframe;
pub use options::{EndConstraint, Options, SplineOptions};
pub use pose::CameraPose;
pub use spline::{KochanekSpline, MAX_SAMPLES};

// Re-export glam types for convenience
pub use glam::DVec3;
