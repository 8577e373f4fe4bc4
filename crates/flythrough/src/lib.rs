//! flythrough-rs: record camera keyframes and fly through a spline path.
//!
//! Record the pose of a live camera at successive times, fit a smooth path
//! through the keyframes, and play it back step by step while the host keeps
//! its event loop running.
//!
//! # Quick Start
//!
//! ```no_run
//! use flythrough::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut camera = Camera::new();
//!     let mut session = Session::new();
//!
//!     // Record two keyframes, moving the camera in between
//!     session.add_key_frame(&camera)?;
//!     camera.orbit(0.5, 0.0);
//!     session.add_key_frame(&camera)?;
//!
//!     // Fit the path and play it back
//!     session.create_path()?;
//!     session.fly(&mut camera, &mut NoEvents)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`CameraPath`] owns the keyframes and the position, focal point and
//!   view-up curves. Curves are rebuilt explicitly with
//!   [`CameraPath::create_path`] and dropped on every keyframe change.
//! - [`LiveCamera`] is the camera being recorded and driven; [`Camera`] is a
//!   ready-made implementation.
//! - [`playback::fly`] steps through a built path; [`Session`] wraps the
//!   record / clear / build / fly actions of an interactive panel.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Step counts are derived from small, non-negative time spans
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod playback;
pub mod session;

// Re-export core types
pub use flythrough_core::{
    error::{FlythroughError, Result},
    options::{EndConstraint, Options, SplineOptions},
    CameraPath, CameraPose, DVec3, Keyframe, KochanekSpline, PathCurves, PathState, MAX_SAMPLES,
};

// Re-export scene adapters
pub use flythrough_scene::{storage, Camera, LiveCamera, PathPolyline, Scene, KCSV_EXTENSION};

pub use playback::{CancelToken, EventPump, NoEvents, PathSampler, PlaybackOutcome};
pub use session::{FlightControl, Session, FLY_LABEL, STOP_LABEL};

/// Initializes the `env_logger` backend for the `log` facade.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::info!("flythrough-rs logging initialized");
    }
}
