//! Scene adapters for flythrough-rs.
//!
//! Everything the camera path talks to outside of pure interpolation:
//! - [`LiveCamera`] and the [`Camera`] implementation driven during playback
//! - [`Scene`], a registry of camera paths and keyframe cameras
//! - [`storage`] for the `.kcsv` keyframe file format
//! - [`PathPolyline`] for previewing a built path as a curve network

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Polyline node indices are u32 like other curve networks
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::float_cmp)]

pub mod camera;
pub mod polyline;
pub mod registry;
pub mod storage;

pub use camera::{Camera, LiveCamera};
pub use polyline::PathPolyline;
pub use registry::Scene;
pub use storage::KCSV_EXTENSION;
