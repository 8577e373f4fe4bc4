//! Time-stamped camera keyframes.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{FlythroughError, Result};
use crate::pose::CameraPose;

/// A recorded camera pose tagged with a time value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time of the keyframe; finite and non-negative.
    pub time: f64,
    /// The recorded pose.
    pub pose: CameraPose,
}

impl Keyframe {
    /// Creates a keyframe from its time and the three pose vectors.
    #[must_use]
    pub fn new(time: f64, position: DVec3, focal_point: DVec3, view_up: DVec3) -> Self {
        Self {
            time,
            pose: CameraPose::new(position, focal_point, view_up),
        }
    }

    /// Creates a keyframe from a pose.
    #[must_use]
    pub fn from_pose(time: f64, pose: CameraPose) -> Self {
        Self { time, pose }
    }

    /// Returns the keyframe position.
    #[must_use]
    pub fn position(&self) -> DVec3 {
        self.pose.position
    }

    /// Returns the keyframe focal point.
    #[must_use]
    pub fn focal_point(&self) -> DVec3 {
        self.pose.focal_point
    }

    /// Returns the keyframe view-up.
    #[must_use]
    pub fn view_up(&self) -> DVec3 {
        self.pose.view_up
    }
}

/// Rejects NaN, infinite and negative times. `-0.0` is returned as `0.0`.
pub fn validate_time(time: f64) -> Result<f64> {
    if time.is_finite() && time >= 0.0 {
        Ok(time + 0.0)
    } else {
        Err(FlythroughError::InvalidTime(time))
    }
}
