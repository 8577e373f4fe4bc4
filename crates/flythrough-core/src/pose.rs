//! Camera pose: position, focal point, and view-up.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A camera pose as recorded in a keyframe or evaluated along a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Camera position in world space.
    pub position: DVec3,
    /// Point the camera is looking at.
    pub focal_point: DVec3,
    /// Up vector.
    pub view_up: DVec3,
}

impl CameraPose {
    /// Creates a new pose.
    #[must_use]
    pub fn new(position: DVec3, focal_point: DVec3, view_up: DVec3) -> Self {
        Self {
            position,
            focal_point,
            view_up,
        }
    }

    /// Returns the distance from position to focal point.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.position.distance(self.focal_point)
    }

    /// Returns the normalized view direction, if position and focal point differ.
    #[must_use]
    pub fn direction(&self) -> Option<DVec3> {
        (self.focal_point - self.position).try_normalize()
    }

    /// Returns a copy whose view-up is unit length and orthogonal to the
    /// view direction.
    ///
    /// Interpolating the view-up channel independently drifts it off the
    /// camera frame between keyframes. When the frame is degenerate (focal
    /// point on the camera, or view-up parallel to the view direction) the
    /// view-up is only normalized, and left untouched if it is zero.
    #[must_use]
    pub fn orthogonalized(&self) -> Self {
        let Some(direction) = self.direction() else {
            return Self {
                view_up: self.view_up.try_normalize().unwrap_or(self.view_up),
                ..*self
            };
        };
        let view_up = direction
            .cross(self.view_up)
            .try_normalize()
            .map(|right| right.cross(direction))
            .or_else(|| self.view_up.try_normalize())
            .unwrap_or(self.view_up);
        Self { view_up, ..*self }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 1.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
        }
    }
}
