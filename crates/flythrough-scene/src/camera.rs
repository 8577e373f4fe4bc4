//! Live camera and view management.

use flythrough_core::CameraPose;
use glam::DVec3;

/// A camera whose pose can be read and driven by a fly-through.
///
/// The path never holds on to the camera; poses are copied in and out.
pub trait LiveCamera {
    /// Returns the current pose.
    fn pose(&self) -> CameraPose;

    /// Applies a pose.
    fn set_pose(&mut self, pose: &CameraPose);

    /// Refits the near/far clipping planes after the pose changed.
    fn reset_clipping_range(&mut self);
}

/// A 3D camera viewing the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: DVec3,
    /// Point the camera is looking at.
    pub focal_point: DVec3,
    /// Up vector.
    pub view_up: DVec3,
    /// Near clipping plane.
    pub near: f64,
    /// Far clipping plane.
    pub far: f64,
    /// Scene bounds used to fit the clipping range.
    pub scene_bounds: Option<(DVec3, DVec3)>,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 3.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            near: 0.01,
            far: 1000.0,
            scene_bounds: None,
        }
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> DVec3 {
        (self.focal_point - self.position).normalize_or_zero()
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> DVec3 {
        self.forward().cross(self.view_up).normalize_or_zero()
    }

    /// Orbits the camera around the focal point.
    pub fn orbit(&mut self, delta_x: f64, delta_y: f64) {
        let offset = self.position - self.focal_point;
        let radius = offset.length();
        if radius == 0.0 {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).acos();

        theta -= delta_x;
        phi = (phi - delta_y).clamp(0.01, std::f64::consts::PI - 0.01);

        self.position = self.focal_point
            + DVec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Pans the camera and its focal point together.
    pub fn pan(&mut self, delta_x: f64, delta_y: f64) {
        let offset = self.right() * delta_x + self.view_up * delta_y;
        self.position += offset;
        self.focal_point += offset;
    }

    /// Dollies the camera toward (positive) or away from the focal point.
    pub fn zoom(&mut self, delta: f64) {
        let direction = self.forward();
        let distance = self.position.distance(self.focal_point);
        let new_distance = (distance - delta).max(0.1);
        self.position = self.focal_point - direction * new_distance;
    }

    /// Resets the camera to look at the given bounding box.
    pub fn look_at_box(&mut self, min: DVec3, max: DVec3) {
        let center = (min + max) * 0.5;
        let size = (max - min).length();

        self.focal_point = center;
        self.position = center + DVec3::new(0.0, 0.0, size * 1.5);
        self.view_up = DVec3::Y;
        self.scene_bounds = Some((min, max));
        self.reset_clipping_range();
    }

    /// Fits near/far to the scene bounds along the view direction.
    fn fit_clipping_to_bounds(&mut self, min: DVec3, max: DVec3) {
        let direction = self.forward();
        let (near, far) = box_corners(min, max)
            .iter()
            .map(|corner| (*corner - self.position).dot(direction))
            .fold((f64::MAX, f64::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)));

        // Pad slightly so geometry on the box faces is not clipped.
        let far = if far > 0.0 { far * 1.01 } else { 1.0 };
        self.far = far;
        self.near = (near * 0.99).max(far * NEAR_FAR_RATIO);
    }
}

/// Smallest near/far ratio kept when the camera sits inside the bounds.
const NEAR_FAR_RATIO: f64 = 0.001;

fn box_corners(min: DVec3, max: DVec3) -> [DVec3; 8] {
    [
        DVec3::new(min.x, min.y, min.z),
        DVec3::new(max.x, min.y, min.z),
        DVec3::new(min.x, max.y, min.z),
        DVec3::new(max.x, max.y, min.z),
        DVec3::new(min.x, min.y, max.z),
        DVec3::new(max.x, min.y, max.z),
        DVec3::new(min.x, max.y, max.z),
        DVec3::new(max.x, max.y, max.z),
    ]
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveCamera for Camera {
    fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.focal_point, self.view_up)
    }

    fn set_pose(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.focal_point = pose.focal_point;
        self.view_up = pose.view_up;
    }

    fn reset_clipping_range(&mut self) {
        if let Some((min, max)) = self.scene_bounds {
            self.fit_clipping_to_bounds(min, max);
            return;
        }
        let distance = self.position.distance(self.focal_point);
        if distance > 0.0 {
            self.near = distance * 0.01;
            self.far = distance * 100.0;
        } else {
            self.near = 0.01;
            self.far = 1000.0;
        }
    }
}
