//! Configuration options for path fitting and playback.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FlythroughError, Result};

/// Global configuration options for flythrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Spline fitting parameters shared by all three channels.
    pub spline: SplineOptions,

    /// Time added after each keyframe recorded from a live camera.
    pub key_frame_spacing: f64,

    /// Time advanced per playback step.
    pub playback_step: f64,

    /// Pause between playback steps, in milliseconds.
    pub step_delay_ms: u64,

    /// Samples per time unit when previewing the path as a polyline.
    pub preview_sample_rate: u32,

    /// Whether playback re-orthogonalizes the interpolated view-up.
    pub orthogonalize_view_up: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            spline: SplineOptions::default(),
            key_frame_spacing: 100.0,
            playback_step: 1.0,
            step_delay_ms: 50,
            preview_sample_rate: 30,
            orthogonalize_view_up: true,
        }
    }
}

impl Options {
    /// Checks that every numeric setting is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.key_frame_spacing.is_finite() && self.key_frame_spacing > 0.0) {
            return Err(FlythroughError::InvalidOption(format!(
                "key_frame_spacing must be positive, got {}",
                self.key_frame_spacing
            )));
        }
        if !(self.playback_step.is_finite() && self.playback_step > 0.0) {
            return Err(FlythroughError::InvalidOption(format!(
                "playback_step must be positive, got {}",
                self.playback_step
            )));
        }
        self.spline.validate()
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&text)?;
        options.validate()?;
        Ok(options)
    }

    /// Saves options to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

/// Kochanek-Bartels spline parameters.
///
/// All three default to zero, which yields Catmull-Rom tangents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplineOptions {
    /// Tension: 1 flattens tangents, -1 exaggerates them.
    pub tension: f64,
    /// Continuity: 0 keeps tangents continuous across a key.
    pub continuity: f64,
    /// Bias: weights the incoming (positive) or outgoing (negative) chord.
    pub bias: f64,
    /// Constraint at the first keyframe.
    pub left: EndConstraint,
    /// Constraint at the last keyframe.
    pub right: EndConstraint,
}

impl Default for SplineOptions {
    fn default() -> Self {
        Self {
            tension: 0.0,
            continuity: 0.0,
            bias: 0.0,
            left: EndConstraint::default(),
            right: EndConstraint::default(),
        }
    }
}

impl SplineOptions {
    /// Checks that the TCB parameters lie in `[-1, 1]`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tension", self.tension),
            ("continuity", self.continuity),
            ("bias", self.bias),
        ] {
            if !(-1.0..=1.0).contains(&value) {
                return Err(FlythroughError::InvalidOption(format!(
                    "{name} must lie in [-1, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Boundary condition applied at an end of the spline.
///
/// Values are expressed per segment, i.e. in the Hermite parameter of the
/// first or last interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EndConstraint {
    /// Fixed first derivative at the end point. Zero eases in/out.
    Derivative(f64),
    /// Fixed second derivative at the end point.
    SecondDerivative(f64),
}

impl Default for EndConstraint {
    fn default() -> Self {
        EndConstraint::Derivative(0.0)
    }
}
