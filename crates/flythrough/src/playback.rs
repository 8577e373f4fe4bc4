//! Fly-through playback.
//!
//! Playback is cooperative: each step evaluates the path, drives the live
//! camera, hands control back to the host through an [`EventPump`] and
//! sleeps. Cancellation is checked once per step, and steps only read the
//! path, so stopping early never leaves anything half-updated.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::{CameraPath, CameraPose, FlythroughError, LiveCamera, Options, PathCurves, Result};

/// Gives the host event loop a chance to run between playback steps.
pub trait EventPump {
    /// Processes pending host events.
    fn process_events(&mut self);
}

impl<F: FnMut()> EventPump for F {
    fn process_events(&mut self) {
        self();
    }
}

/// An event pump that does nothing, for headless playback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl EventPump for NoEvents {
    fn process_events(&mut self) {}
}

/// Cloneable cancellation flag checked between playback steps.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears a previous cancellation request.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackOutcome {
    /// Every step was played.
    Completed {
        /// Number of steps applied to the camera.
        steps: usize,
    },
    /// Stopped before the step at `at`.
    Cancelled {
        /// Time of the first step that was not played.
        at: f64,
        /// Number of steps applied before stopping.
        steps: usize,
    },
}

/// Iterator over `(time, pose)` for every playback step of a built path.
///
/// Steps run from the first to the last keyframe time in `step` increments;
/// the last keyframe time is always included.
#[derive(Debug, Clone)]
pub struct PathSampler<'a> {
    curves: &'a PathCurves,
    start: f64,
    end: f64,
    step: f64,
    index: usize,
    count: usize,
    done: bool,
}

impl<'a> PathSampler<'a> {
    /// Creates a sampler over a built path.
    pub fn new(path: &'a CameraPath, step: f64) -> Result<Self> {
        let curves = path.curves()?;
        if !(step.is_finite() && step > 0.0) {
            return Err(FlythroughError::InvalidOption(format!(
                "playback step must be positive, got {step}"
            )));
        }
        let (start, end) = curves.position.parametric_range();
        let count = ((end - start) / step).floor() as usize;
        Ok(Self {
            curves,
            start,
            end,
            step,
            index: 0,
            count,
            done: false,
        })
    }

    fn time_at(&self, index: usize) -> Option<f64> {
        if index <= self.count {
            Some(self.start + index as f64 * self.step)
        } else if index - 1 == self.count && self.start + self.count as f64 * self.step < self.end {
            Some(self.end)
        } else {
            None
        }
    }
}

impl Iterator for PathSampler<'_> {
    type Item = (f64, CameraPose);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(time) = self.time_at(self.index) else {
            self.done = true;
            return None;
        };
        self.index += 1;
        Some((time, self.curves.evaluate(time)))
    }
}

/// Plays the built `path` on `camera`.
///
/// Each step applies the interpolated pose (with the view-up
/// re-orthogonalized when `options.orthogonalize_view_up` is set), resets
/// the clipping range, pumps host events and waits `options.step_delay_ms`.
pub fn fly<C, P>(
    path: &CameraPath,
    camera: &mut C,
    pump: &mut P,
    options: &Options,
    cancel: &CancelToken,
) -> Result<PlaybackOutcome>
where
    C: LiveCamera + ?Sized,
    P: EventPump + ?Sized,
{
    let sampler = PathSampler::new(path, options.playback_step)?;
    let delay = Duration::from_millis(options.step_delay_ms);
    log::info!(
        "fly-through started over [{}, {}]",
        sampler.start,
        sampler.end
    );

    let mut steps = 0;
    for (time, pose) in sampler {
        if cancel.is_cancelled() {
            log::info!("fly-through stopped at t = {time} after {steps} steps");
            return Ok(PlaybackOutcome::Cancelled { at: time, steps });
        }

        let pose = if options.orthogonalize_view_up {
            pose.orthogonalized()
        } else {
            pose
        };
        camera.set_pose(&pose);
        camera.reset_clipping_range();
        steps += 1;
        log::debug!("fly-through step t = {time}");

        pump.process_events();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    log::info!("fly-through finished after {steps} steps");
    Ok(PlaybackOutcome::Completed { steps })
}
