//! Camera path: ordered keyframes and the curves interpolating them.
//!
//! Keyframes are kept sorted by time with distinct times. The three channel
//! curves are only valid after [`CameraPath::create_path`] and are dropped by
//! every mutation, so a stale path can never be queried.

use glam::DVec3;

use crate::error::{FlythroughError, Result};
use crate::keyframe::{validate_time, Keyframe};
use crate::options::SplineOptions;
use crate::pose::CameraPose;
use crate::spline::KochanekSpline;

/// Lifecycle state of a [`CameraPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// No keyframes.
    Empty,
    /// Keyframes present, curves not built (or invalidated).
    HasKeyFrames,
    /// Curves built from the current keyframes.
    PathBuilt,
}

/// The three fitted channel curves.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCurves {
    /// Position channel.
    pub position: KochanekSpline,
    /// Focal point channel.
    pub focal_point: KochanekSpline,
    /// View-up channel.
    pub view_up: KochanekSpline,
}

impl PathCurves {
    fn fit(key_frames: &[Keyframe], options: &SplineOptions) -> Result<Self> {
        let channel = |pick: fn(&Keyframe) -> DVec3| -> Result<KochanekSpline> {
            let knots: Vec<(f64, DVec3)> = key_frames.iter().map(|k| (k.time, pick(k))).collect();
            KochanekSpline::fit(&knots, options)
        };
        Ok(Self {
            position: channel(Keyframe::position)?,
            focal_point: channel(Keyframe::focal_point)?,
            view_up: channel(Keyframe::view_up)?,
        })
    }

    /// Evaluates all three channels at `time`, clamped to the knot range.
    #[must_use]
    pub fn evaluate(&self, time: f64) -> CameraPose {
        CameraPose {
            position: self.position.evaluate(time),
            focal_point: self.focal_point.evaluate(time),
            view_up: self.view_up.evaluate(time),
        }
    }
}

/// A set of time-stamped camera keyframes and the path through them.
#[derive(Debug, Clone, Default)]
pub struct CameraPath {
    key_frames: Vec<Keyframe>,
    spline_options: SplineOptions,
    curves: Option<PathCurves>,
}

impl CameraPath {
    /// Creates an empty path with default spline parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty path fitted with the given spline parameters.
    #[must_use]
    pub fn with_spline_options(spline_options: SplineOptions) -> Self {
        Self {
            spline_options,
            ..Self::default()
        }
    }

    /// Returns the spline parameters used by [`create_path`](Self::create_path).
    #[must_use]
    pub fn spline_options(&self) -> &SplineOptions {
        &self.spline_options
    }

    /// Changes the spline parameters. Invalidates the built curves.
    pub fn set_spline_options(&mut self, spline_options: SplineOptions) {
        self.spline_options = spline_options;
        self.invalidate();
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PathState {
        match (&self.curves, self.key_frames.is_empty()) {
            (_, true) => PathState::Empty,
            (None, false) => PathState::HasKeyFrames,
            (Some(_), false) => PathState::PathBuilt,
        }
    }

    // ----------------------------------------------------------------------
    // Keyframe queries
    // ----------------------------------------------------------------------

    /// Returns the number of keyframes.
    #[must_use]
    pub fn num_key_frames(&self) -> usize {
        self.key_frames.len()
    }

    /// Returns true if there are no keyframes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_frames.is_empty()
    }

    /// Returns the keyframes in ascending time order.
    #[must_use]
    pub fn key_frames(&self) -> &[Keyframe] {
        &self.key_frames
    }

    /// Returns the keyframe at `index`.
    pub fn key_frame(&self, index: usize) -> Result<&Keyframe> {
        self.key_frames
            .get(index)
            .ok_or(FlythroughError::KeyFrameIndexOutOfRange {
                index,
                len: self.key_frames.len(),
            })
    }

    /// Returns the index of the keyframe stored at exactly `time`.
    #[must_use]
    pub fn key_frame_index_at(&self, time: f64) -> Option<usize> {
        self.search(time).ok()
    }

    /// Returns the keyframe stored at exactly `time`.
    #[must_use]
    pub fn key_frame_at(&self, time: f64) -> Option<&Keyframe> {
        self.key_frame_index_at(time).map(|i| &self.key_frames[i])
    }

    /// Returns the earliest keyframe time.
    #[must_use]
    pub fn min_time(&self) -> Option<f64> {
        self.key_frames.first().map(|k| k.time)
    }

    /// Returns the latest keyframe time.
    #[must_use]
    pub fn max_time(&self) -> Option<f64> {
        self.key_frames.last().map(|k| k.time)
    }

    /// Clamps `time` into the recorded range. Returns `time` unchanged when
    /// there are no keyframes.
    #[must_use]
    pub fn clamp_time(&self, time: f64) -> f64 {
        match (self.min_time(), self.max_time()) {
            (Some(min), Some(max)) if time.is_nan() => min.min(max),
            (Some(min), Some(max)) => time.clamp(min, max) + 0.0,
            _ => time,
        }
    }

    // ----------------------------------------------------------------------
    // Keyframe mutation
    // ----------------------------------------------------------------------

    /// Inserts a keyframe at `time`, replacing any keyframe already there.
    pub fn add_key_frame(
        &mut self,
        time: f64,
        position: DVec3,
        focal_point: DVec3,
        view_up: DVec3,
    ) -> Result<()> {
        self.add(Keyframe::new(time, position, focal_point, view_up))
    }

    /// Inserts `key_frame`, replacing any keyframe at the same time.
    pub fn add(&mut self, mut key_frame: Keyframe) -> Result<()> {
        key_frame.time = validate_time(key_frame.time)?;
        self.insert_sorted(key_frame);
        self.invalidate();
        Ok(())
    }

    /// Replaces every keyframe with `key_frames`, later entries winning on
    /// equal times. Nothing changes if any time is invalid.
    pub fn set_key_frames(&mut self, key_frames: impl IntoIterator<Item = Keyframe>) -> Result<()> {
        let key_frames = key_frames
            .into_iter()
            .map(|mut key_frame| {
                key_frame.time = validate_time(key_frame.time)?;
                Ok(key_frame)
            })
            .collect::<Result<Vec<_>>>()?;
        self.key_frames.clear();
        for key_frame in key_frames {
            self.insert_sorted(key_frame);
        }
        self.invalidate();
        Ok(())
    }

    /// Removes every keyframe. Idempotent.
    pub fn remove_all_key_frames(&mut self) {
        self.key_frames.clear();
        self.invalidate();
    }

    /// Removes and returns the keyframe at `index`.
    pub fn remove_key_frame(&mut self, index: usize) -> Result<Keyframe> {
        self.check_index(index)?;
        let removed = self.key_frames.remove(index);
        self.invalidate();
        Ok(removed)
    }

    /// Replaces the keyframe at `index`.
    ///
    /// The new keyframe is re-sorted by its time and replaces any other
    /// keyframe already stored at that time.
    pub fn set_key_frame(&mut self, index: usize, mut key_frame: Keyframe) -> Result<()> {
        self.check_index(index)?;
        key_frame.time = validate_time(key_frame.time)?;
        self.key_frames.remove(index);
        self.insert_sorted(key_frame);
        self.invalidate();
        Ok(())
    }

    /// Moves the keyframe at `index` to `time`.
    pub fn set_key_frame_time(&mut self, index: usize, time: f64) -> Result<()> {
        let pose = self.key_frame(index)?.pose;
        self.set_key_frame(index, Keyframe::from_pose(time, pose))
    }

    /// Sets the position of the keyframe at `index`.
    pub fn set_key_frame_position(&mut self, index: usize, position: DVec3) -> Result<()> {
        self.update_pose(index, |pose| pose.position = position)
    }

    /// Sets the focal point of the keyframe at `index`.
    pub fn set_key_frame_focal_point(&mut self, index: usize, focal_point: DVec3) -> Result<()> {
        self.update_pose(index, |pose| pose.focal_point = focal_point)
    }

    /// Sets the view-up of the keyframe at `index`.
    pub fn set_key_frame_view_up(&mut self, index: usize, view_up: DVec3) -> Result<()> {
        self.update_pose(index, |pose| pose.view_up = view_up)
    }

    // ----------------------------------------------------------------------
    // Path
    // ----------------------------------------------------------------------

    /// Builds the position, focal point and view-up curves from the current
    /// keyframes.
    pub fn create_path(&mut self) -> Result<()> {
        if self.key_frames.is_empty() {
            return Err(FlythroughError::InsufficientKeyFrames);
        }
        self.curves = Some(PathCurves::fit(&self.key_frames, &self.spline_options)?);
        log::info!(
            "camera path built from {} keyframes over [{}, {}]",
            self.key_frames.len(),
            self.key_frames[0].time,
            self.key_frames[self.key_frames.len() - 1].time,
        );
        Ok(())
    }

    /// Returns the built curves.
    pub fn curves(&self) -> Result<&PathCurves> {
        self.curves.as_ref().ok_or(FlythroughError::PathNotBuilt)
    }

    /// Evaluates the camera pose at `time`, clamped to the recorded range.
    ///
    /// The view-up is interpolated on its own and is generally neither unit
    /// length nor orthogonal to the view direction between keyframes; see
    /// [`CameraPose::orthogonalized`].
    pub fn camera_at(&self, time: f64) -> Result<CameraPose> {
        let curves = self.curves()?;
        let clamped = self.clamp_time(time);
        if clamped != time {
            log::debug!("camera path query at {time} clamped to {clamped}");
        }
        Ok(curves.evaluate(clamped))
    }

    /// Evaluates the position channel at `time`.
    pub fn position_at(&self, time: f64) -> Result<DVec3> {
        Ok(self.curves()?.position.evaluate(time))
    }

    /// Evaluates the focal point channel at `time`.
    pub fn focal_point_at(&self, time: f64) -> Result<DVec3> {
        Ok(self.curves()?.focal_point.evaluate(time))
    }

    /// Evaluates the view-up channel at `time`.
    pub fn view_up_at(&self, time: f64) -> Result<DVec3> {
        Ok(self.curves()?.view_up.evaluate(time))
    }

    /// Samples the built position curve at `sample_rate` samples per time
    /// unit.
    pub fn polyline(&self, sample_rate: u32) -> Result<Vec<DVec3>> {
        self.curves()?.position.sample(sample_rate)
    }

    // ----------------------------------------------------------------------
    // Internals
    // ----------------------------------------------------------------------

    /// `Ok` with the index of the keyframe equal to `time`, otherwise `Err`
    /// with its insertion point. `-0.0` matches `0.0`.
    fn search(&self, time: f64) -> std::result::Result<usize, usize> {
        let i = self.key_frames.partition_point(|k| k.time < time);
        match self.key_frames.get(i) {
            Some(k) if k.time == time => Ok(i),
            _ => Err(i),
        }
    }

    fn insert_sorted(&mut self, key_frame: Keyframe) {
        match self.search(key_frame.time) {
            Ok(i) => {
                log::warn!("replacing keyframe at t = {}", key_frame.time);
                self.key_frames[i] = key_frame;
            }
            Err(i) => self.key_frames.insert(i, key_frame),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        self.key_frame(index).map(|_| ())
    }

    fn update_pose(&mut self, index: usize, update: impl FnOnce(&mut CameraPose)) -> Result<()> {
        self.check_index(index)?;
        update(&mut self.key_frames[index].pose);
        self.invalidate();
        Ok(())
    }

    fn invalidate(&mut self) {
        self.curves = None;
    }
}
