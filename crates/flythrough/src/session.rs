//! The keyframe recording session behind the four fly-through actions.
//!
//! A session plays the role of a fly-through control panel without any UI:
//! record the live camera as a keyframe, remove all keyframes, create the
//! path, and fly (or stop). Each recorded keyframe also gets a camera node in
//! the session's [`Scene`] so hosts can list or display them.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::playback::{self, CancelToken, EventPump, PlaybackOutcome};
use crate::{
    storage, Camera, CameraPath, FlythroughError, LiveCamera, Options, PathPolyline, Result, Scene,
};

/// Label of the fly toggle while idle.
pub const FLY_LABEL: &str = "Fly!";
/// Label of the fly toggle while a playback is running.
pub const STOP_LABEL: &str = "Stop";

/// Shared handle for stopping a running fly-through and reading its state.
///
/// Clone it into the host's event callback; the session keeps the other end.
#[derive(Debug, Clone, Default)]
pub struct FlightControl {
    cancel: CancelToken,
    flying: Arc<AtomicBool>,
}

impl FlightControl {
    /// Returns whether a fly-through is running.
    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.flying.load(Ordering::SeqCst)
    }

    /// Stops the running fly-through before its next step.
    pub fn stop(&self) {
        if self.is_flying() {
            log::info!("fly-through stop requested");
        }
        self.cancel.cancel();
    }

    /// Returns the label the fly toggle should show.
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.is_flying() {
            STOP_LABEL
        } else {
            FLY_LABEL
        }
    }

    fn begin(&self) {
        self.cancel.reset();
        self.flying.store(true, Ordering::SeqCst);
    }

    fn end(&self) {
        self.flying.store(false, Ordering::SeqCst);
    }
}

/// A keyframe recording and playback session.
#[derive(Debug)]
pub struct Session {
    path: CameraPath,
    scene: Scene,
    key_frame_cameras: Vec<String>,
    options: Options,
    next_time: f64,
    fly_enabled: bool,
    control: FlightControl,
}

impl Session {
    /// Creates a session with default options.
    pub fn new() -> Self {
        Self::from_valid_options(Options::default())
    }

    /// Creates a session with the given options, rejecting invalid ones.
    pub fn with_options(options: Options) -> Result<Self> {
        options.validate()?;
        Ok(Self::from_valid_options(options))
    }

    fn from_valid_options(options: Options) -> Self {
        Self {
            path: CameraPath::with_spline_options(options.spline),
            scene: Scene::new(),
            key_frame_cameras: Vec::new(),
            options,
            next_time: 0.0,
            fly_enabled: false,
            control: FlightControl::default(),
        }
    }

    /// Returns the camera path.
    pub fn path(&self) -> &CameraPath {
        &self.path
    }

    /// Returns the scene holding the keyframe camera nodes.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the IDs of the keyframe camera nodes, in recording order.
    pub fn key_frame_cameras(&self) -> &[String] {
        &self.key_frame_cameras
    }

    /// Returns the session options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replaces the session options. Changing the spline parameters
    /// invalidates the path.
    pub fn set_options(&mut self, options: Options) -> Result<()> {
        options.validate()?;
        if options.spline != self.options.spline {
            self.path.set_spline_options(options.spline);
            self.fly_enabled = false;
        }
        self.options = options;
        Ok(())
    }

    /// Returns the time the next recorded keyframe will get.
    pub fn next_time(&self) -> f64 {
        self.next_time
    }

    /// Returns whether the fly action is available.
    pub fn is_fly_enabled(&self) -> bool {
        self.fly_enabled
    }

    /// Returns a handle for stopping playback from host callbacks.
    pub fn control(&self) -> FlightControl {
        self.control.clone()
    }

    /// Returns the label the fly toggle should show.
    pub fn fly_label(&self) -> &'static str {
        self.control.label()
    }

    /// Records the pose of `camera` as a keyframe at the current time and
    /// advances the time. Returns the recorded time.
    pub fn add_key_frame<C: LiveCamera + ?Sized>(&mut self, camera: &C) -> Result<f64> {
        let time = self.next_time;
        let pose = camera.pose();
        log::info!("adding keyframe at t = {time}");
        self.path
            .add_key_frame(time, pose.position, pose.focal_point, pose.view_up)?;

        let id = format!("Camera T = {time}");
        if self.scene.contains(&id) {
            self.scene.remove_camera(&id)?;
            self.key_frame_cameras.retain(|c| c != &id);
        }
        let mut node = Camera::new();
        node.set_pose(&pose);
        self.scene.add_camera_named(id.clone(), node)?;
        self.key_frame_cameras.push(id);

        self.next_time += self.options.key_frame_spacing;
        self.fly_enabled = false;
        Ok(time)
    }

    /// Removes every keyframe and its camera node, and resets the time.
    pub fn remove_key_frames(&mut self) {
        log::info!("removing {} keyframes", self.path.num_key_frames());
        self.path.remove_all_key_frames();
        for id in self.key_frame_cameras.drain(..) {
            if let Err(e) = self.scene.remove_camera(&id) {
                log::warn!("keyframe camera already gone: {e}");
            }
        }
        self.next_time = 0.0;
        self.fly_enabled = false;
    }

    /// Builds the path from the recorded keyframes and enables flying.
    pub fn create_path(&mut self) -> Result<()> {
        self.path.create_path()?;
        self.fly_enabled = true;
        Ok(())
    }

    /// Samples the built path for display.
    pub fn preview(&self) -> Result<PathPolyline> {
        PathPolyline::from_path(&self.path, self.options.preview_sample_rate)
    }

    /// Plays the path on `camera`, yielding to `pump` between steps.
    ///
    /// Use [`control`](Self::control) from inside the pump to stop early.
    pub fn fly<C, P>(&mut self, camera: &mut C, pump: &mut P) -> Result<PlaybackOutcome>
    where
        C: LiveCamera + ?Sized,
        P: EventPump + ?Sized,
    {
        if !self.fly_enabled {
            return Err(FlythroughError::FlyDisabled);
        }
        self.control.begin();
        let outcome = playback::fly(
            &self.path,
            camera,
            pump,
            &self.options,
            &self.control.cancel,
        );
        self.control.end();
        outcome
    }

    /// Stops a running fly-through.
    pub fn stop(&self) {
        self.control.stop();
    }

    /// Saves the keyframes to a `.kcsv` file.
    pub fn save(&self, file: impl AsRef<Path>) -> Result<()> {
        storage::save(file, &self.path)
    }

    /// Replaces the keyframes with those from a `.kcsv` file.
    ///
    /// Recording continues one spacing after the last loaded keyframe.
    pub fn load(&mut self, file: impl AsRef<Path>) -> Result<()> {
        let mut loaded = storage::load(file)?;
        loaded.set_spline_options(self.options.spline);

        self.remove_key_frames();
        for key in loaded.key_frames() {
            let id = format!("Camera T = {}", key.time);
            let mut node = Camera::new();
            node.set_pose(&key.pose);
            self.scene.add_camera_named(id.clone(), node)?;
            self.key_frame_cameras.push(id);
        }
        self.next_time = loaded
            .max_time()
            .map_or(0.0, |max| max + self.options.key_frame_spacing);
        self.path = loaded;
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
