//! Scene registry for camera paths and keyframe cameras.
//!
//! Stands in for the host scene graph: nodes are owned here and looked up by
//! ID, and callers keep IDs rather than references.

use std::collections::HashMap;

use flythrough_core::{CameraPath, FlythroughError, Result};

use crate::camera::Camera;

/// Registry of scene nodes, keyed by unique ID.
#[derive(Debug, Default)]
pub struct Scene {
    paths: HashMap<String, CameraPath>,
    cameras: HashMap<String, Camera>,
    /// Last generated index per node class.
    counters: HashMap<&'static str, usize>,
}

impl Scene {
    /// Node class name used for generated camera path IDs.
    pub const PATH_CLASS: &'static str = "CameraPath";
    /// Node class name used for generated camera IDs.
    pub const CAMERA_CLASS: &'static str = "Camera";

    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a camera path under a generated ID and returns it.
    pub fn add_path(&mut self, path: CameraPath) -> String {
        let id = self.generate_id(Self::PATH_CLASS);
        self.paths.insert(id.clone(), path);
        id
    }

    /// Registers a camera path under an explicit ID.
    pub fn add_path_named(&mut self, id: impl Into<String>, path: CameraPath) -> Result<()> {
        let id = id.into();
        self.ensure_free(&id)?;
        self.paths.insert(id, path);
        Ok(())
    }

    /// Registers a camera under a generated ID and returns it.
    pub fn add_camera(&mut self, camera: Camera) -> String {
        let id = self.generate_id(Self::CAMERA_CLASS);
        self.cameras.insert(id.clone(), camera);
        id
    }

    /// Registers a camera under an explicit ID.
    pub fn add_camera_named(&mut self, id: impl Into<String>, camera: Camera) -> Result<()> {
        let id = id.into();
        self.ensure_free(&id)?;
        self.cameras.insert(id, camera);
        Ok(())
    }

    /// Gets a camera path by ID.
    pub fn path(&self, id: &str) -> Option<&CameraPath> {
        self.paths.get(id)
    }

    /// Gets a mutable camera path by ID.
    pub fn path_mut(&mut self, id: &str) -> Option<&mut CameraPath> {
        self.paths.get_mut(id)
    }

    /// Gets a camera by ID.
    pub fn camera(&self, id: &str) -> Option<&Camera> {
        self.cameras.get(id)
    }

    /// Gets a mutable camera by ID.
    pub fn camera_mut(&mut self, id: &str) -> Option<&mut Camera> {
        self.cameras.get_mut(id)
    }

    /// Checks if a node with the given ID exists.
    pub fn contains(&self, id: &str) -> bool {
        self.paths.contains_key(id) || self.cameras.contains_key(id)
    }

    /// Removes a camera path by ID.
    pub fn remove_path(&mut self, id: &str) -> Result<CameraPath> {
        self.paths
            .remove(id)
            .ok_or_else(|| FlythroughError::NodeNotFound(id.to_string()))
    }

    /// Removes a camera by ID.
    pub fn remove_camera(&mut self, id: &str) -> Result<Camera> {
        self.cameras
            .remove(id)
            .ok_or_else(|| FlythroughError::NodeNotFound(id.to_string()))
    }

    /// Returns the IDs of all registered cameras.
    pub fn camera_ids(&self) -> impl Iterator<Item = &str> {
        self.cameras.keys().map(String::as_str)
    }

    /// Returns the IDs of all registered camera paths.
    pub fn path_ids(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    /// Returns the total number of registered nodes.
    pub fn len(&self) -> usize {
        self.paths.len() + self.cameras.len()
    }

    /// Returns true if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.cameras.is_empty()
    }

    /// Removes all nodes. Generated IDs keep counting up.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.cameras.clear();
    }

    fn ensure_free(&self, id: &str) -> Result<()> {
        if self.contains(id) {
            return Err(FlythroughError::NodeExists(id.to_string()));
        }
        Ok(())
    }

    fn generate_id(&mut self, class: &'static str) -> String {
        loop {
            let counter = self.counters.entry(class).or_insert(0);
            *counter += 1;
            let id = format!("{class}{counter}");
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids() {
        let mut scene = Scene::new();
        assert_eq!(scene.add_path(CameraPath::new()), "CameraPath1");
        assert_eq!(scene.add_camera(Camera::new()), "Camera1");
        assert_eq!(scene.add_camera(Camera::new()), "Camera2");
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_generated_id_skips_named_node() {
        let mut scene = Scene::new();
        scene.add_camera_named("Camera1", Camera::new()).unwrap();
        assert_eq!(scene.add_camera(Camera::new()), "Camera2");
    }

    #[test]
    fn test_duplicate_named_node() {
        let mut scene = Scene::new();
        scene.add_camera_named("Camera T = 0", Camera::new()).unwrap();
        assert!(matches!(
            scene.add_path_named("Camera T = 0", CameraPath::new()),
            Err(FlythroughError::NodeExists(_))
        ));
    }

    #[test]
    fn test_remove_nodes() {
        let mut scene = Scene::new();
        let path_id = scene.add_path(CameraPath::new());
        let camera_id = scene.add_camera(Camera::new());

        scene.remove_camera(&camera_id).unwrap();
        assert!(scene.camera(&camera_id).is_none());
        assert!(matches!(
            scene.remove_camera(&camera_id),
            Err(FlythroughError::NodeNotFound(_))
        ));

        scene.remove_path(&path_id).unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_path_mut() {
        let mut scene = Scene::new();
        let id = scene.add_path(CameraPath::new());
        scene
            .path_mut(&id)
            .unwrap()
            .add_key_frame(0.0, glam::DVec3::ZERO, glam::DVec3::X, glam::DVec3::Y)
            .unwrap();
        assert_eq!(scene.path(&id).unwrap().num_key_frames(), 1);
    }

    #[test]
    fn test_clear() {
        let mut scene = Scene::new();
        scene.add_camera(Camera::new());
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.add_camera(Camera::new()), "Camera2");
    }
}
