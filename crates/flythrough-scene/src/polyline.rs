//! Sampled preview of a camera path as a curve network.

use flythrough_core::{CameraPath, FlythroughError, Result};
use glam::DVec3;

/// The position curve of a built path, sampled into nodes connected by edges.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPolyline {
    nodes: Vec<DVec3>,
    edges: Vec<[u32; 2]>,
}

impl PathPolyline {
    /// Creates a polyline through `nodes`, connecting consecutive nodes.
    ///
    /// Node indices are `u32`; more nodes than that is an error.
    pub fn new(nodes: Vec<DVec3>) -> Result<Self> {
        let count = u32::try_from(nodes.len()).map_err(|_| {
            FlythroughError::InvalidOption(format!("{} nodes exceed u32 indices", nodes.len()))
        })?;
        let edges = (1..count).map(|i| [i - 1, i]).collect();
        Ok(Self { nodes, edges })
    }

    /// Samples the built position curve of `path` at `sample_rate` samples
    /// per time unit.
    pub fn from_path(path: &CameraPath, sample_rate: u32) -> Result<Self> {
        Self::new(path.polyline(sample_rate)?)
    }

    /// Returns the sampled node positions.
    pub fn nodes(&self) -> &[DVec3] {
        &self.nodes
    }

    /// Returns the edges as node index pairs.
    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the total length along the edges.
    pub fn length(&self) -> f64 {
        self.edges
            .iter()
            .map(|[a, b]| self.nodes[*a as usize].distance(self.nodes[*b as usize]))
            .sum()
    }

    /// Returns the axis-aligned bounding box of the nodes.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.nodes.first()?;
        Some(
            self.nodes
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}
