//! RON block files: the closed regions to export.
//!
//! ```ron
//! (
//!     blocks: [
//!         (vertices: [(0.5, 0.7, 0.5), (0.5, 0.7, -0.5), (-0.5, 0.7, -0.5)]),
//!     ],
//! )
//! ```
//!
//! Vertices are listed clockwise as seen from outside the sphere and need not
//! be normalised. `normals[i]`, when present, is the axis of the circle
//! joining vertex `i` to vertex `i + 1`; edges without one are great circles.

use std::path::Path;

use arcsphere_geometry::{ArcId, ArcLoop};
use glam::Vec3;
use serde::Deserialize;

use crate::error::AppError;

/// One closed region.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Block {
    pub vertices: Vec<[f32; 3]>,
    #[serde(default)]
    pub normals: Vec<[f32; 3]>,
}

/// Every region of one input file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BlockFile {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl BlockFile {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path).map_err(|source| AppError::ReadBlocks {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| AppError::ParseBlocks {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build one loop per block in a shared arena. Returns the arena and
    /// the first edge of every loop.
    pub fn build_loops(&self) -> Result<(ArcLoop, Vec<ArcId>), AppError> {
        let mut arcs = ArcLoop::new();
        let mut starts = Vec::with_capacity(self.blocks.len());
        for (index, block) in self.blocks.iter().enumerate() {
            let vertices: Vec<Vec3> = block.vertices.iter().copied().map(Vec3::from).collect();
            let normals: Vec<Vec3> = block.normals.iter().copied().map(Vec3::from).collect();
            let start = arcs
                .push_polygon_with_normals(&vertices, &normals)
                .ok_or(AppError::DegenerateBlock {
                    index,
                    vertices: vertices.len(),
                })?;
            starts.push(start);
        }
        tracing::debug!(blocks = starts.len(), arcs = arcs.len(), "built block loops");
        Ok((arcs, starts))
    }
}
