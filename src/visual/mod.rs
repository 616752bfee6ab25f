//! Renderer-agnostic visual representations
//!
//! Each flexible body exposes either one rigid element per mass point or a
//! single continuous tube surface regenerated from a spline through the
//! point positions. A renderer consumes this data read-only every frame.

pub mod spline;
pub mod tube;

use nalgebra::Isometry3;

pub use spline::CatmullRom;
pub use tube::TubeMesh;

/// Tubular segment count matching the original tube geometry.
pub const TUBE_SEGMENTS: usize = 64;
/// Radial vertex count per ring.
pub const TUBE_RADIAL_SEGMENTS: usize = 8;

/// Visual state of a flexible body, refreshed once per simulation step.
#[derive(Debug, Clone)]
pub enum Visual {
    /// One discrete element per mass point (chain links).
    Links(Vec<Isometry3<f32>>),
    /// A continuous tube surface through all point positions.
    Tube(TubeMesh),
}

impl Visual {
    pub fn link_poses(&self) -> Option<&[Isometry3<f32>]> {
        match self {
            Visual::Links(poses) => Some(poses),
            Visual::Tube(_) => None,
        }
    }

    pub fn tube(&self) -> Option<&TubeMesh> {
        match self {
            Visual::Links(_) => None,
            Visual::Tube(mesh) => Some(mesh),
        }
    }
}
