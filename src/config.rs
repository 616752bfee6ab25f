//! Flexible-body parameter records and variant selection
//!
//! Parameters are split between structural fields (segment count, rest
//! length) that require a rebuild to change, and live fields (mass,
//! stiffness, damping) that propagate onto existing bodies in place.

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// The available flexible-body variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum BodyKind {
    Spring,
    Rope,
    Chain,
}

impl BodyKind {
    pub fn label(&self) -> &'static str {
        match self {
            BodyKind::Spring => "Spring",
            BodyKind::Rope => "Rope",
            BodyKind::Chain => "Chain",
        }
    }
}

/// Parameter record shared by every variant.
///
/// Distance-constraint variants (Rope, Chain) ignore `stiffness` and
/// `damping` operationally but keep the fields so the configuration surface
/// is uniform across variants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyParams {
    /// Number of mass points in the topology
    pub segment_count: usize,
    /// Total rest length of the body (meters)
    pub rest_length: f32,
    /// Radius of each mass point's collision shape
    pub point_radius: f32,
    /// Mass of each dynamic point (the anchor at index 0 is always fixed)
    pub mass: f32,
    /// Axial spring stiffness (Spring variant only)
    pub stiffness: f32,
    /// Spring damping coefficient (Spring variant only)
    pub damping: f32,
}

impl BodyParams {
    /// Defaults for the coil-spring variant.
    pub fn spring() -> Self {
        Self {
            segment_count: 12,
            rest_length: 2.0,
            point_radius: 0.1,
            mass: 0.2,
            stiffness: 150.0,
            damping: 2.0,
        }
    }

    /// Defaults for the rope variant.
    pub fn rope() -> Self {
        Self {
            segment_count: 20,
            rest_length: 3.0,
            point_radius: 0.05,
            mass: 0.1,
            stiffness: 0.0,
            damping: 0.0,
        }
    }

    /// Defaults for the chain variant. `point_radius` is the link size.
    pub fn chain() -> Self {
        Self {
            segment_count: 15,
            rest_length: 2.5,
            point_radius: 0.15,
            mass: 0.5,
            stiffness: 0.0,
            damping: 0.0,
        }
    }

    pub fn for_kind(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Spring => Self::spring(),
            BodyKind::Rope => Self::rope(),
            BodyKind::Chain => Self::chain(),
        }
    }

    /// Nominal distance between consecutive points.
    pub fn segment_length(&self) -> f32 {
        self.rest_length / self.segment_count as f32
    }

    /// Validate ranges before topology construction.
    pub fn validate(&self) -> Result<()> {
        if self.segment_count < 2 {
            return Err(SimError::invalid_parameter(
                "segment_count",
                format!("must be at least 2, got {}", self.segment_count),
            ));
        }
        if !(self.rest_length > 0.0) {
            return Err(SimError::invalid_parameter(
                "rest_length",
                format!("must be positive, got {}", self.rest_length),
            ));
        }
        if !(self.point_radius > 0.0) {
            return Err(SimError::invalid_parameter(
                "point_radius",
                format!("must be positive, got {}", self.point_radius),
            ));
        }
        if !(self.mass > 0.0) {
            return Err(SimError::invalid_parameter(
                "mass",
                format!("must be positive, got {}", self.mass),
            ));
        }
        if self.stiffness < 0.0 {
            return Err(SimError::invalid_parameter(
                "stiffness",
                format!("must be non-negative, got {}", self.stiffness),
            ));
        }
        if self.damping < 0.0 {
            return Err(SimError::invalid_parameter(
                "damping",
                format!("must be non-negative, got {}", self.damping),
            ));
        }
        Ok(())
    }

    /// Load a parameter record from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_yaml::from_str(&text)?;
        params.validate()?;
        Ok(params)
    }
}
