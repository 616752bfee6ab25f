//! Perspective camera for pointer-to-world ray conversion
//!
//! The renderer owns its own camera; this one only has to agree with it on
//! the projection so that normalized device coordinates map to the same
//! world-space rays.

use nalgebra::{Isometry3, Perspective3, Point2, Point3, Vector3};
use rapier3d::prelude::Ray;

/// A pinhole camera described by eye/target/up and a vertical field of view.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(4.0, 4.0, 4.0),
            target: Point3::new(0.0, 0.5, 0.0),
            up: Vector3::y(),
            fov_y: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Camera {
    /// Normalize raw screen coordinates to device coordinates in [-1, 1],
    /// with +y up.
    pub fn ndc_from_screen(x: f32, y: f32, width: f32, height: f32) -> Point2<f32> {
        Point2::new(2.0 * x / width - 1.0, 1.0 - 2.0 * y / height)
    }

    fn view(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.eye, &self.target, &self.up)
    }

    fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect, self.fov_y, self.znear, self.zfar)
    }

    /// Unit vector from the eye toward the look target.
    pub fn view_direction(&self) -> Vector3<f32> {
        (self.target - self.eye).normalize()
    }

    /// World-space ray through the given normalized device coordinates.
    pub fn ndc_ray(&self, ndc: Point2<f32>) -> Ray {
        let near_view = self
            .projection()
            .unproject_point(&Point3::new(ndc.x, ndc.y, -1.0));
        let near_world = self.view().inverse_transform_point(&near_view);
        Ray::new(self.eye, (near_world - self.eye).normalize())
    }

    /// Project a world point to normalized device coordinates. Returns
    /// `None` for points at or behind the eye plane.
    pub fn project(&self, point: &Point3<f32>) -> Option<Point2<f32>> {
        let view_point = self.view().transform_point(point);
        if view_point.z >= -self.znear {
            return None;
        }
        let ndc = self.projection().project_point(&view_point);
        Some(Point2::new(ndc.x, ndc.y))
    }
}
