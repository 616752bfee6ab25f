//! Explicitly-applied spring force generator
//!
//! A `SpringForce` is not an engine constraint: the solver never sees it.
//! It must be applied after every integration step or the points it couples
//! are simply in free fall. The scene driver owns that ordering.

use nalgebra::{Point3, Vector3};
use rapier3d::prelude::{RigidBodyHandle, RigidBodySet};

/// Hooke spring with velocity damping between two local anchor points.
#[derive(Debug, Clone, Copy)]
pub struct SpringForce {
    pub body_a: RigidBodyHandle,
    pub body_b: RigidBodyHandle,
    pub local_anchor_a: Point3<f32>,
    pub local_anchor_b: Point3<f32>,
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
    /// Multiplier kept so parameter updates preserve the relative strength
    /// of bending springs (built at half stiffness).
    pub stiffness_scale: f32,
}

impl SpringForce {
    pub fn new(
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        local_anchor_a: Point3<f32>,
        local_anchor_b: Point3<f32>,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        Self {
            body_a,
            body_b,
            local_anchor_a,
            local_anchor_b,
            rest_length,
            stiffness,
            damping,
            stiffness_scale: 1.0,
        }
    }

    pub fn with_stiffness_scale(mut self, scale: f32) -> Self {
        self.stiffness_scale = scale;
        self.stiffness *= scale;
        self
    }

    /// Compute and apply equal-and-opposite forces at the world anchors.
    ///
    /// Forces accumulate on the bodies and feed the next integration step;
    /// the caller resets accumulated forces once per application pass.
    pub fn apply(&self, bodies: &mut RigidBodySet) {
        let (Some(rb_a), Some(rb_b)) = (bodies.get(self.body_a), bodies.get(self.body_b)) else {
            return;
        };

        let world_a = rb_a.position() * self.local_anchor_a;
        let world_b = rb_b.position() * self.local_anchor_b;

        let delta: Vector3<f32> = world_b - world_a;
        let distance = delta.norm();
        if distance < 1e-6 {
            return;
        }
        let direction = delta / distance;

        // Hooke term plus damping along the spring axis.
        let relative_velocity = rb_b.velocity_at_point(&world_b) - rb_a.velocity_at_point(&world_a);
        let magnitude = self.stiffness * (distance - self.rest_length)
            + self.damping * relative_velocity.dot(&direction);
        let force = direction * magnitude;

        if let Some(rb_a) = bodies.get_mut(self.body_a) {
            rb_a.add_force_at_point(force, world_a, true);
        }
        if let Some(rb_b) = bodies.get_mut(self.body_b) {
            rb_b.add_force_at_point(-force, world_b, true);
        }
    }
}
