//! Flexible-body variants and their shared contract

pub mod chain;
pub mod rope;
pub mod spring;

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion};
use rapier3d::prelude::{
    ColliderBuilder, ColliderHandle, RigidBodyBuilder, RigidBodyHandle, SharedShape,
};

use crate::config::{BodyKind, BodyParams};
use crate::error::Result;
use crate::physics::world::point_groups;
use crate::physics::PhysicsWorld;
use crate::visual::Visual;

pub use chain::Chain;
pub use rope::Rope;
pub use spring::Spring;

/// Uniform interface every flexible-object variant implements.
///
/// Construction plays the role of `build()` and is the only fallible
/// operation. Each variant owns the engine handles it created and removes
/// exactly those in `teardown`; the scene driver never clears engine state
/// globally.
pub trait FlexibleBody {
    fn kind(&self) -> BodyKind;

    /// Ordered mass points, index 0 being the fixed anchor. Read-only to
    /// collaborators (the interaction controller hit-tests against these).
    fn points(&self) -> &[RigidBodyHandle];

    fn params(&self) -> &BodyParams;

    fn params_mut(&mut self) -> &mut BodyParams;

    /// Current visual representation, consumed read-only by a renderer.
    fn visual(&self) -> &Visual;

    /// Copy body positions/orientations into the visual representation.
    /// Called once per simulation step; idempotent.
    fn sync_visual(&mut self, physics: &PhysicsWorld);

    /// Push mass (and, for the Spring variant, stiffness/damping) onto the
    /// existing bodies and forces in place. Never rebuilds topology.
    fn apply_parameters(&mut self, physics: &mut PhysicsWorld);

    /// Restore every point to its build-time pose with zero velocity,
    /// keeping all engine objects alive.
    fn reset(&mut self, physics: &mut PhysicsWorld);

    /// Apply per-step auxiliary forces. Only the Spring variant has any;
    /// the scene driver calls this immediately after each integration step.
    fn apply_forces(&mut self, _physics: &mut PhysicsWorld) {}

    /// Remove every body, collider and joint this variant created.
    fn teardown(&mut self, physics: &mut PhysicsWorld);
}

/// Build the variant selected by `kind` with its default parameters.
pub fn build_body(kind: BodyKind, physics: &mut PhysicsWorld) -> Result<Box<dyn FlexibleBody>> {
    build_body_with(kind, BodyParams::for_kind(kind), physics)
}

/// Build the variant selected by `kind` from an explicit parameter record,
/// so structural fields (segment count, rest length) shape the topology.
pub fn build_body_with(
    kind: BodyKind,
    params: BodyParams,
    physics: &mut PhysicsWorld,
) -> Result<Box<dyn FlexibleBody>> {
    match kind {
        BodyKind::Spring => Ok(Box::new(Spring::new(physics, params)?)),
        BodyKind::Rope => Ok(Box::new(Rope::new(physics, params)?)),
        BodyKind::Chain => Ok(Box::new(Chain::new(physics, params)?)),
    }
}

/// Handles and build-time poses of a straight run of mass points.
pub(crate) struct MassPoints {
    pub handles: Vec<RigidBodyHandle>,
    pub colliders: Vec<ColliderHandle>,
    pub initial_poses: Vec<Isometry3<f32>>,
}

/// Spawn `segment_count` points spaced `segment_length` apart along +Z from
/// `base`. Index 0 is a fixed anchor; the rest are dynamic. The configured
/// mass lives on the collider, which gives each body that exact mass plus
/// shape-based angular inertia so links can tumble.
pub(crate) fn spawn_mass_points(
    physics: &mut PhysicsWorld,
    params: &BodyParams,
    base: Point3<f32>,
    damping: (f32, f32),
    shape: SharedShape,
    orientation: impl Fn(usize) -> UnitQuaternion<f32>,
) -> MassPoints {
    let segment_length = params.segment_length();
    let mut handles = Vec::with_capacity(params.segment_count);
    let mut colliders = Vec::with_capacity(params.segment_count);
    let mut initial_poses = Vec::with_capacity(params.segment_count);

    for i in 0..params.segment_count {
        let translation = Translation3::new(base.x, base.y, base.z + i as f32 * segment_length);
        let pose = Isometry3::from_parts(translation, orientation(i));

        let builder = if i == 0 {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
                .linear_damping(damping.0)
                .angular_damping(damping.1)
        };
        let handle = physics.add_body(builder.position(pose).build());
        let mass = if i == 0 { 0.0 } else { params.mass };
        let collider = physics.add_collider(
            ColliderBuilder::new(shape.clone())
                .mass(mass)
                .collision_groups(point_groups())
                .build(),
            handle,
        );

        handles.push(handle);
        colliders.push(collider);
        initial_poses.push(pose);
    }

    MassPoints {
        handles,
        colliders,
        initial_poses,
    }
}

/// Restore build-time poses and zero all velocities and queued forces.
pub(crate) fn reset_points(
    physics: &mut PhysicsWorld,
    handles: &[RigidBodyHandle],
    initial_poses: &[Isometry3<f32>],
) {
    for (handle, pose) in handles.iter().zip(initial_poses.iter()) {
        if let Some(body) = physics.bodies.get_mut(*handle) {
            body.set_position(*pose, true);
            body.set_linvel(nalgebra::Vector3::zeros(), true);
            body.set_angvel(nalgebra::Vector3::zeros(), true);
            body.reset_forces(true);
        }
    }
}

/// Propagate a mass change onto the existing dynamic points. The mass is
/// carried by the colliders; the parent bodies are told to refresh their
/// mass properties immediately so reads between steps see the new value.
pub(crate) fn apply_point_mass(
    physics: &mut PhysicsWorld,
    handles: &[RigidBodyHandle],
    colliders: &[ColliderHandle],
    mass: f32,
) {
    for (handle, collider) in handles.iter().zip(colliders.iter()).skip(1) {
        if let Some(collider) = physics.colliders.get_mut(*collider) {
            collider.set_mass(mass);
        }
        if let Some(body) = physics.bodies.get_mut(*handle) {
            body.recompute_mass_properties_from_colliders(&physics.colliders);
        }
    }
}
