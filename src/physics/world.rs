//! Fixed-step physics world wrapping the rapier3d pipeline
//!
//! One `PhysicsWorld` instance owns every rapier set. All body/joint
//! mutation happens through it, either during topology construction and
//! teardown or during drag-session transitions; nothing mutates the sets
//! while `step()` runs.

use std::num::NonZeroUsize;

use nalgebra::{Point3, Vector3};
use rapier3d::prelude::*;

/// Fixed simulation timestep. The simulation is deterministic per tick
/// count regardless of frame pacing.
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Gravity matching the original scene.
pub const GRAVITY: f32 = -9.82;

/// The default of 4 leaves visible drift in the coupled distance limits
/// under a hanging body's load; 8 holds them within a percent.
const SOLVER_ITERATIONS: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(n) => n,
    None => unreachable!(),
};

/// Collision-group memberships: the floor collides with everything, mass
/// points only with the floor. Points of a flexible body never collide with
/// each other; their coupling is entirely joints/springs.
pub fn floor_groups() -> InteractionGroups {
    InteractionGroups::new(Group::GROUP_1, Group::ALL)
}

pub fn point_groups() -> InteractionGroups {
    InteractionGroups::new(Group::GROUP_2, Group::GROUP_1)
}

pub struct PhysicsWorld {
    pub gravity: Vector3<f32>,
    pub integration_parameters: IntegrationParameters,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    pipeline: PhysicsPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: FIXED_DT,
            num_solver_iterations: SOLVER_ITERATIONS,
            ..Default::default()
        };

        Self {
            gravity: Vector3::new(0.0, GRAVITY, 0.0),
            integration_parameters,
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            pipeline: PhysicsPipeline::new(),
        }
    }

    /// Advance the simulation by exactly one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    pub fn add_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.bodies.insert(body)
    }

    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent: RigidBodyHandle,
    ) -> ColliderHandle {
        self.colliders
            .insert_with_parent(collider, parent, &mut self.bodies)
    }

    /// Remove a body together with its colliders and any attached joints.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn add_joint(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        joint: GenericJoint,
    ) -> ImpulseJointHandle {
        self.impulse_joints.insert(body1, body2, joint, true)
    }

    pub fn remove_joint(&mut self, handle: ImpulseJointHandle) {
        self.impulse_joints.remove(handle, true);
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Cast a world-space ray against the collider set. Returns the hit
    /// collider and the world-space hit point.
    pub fn cast_ray(
        &mut self,
        ray: &Ray,
        max_toi: f32,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, Point3<f32>)> {
        self.query_pipeline.update(&self.colliders);
        self.query_pipeline
            .cast_ray(&self.bodies, &self.colliders, ray, max_toi, true, filter)
            .map(|(handle, toi)| (handle, ray.point_at(toi)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_free_body_falls_under_gravity() {
        let mut world = PhysicsWorld::new();
        let body = world.add_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector3::new(0.0, 5.0, 0.0))
                .build(),
        );
        world.add_collider(
            ColliderBuilder::ball(0.1)
                .mass(1.0)
                .collision_groups(point_groups())
                .build(),
            body,
        );

        world.step();

        let vel = world.bodies[body].linvel();
        assert_relative_eq!(vel.y, GRAVITY * FIXED_DT, epsilon = 1e-4);
    }

    #[test]
    fn test_collider_mass_reaches_the_body() {
        let mut world = PhysicsWorld::new();
        let body = world.add_body(RigidBodyBuilder::dynamic().build());
        world.add_collider(
            ColliderBuilder::ball(0.1)
                .mass(0.2)
                .collision_groups(point_groups())
                .build(),
            body,
        );

        assert_relative_eq!(world.bodies[body].mass(), 0.2, max_relative = 1e-5);
    }

    #[test]
    fn test_remove_body_drops_attached_joint() {
        let mut world = PhysicsWorld::new();
        let a = world.add_body(RigidBodyBuilder::fixed().build());
        let b = world.add_body(
            RigidBodyBuilder::dynamic()
                .translation(Vector3::new(0.0, 0.0, 1.0))
                .build(),
        );
        world.add_collider(ColliderBuilder::ball(0.1).mass(1.0).build(), b);
        world.add_joint(a, b, crate::physics::joints::distance_joint(1.0));
        assert_eq!(world.joint_count(), 1);

        world.remove_body(b);
        assert_eq!(world.joint_count(), 0);
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_ray_cast_hits_ball() {
        let mut world = PhysicsWorld::new();
        let body = world.add_body(
            RigidBodyBuilder::fixed()
                .translation(Vector3::new(0.0, 1.0, 0.0))
                .build(),
        );
        world.add_collider(ColliderBuilder::ball(0.5).build(), body);

        let ray = Ray::new(Point3::new(0.0, 1.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = world.cast_ray(&ray, 100.0, QueryFilter::default());
        let (_, point) = hit.expect("ray should hit the ball");
        assert_relative_eq!(point.z, 0.5, epsilon = 1e-3);
    }
}
