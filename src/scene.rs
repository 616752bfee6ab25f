//! Scene driver: owns the physics world, floor, camera and active body
//!
//! The step function is the ordering contract for the whole subsystem:
//! integrate, apply auxiliary forces, sync visuals. Nothing else is allowed
//! to own that sequence.

use nalgebra::Point2;
use rapier3d::prelude::{ColliderBuilder, RigidBodyBuilder, RigidBodyHandle, Vector};
use tracing::info;

use crate::body::{self, FlexibleBody};
use crate::camera::Camera;
use crate::config::{BodyKind, BodyParams};
use crate::error::Result;
use crate::interaction::InteractionController;
use crate::physics::world::floor_groups;
use crate::physics::PhysicsWorld;

/// One simulation scene with exactly one active flexible body at a time.
pub struct Scene {
    pub physics: PhysicsWorld,
    pub camera: Camera,
    pub interaction: InteractionController,
    active: Box<dyn FlexibleBody>,
    #[allow(dead_code)]
    floor: RigidBodyHandle,
}

impl Scene {
    /// Build a scene with a static floor and the selected variant at its
    /// default parameters.
    pub fn new(kind: BodyKind) -> Result<Self> {
        Self::with_params(kind, BodyParams::for_kind(kind))
    }

    /// Build a scene from an explicit parameter record. Structural fields
    /// (segment count, rest length) shape the topology at construction;
    /// they cannot be changed afterwards without a rebuild.
    pub fn with_params(kind: BodyKind, params: BodyParams) -> Result<Self> {
        let mut physics = PhysicsWorld::new();

        let floor = physics.add_body(RigidBodyBuilder::fixed().build());
        physics.add_collider(
            ColliderBuilder::halfspace(Vector::y_axis())
                .collision_groups(floor_groups())
                .build(),
            floor,
        );

        let active = body::build_body_with(kind, params, &mut physics)?;
        info!(kind = kind.label(), "scene ready");

        Ok(Self {
            physics,
            camera: Camera::default(),
            interaction: InteractionController::new(),
            active,
            floor,
        })
    }

    /// Advance by one fixed timestep.
    ///
    /// The order is load-bearing: auxiliary forces (the Spring variant's
    /// force generators) run right after integration and before the visual
    /// sync. Skipping the middle call leaves spring points in free fall.
    pub fn advance(&mut self) {
        self.physics.step();
        self.active.apply_forces(&mut self.physics);
        self.active.sync_visual(&self.physics);
    }

    pub fn active(&self) -> &dyn FlexibleBody {
        self.active.as_ref()
    }

    /// Mutable access to the active body's parameter record. Call
    /// `apply_parameters` afterwards to propagate live fields.
    pub fn params_mut(&mut self) -> &mut BodyParams {
        self.active.params_mut()
    }

    pub fn apply_parameters(&mut self) {
        self.active.apply_parameters(&mut self.physics);
    }

    /// Restore the active body to its build-time state.
    pub fn reset(&mut self) {
        self.active.reset(&mut self.physics);
    }

    /// Replace the active body with a freshly built variant.
    ///
    /// Any drag in progress is forced to IDLE first so no constraint can
    /// outlive the body it references. The replacement is built before the
    /// outgoing body removes its handles; a build error leaves the current
    /// body intact.
    pub fn switch_body(&mut self, kind: BodyKind) -> Result<()> {
        self.interaction.release(&mut self.physics);
        let next = body::build_body(kind, &mut self.physics)?;
        self.active.teardown(&mut self.physics);
        self.active = next;
        info!(kind = kind.label(), "switched active body");
        Ok(())
    }

    pub fn pointer_down(&mut self, ndc: Point2<f32>) {
        self.interaction
            .pointer_down(ndc, &self.camera, &mut self.physics, self.active.as_ref());
    }

    pub fn pointer_move(&mut self, ndc: Point2<f32>) {
        self.interaction
            .pointer_move(ndc, &self.camera, &mut self.physics);
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up(&mut self.physics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_builds_floor_and_body() {
        let scene = Scene::new(BodyKind::Rope).unwrap();
        // 20 rope points plus the floor.
        assert_eq!(scene.physics.body_count(), 21);
        assert_eq!(scene.physics.joint_count(), 19);
    }

    #[test]
    fn test_switch_swaps_topology() {
        let mut scene = Scene::new(BodyKind::Rope).unwrap();
        scene.switch_body(BodyKind::Chain).unwrap();

        assert_eq!(scene.active().kind(), BodyKind::Chain);
        // 15 chain links plus the floor; no rope leftovers.
        assert_eq!(scene.physics.body_count(), 16);
        assert_eq!(scene.physics.joint_count(), 14);
    }

    #[test]
    fn test_custom_params_shape_topology() {
        let params = BodyParams {
            segment_count: 30,
            ..BodyParams::rope()
        };
        let scene = Scene::with_params(BodyKind::Rope, params).unwrap();

        assert_eq!(scene.active().points().len(), 30);
        assert_eq!(scene.active().params().segment_count, 30);
        assert_eq!(scene.physics.joint_count(), 29);
    }

    #[test]
    fn test_advance_runs_clean() {
        let mut scene = Scene::new(BodyKind::Spring).unwrap();
        for _ in 0..10 {
            scene.advance();
        }
        // The anchor stays put.
        let anchor = scene.active().points()[0];
        assert!(scene.physics.bodies[anchor].is_fixed());
    }
}
