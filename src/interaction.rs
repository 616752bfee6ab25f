//! Pointer interaction: hit-testing and drag-constraint lifecycle
//!
//! Two states, IDLE and DRAGGING, with at most one drag session alive.
//! This is the only subsystem that mutates engine state outside the
//! step/build paths, and it runs synchronously between ticks; it must be
//! released before any topology rebuild.

use nalgebra::{Point2, Point3, Vector3};
use rapier3d::prelude::{
    Collider, ColliderHandle, ImpulseJointHandle, QueryFilter, Ray, RigidBodyBuilder,
    RigidBodyHandle,
};
use tracing::debug;

use crate::body::FlexibleBody;
use crate::camera::Camera;
use crate::physics::{joints, PhysicsWorld};

/// Plane through the grab point, facing the camera. Dragging moves the
/// target across this plane so pointer motion stays screen-parallel
/// regardless of object depth.
#[derive(Debug, Clone, Copy)]
pub struct DragPlane {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl DragPlane {
    /// Ray/plane intersection. `None` when the ray is parallel to the
    /// plane or points away from it; callers skip the update in that case.
    pub fn intersect(&self, ray: &Ray) -> Option<Point3<f32>> {
        let denom = ray.dir.dot(&self.normal);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.point - ray.origin).dot(&self.normal) / denom;
        (t >= 0.0).then(|| ray.point_at(t))
    }
}

struct DragSession {
    /// The dragged mass point.
    target: RigidBodyHandle,
    /// Kinematic stand-in for the pointer in world space.
    pointer_body: RigidBodyHandle,
    joint: ImpulseJointHandle,
    plane: DragPlane,
    target_point: Point3<f32>,
}

enum DragState {
    Idle,
    Dragging(DragSession),
}

/// Converts pointer positions into a world-space drag on the nearest
/// simulated point of the active flexible body.
pub struct InteractionController {
    state: DragState,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// World-space point the drag is currently pulling toward.
    pub fn drag_target(&self) -> Option<Point3<f32>> {
        match &self.state {
            DragState::Dragging(session) => Some(session.target_point),
            DragState::Idle => None,
        }
    }

    /// The mass point currently being dragged.
    pub fn dragged_point(&self) -> Option<RigidBodyHandle> {
        match &self.state {
            DragState::Dragging(session) => Some(session.target),
            DragState::Idle => None,
        }
    }

    /// Attempt to start a drag at the given normalized device coordinates.
    ///
    /// Stays IDLE when the ray misses the body or the nearest point is the
    /// fixed anchor; neither is an error.
    pub fn pointer_down(
        &mut self,
        ndc: Point2<f32>,
        camera: &Camera,
        physics: &mut PhysicsWorld,
        active: &dyn FlexibleBody,
    ) {
        if self.is_dragging() {
            return;
        }

        let ray = camera.ndc_ray(ndc);
        let points = active.points();
        let hit_filter = |_: ColliderHandle, collider: &Collider| {
            collider
                .parent()
                .is_some_and(|parent| points.contains(&parent))
        };
        let filter = QueryFilter::default().predicate(&hit_filter);

        let Some((_, hit_point)) = physics.cast_ray(&ray, camera.zfar, filter) else {
            return;
        };

        // Linear scan for the nearest point; first encountered wins ties.
        let mut nearest: Option<(RigidBodyHandle, f32)> = None;
        for handle in points {
            let Some(body) = physics.bodies.get(*handle) else {
                continue;
            };
            let distance = (Point3::from(*body.translation()) - hit_point).norm();
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((*handle, distance));
            }
        }
        let Some((target, _)) = nearest else {
            return;
        };

        if physics.bodies[target].is_fixed() {
            debug!("drag refused: nearest point is the fixed anchor");
            return;
        }

        // Kinematic anchor body standing in for the pointer, pinned to the
        // dragged point's local origin.
        let pointer_body = physics.add_body(
            RigidBodyBuilder::kinematic_position_based()
                .translation(hit_point.coords)
                .build(),
        );
        let joint = physics.add_joint(target, pointer_body, joints::drag_joint());

        let plane = DragPlane {
            point: hit_point,
            normal: camera.view_direction(),
        };

        debug!(?hit_point, "drag started");
        self.state = DragState::Dragging(DragSession {
            target,
            pointer_body,
            joint,
            plane,
            target_point: hit_point,
        });
    }

    /// Update the drag target from new pointer coordinates. A ray parallel
    /// to the drag plane leaves the previous target in place.
    pub fn pointer_move(&mut self, ndc: Point2<f32>, camera: &Camera, physics: &mut PhysicsWorld) {
        let DragState::Dragging(session) = &mut self.state else {
            return;
        };

        let ray = camera.ndc_ray(ndc);
        let Some(point) = session.plane.intersect(&ray) else {
            return;
        };

        session.target_point = point;
        if let Some(body) = physics.bodies.get_mut(session.pointer_body) {
            body.set_next_kinematic_translation(point.coords);
        }
    }

    /// End the drag. Idempotent; releasing while IDLE is a no-op.
    pub fn pointer_up(&mut self, physics: &mut PhysicsWorld) {
        self.release(physics);
    }

    /// Tear down any active drag session, removing the constraint and the
    /// pointer anchor body. Also invoked when the active body is switched.
    pub fn release(&mut self, physics: &mut PhysicsWorld) {
        if let DragState::Dragging(session) = std::mem::replace(&mut self.state, DragState::Idle) {
            physics.remove_joint(session.joint);
            physics.remove_body(session.pointer_body);
            debug!("drag released");
        }
    }
}
