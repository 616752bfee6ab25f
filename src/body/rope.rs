//! Rope variant: taut distance joints with a continuous tube visual

use nalgebra::{Isometry3, Point3, UnitQuaternion};
use rapier3d::prelude::{ColliderHandle, ImpulseJointHandle, RigidBodyHandle, SharedShape};
use tracing::debug;

use crate::body::{self, FlexibleBody};
use crate::config::{BodyKind, BodyParams};
use crate::error::Result;
use crate::physics::{joints, PhysicsWorld};
use crate::visual::{self, CatmullRom, Visual};

const BASE: Point3<f32> = Point3::new(0.0, 2.0, 0.0);
const LINEAR_DAMPING: f32 = 0.5;
const ANGULAR_DAMPING: f32 = 0.5;

/// An inextensible rope: consecutive points held at exactly the nominal
/// segment length, rendered as one smooth tube through all points.
pub struct Rope {
    params: BodyParams,
    handles: Vec<RigidBodyHandle>,
    colliders: Vec<ColliderHandle>,
    joints: Vec<ImpulseJointHandle>,
    initial_poses: Vec<Isometry3<f32>>,
    curve: CatmullRom,
    visual: Visual,
}

impl Rope {
    pub fn new(physics: &mut PhysicsWorld, params: BodyParams) -> Result<Self> {
        params.validate()?;
        let segment_length = params.segment_length();
        let shape = SharedShape::ball(params.point_radius);

        let points = body::spawn_mass_points(
            physics,
            &params,
            BASE,
            (LINEAR_DAMPING, ANGULAR_DAMPING),
            shape,
            |_| UnitQuaternion::identity(),
        );

        let mut joints_out = Vec::with_capacity(params.segment_count - 1);
        for i in 1..params.segment_count {
            let joint = joints::distance_joint(segment_length);
            joints_out.push(physics.add_joint(points.handles[i - 1], points.handles[i], joint));
        }

        debug!(
            segments = params.segment_count,
            rest = segment_length,
            "built rope topology"
        );

        let control_points = points
            .initial_poses
            .iter()
            .map(|pose| Point3::from(pose.translation.vector))
            .collect();
        let curve = CatmullRom::new(control_points);
        let visual = Visual::Tube(visual::tube::build_tube(
            &curve.sample_path(visual::TUBE_SEGMENTS),
            params.point_radius,
            visual::TUBE_RADIAL_SEGMENTS,
        ));

        Ok(Self {
            params,
            handles: points.handles,
            colliders: points.colliders,
            joints: joints_out,
            initial_poses: points.initial_poses,
            curve,
            visual,
        })
    }
}

impl FlexibleBody for Rope {
    fn kind(&self) -> BodyKind {
        BodyKind::Rope
    }

    fn points(&self) -> &[RigidBodyHandle] {
        &self.handles
    }

    fn params(&self) -> &BodyParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut BodyParams {
        &mut self.params
    }

    fn visual(&self) -> &Visual {
        &self.visual
    }

    fn sync_visual(&mut self, physics: &PhysicsWorld) {
        for (point, handle) in self.curve.points_mut().iter_mut().zip(self.handles.iter()) {
            if let Some(body) = physics.bodies.get(*handle) {
                *point = Point3::from(*body.translation());
            }
        }
        self.visual = Visual::Tube(visual::tube::build_tube(
            &self.curve.sample_path(visual::TUBE_SEGMENTS),
            self.params.point_radius,
            visual::TUBE_RADIAL_SEGMENTS,
        ));
    }

    fn apply_parameters(&mut self, physics: &mut PhysicsWorld) {
        // Only mass is live for distance-constraint variants.
        body::apply_point_mass(physics, &self.handles, &self.colliders, self.params.mass);
    }

    fn reset(&mut self, physics: &mut PhysicsWorld) {
        body::reset_points(physics, &self.handles, &self.initial_poses);
    }

    fn teardown(&mut self, physics: &mut PhysicsWorld) {
        for joint in self.joints.drain(..) {
            physics.remove_joint(joint);
        }
        for handle in self.handles.drain(..) {
            physics.remove_body(handle);
        }
        self.colliders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_counts() {
        let mut physics = PhysicsWorld::new();
        let rope = Rope::new(&mut physics, BodyParams::rope()).unwrap();

        assert_eq!(rope.points().len(), 20);
        assert_eq!(physics.joint_count(), 19);
        assert_eq!(physics.body_count(), 20);
    }

    #[test]
    fn test_tube_visual_present() {
        let mut physics = PhysicsWorld::new();
        let rope = Rope::new(&mut physics, BodyParams::rope()).unwrap();

        let tube = rope.visual().tube().expect("rope renders as a tube");
        assert!(tube.vertex_count() > 0);
    }

    #[test]
    fn test_sync_visual_is_idempotent() {
        let mut physics = PhysicsWorld::new();
        let mut rope = Rope::new(&mut physics, BodyParams::rope()).unwrap();

        rope.sync_visual(&physics);
        let first = rope.visual().tube().unwrap().positions.clone();
        rope.sync_visual(&physics);
        let second = rope.visual().tube().unwrap().positions.clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_params_refused() {
        let mut physics = PhysicsWorld::new();
        let params = BodyParams {
            rest_length: -1.0,
            ..BodyParams::rope()
        };
        assert!(Rope::new(&mut physics, params).is_err());
        assert_eq!(physics.body_count(), 0);
    }
}
