//! Chain variant: rigid links coupled with slack distance joints

use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};
use rapier3d::prelude::{ColliderHandle, ImpulseJointHandle, RigidBodyHandle, SharedShape};
use tracing::debug;

use crate::body::{self, FlexibleBody};
use crate::config::{BodyKind, BodyParams};
use crate::error::Result;
use crate::physics::{joints, PhysicsWorld};
use crate::visual::Visual;

/// Rest distance as a fraction of the nominal segment length. The slack
/// lets links visually overlap and sag instead of stretching taut.
const LINK_SLACK: f32 = 0.8;

const BASE: Point3<f32> = Point3::new(0.0, 2.0, 0.0);
const LINEAR_DAMPING: f32 = 0.2;
const ANGULAR_DAMPING: f32 = 0.2;

/// A chain of interlocking links. Every other link is rotated 90 degrees
/// around the chain axis; each link renders as its own rigid element.
pub struct Chain {
    params: BodyParams,
    handles: Vec<RigidBodyHandle>,
    colliders: Vec<ColliderHandle>,
    joints: Vec<ImpulseJointHandle>,
    initial_poses: Vec<Isometry3<f32>>,
    visual: Visual,
}

impl Chain {
    pub fn new(physics: &mut PhysicsWorld, params: BodyParams) -> Result<Self> {
        params.validate()?;
        let segment_length = params.segment_length();

        // Approximate link shape: a flat box, long axis across the chain.
        let r = params.point_radius;
        let shape = SharedShape::cuboid(r, r / 4.0, r / 2.0);

        let points = body::spawn_mass_points(
            physics,
            &params,
            BASE,
            (LINEAR_DAMPING, ANGULAR_DAMPING),
            shape,
            link_orientation,
        );

        let mut joints_out = Vec::with_capacity(params.segment_count - 1);
        for i in 1..params.segment_count {
            let joint = joints::link_joint(segment_length * LINK_SLACK);
            joints_out.push(physics.add_joint(points.handles[i - 1], points.handles[i], joint));
        }

        debug!(
            segments = params.segment_count,
            rest = segment_length * LINK_SLACK,
            "built chain topology"
        );

        Ok(Self {
            visual: Visual::Links(points.initial_poses.clone()),
            params,
            handles: points.handles,
            colliders: points.colliders,
            joints: joints_out,
            initial_poses: points.initial_poses,
        })
    }
}

/// Every other link is rotated a quarter turn about the chain axis.
fn link_orientation(index: usize) -> UnitQuaternion<f32> {
    if index % 2 != 0 {
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_2)
    } else {
        UnitQuaternion::identity()
    }
}

impl FlexibleBody for Chain {
    fn kind(&self) -> BodyKind {
        BodyKind::Chain
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
        let Visual::Links(poses) = &mut self.visual else {
            return;
        };
        for (pose, handle) in poses.iter_mut().zip(self.handles.iter()) {
            if let Some(body) = physics.bodies.get(*handle) {
                *pose = *body.position();
            }
        }
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
