//! Spring/coil variant: soft axial and bending springs, no hard constraints
//!
//! The coupling here is entirely force generators. They do nothing unless
//! `apply_forces` runs after every integration step; the scene driver owns
//! that call so the ordering is part of the step function, not a callback
//! registration.

use nalgebra::{Isometry3, Point3, UnitQuaternion};
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle, SharedShape};
use tracing::debug;

use crate::body::{self, FlexibleBody};
use crate::config::{BodyKind, BodyParams};
use crate::error::Result;
use crate::physics::{PhysicsWorld, SpringForce};
use crate::visual::{self, CatmullRom, Visual};

/// Bending springs are built at half the configured stiffness.
const BENDING_STIFFNESS_SCALE: f32 = 0.5;

const BASE: Point3<f32> = Point3::new(0.0, 0.5, 0.0);
const LINEAR_DAMPING: f32 = 0.4;
const ANGULAR_DAMPING: f32 = 0.4;

/// A coil spring approximated by a line of mass points with axial springs
/// between neighbors and weaker bending springs skipping one point.
pub struct Spring {
    params: BodyParams,
    handles: Vec<RigidBodyHandle>,
    colliders: Vec<ColliderHandle>,
    springs: Vec<SpringForce>,
    initial_poses: Vec<Isometry3<f32>>,
    curve: CatmullRom,
    visual: Visual,
}

impl Spring {
    pub fn new(physics: &mut PhysicsWorld, params: BodyParams) -> Result<Self> {
        params.validate()?;
        let segment_length = params.segment_length();
        let half = segment_length / 2.0;
        let shape = SharedShape::ball(params.point_radius);

        let points = body::spawn_mass_points(
            physics,
            &params,
            BASE,
            (LINEAR_DAMPING, ANGULAR_DAMPING),
            shape,
            |_| UnitQuaternion::identity(),
        );

        let mut springs = Vec::new();
        for i in 1..params.segment_count {
            // Axial spring between consecutive points, anchored at the
            // facing segment ends.
            springs.push(SpringForce::new(
                points.handles[i - 1],
                points.handles[i],
                Point3::new(0.0, 0.0, half),
                Point3::new(0.0, 0.0, -half),
                segment_length,
                params.stiffness,
                params.damping,
            ));

            // Bending spring skipping one point; a plain linear chain has
            // no resistance to folding without it.
            if i > 1 {
                springs.push(
                    SpringForce::new(
                        points.handles[i - 2],
                        points.handles[i],
                        Point3::new(0.0, 0.0, segment_length),
                        Point3::new(0.0, 0.0, -segment_length),
                        segment_length * 2.0,
                        params.stiffness,
                        params.damping,
                    )
                    .with_stiffness_scale(BENDING_STIFFNESS_SCALE),
                );
            }
        }

        debug!(
            segments = params.segment_count,
            springs = springs.len(),
            "built spring topology"
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
            springs,
            initial_poses: points.initial_poses,
            curve,
            visual,
        })
    }

    /// Number of force generators (axial plus bending).
    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }
}

impl FlexibleBody for Spring {
    fn kind(&self) -> BodyKind {
        BodyKind::Spring
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
        body::apply_point_mass(physics, &self.handles, &self.colliders, self.params.mass);
        for spring in &mut self.springs {
            spring.stiffness = self.params.stiffness * spring.stiffness_scale;
            spring.damping = self.params.damping;
        }
    }

    fn reset(&mut self, physics: &mut PhysicsWorld) {
        body::reset_points(physics, &self.handles, &self.initial_poses);
    }

    fn apply_forces(&mut self, physics: &mut PhysicsWorld) {
        // Clear last step's accumulation, then queue this step's forces.
        for handle in &self.handles {
            if let Some(body) = physics.bodies.get_mut(*handle) {
                body.reset_forces(true);
            }
        }
        for spring in &self.springs {
            spring.apply(&mut physics.bodies);
        }
    }

    fn teardown(&mut self, physics: &mut PhysicsWorld) {
        // Springs are plain data; only the bodies live in the engine.
        self.springs.clear();
        for handle in self.handles.drain(..) {
            physics.remove_body(handle);
        }
        self.colliders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spring_counts() {
        let mut physics = PhysicsWorld::new();
        let spring = Spring::new(&mut physics, BodyParams::spring()).unwrap();

        // 11 axial springs plus 10 bending springs for 12 points.
        assert_eq!(spring.points().len(), 12);
        assert_eq!(spring.spring_count(), 21);
        // No hard constraints at all.
        assert_eq!(physics.joint_count(), 0);
    }

    #[test]
    fn test_bending_springs_halved() {
        let mut physics = PhysicsWorld::new();
        let spring = Spring::new(&mut physics, BodyParams::spring()).unwrap();

        let full = spring
            .springs
            .iter()
            .filter(|s| (s.stiffness_scale - 1.0).abs() < 1e-6)
            .count();
        let bending = spring
            .springs
            .iter()
            .filter(|s| (s.stiffness_scale - BENDING_STIFFNESS_SCALE).abs() < 1e-6)
            .count();
        assert_eq!(full, 11);
        assert_eq!(bending, 10);

        for s in &spring.springs {
            assert_relative_eq!(s.stiffness, 150.0 * s.stiffness_scale);
        }
    }

    #[test]
    fn test_apply_parameters_updates_springs_in_place() {
        let mut physics = PhysicsWorld::new();
        let mut spring = Spring::new(&mut physics, BodyParams::spring()).unwrap();

        spring.params_mut().stiffness = 300.0;
        spring.params_mut().damping = 4.0;
        spring.apply_parameters(&mut physics);

        for s in &spring.springs {
            assert_relative_eq!(s.stiffness, 300.0 * s.stiffness_scale);
            assert_relative_eq!(s.damping, 4.0);
        }
        assert_eq!(spring.spring_count(), 21);
    }
}
