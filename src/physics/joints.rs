//! Joint constructors for flexible-body topologies and pointer dragging

use nalgebra::Point3;
use rapier3d::prelude::*;

/// Rod-like coupling holding two consecutive points at a fixed
/// center-to-center separation while leaving relative rotation free.
///
/// Implemented the way the engine builds its rope joint: the linear axes
/// are coupled into a single radial axis whose limits pin the distance to
/// exactly `rest` from both sides. The separation holds even when part of
/// the body folds on the floor. Contacts between the coupled pair are
/// disabled; adjacent shapes may legitimately overlap.
pub fn distance_joint(rest: f32) -> GenericJoint {
    GenericJointBuilder::new(JointAxesMask::empty())
        .coupled_axes(JointAxesMask::LIN_AXES)
        .limits(JointAxis::LinX, [rest, rest])
        .contacts_enabled(false)
        .build()
}

/// Chain-link coupling: a spherical joint whose anchors sit half the rest
/// distance out along each link's local chain axis (+Z).
///
/// Constraint forces act at the offset anchors, so tension torques each
/// link into alignment with its neighbors; links reorient as the chain
/// sags and the settled center-to-center distance equals `rest`.
pub fn link_joint(rest: f32) -> GenericJoint {
    let half = rest / 2.0;
    GenericJointBuilder::new(JointAxesMask::LOCKED_SPHERICAL_AXES)
        .local_anchor1(Point3::new(0.0, 0.0, half))
        .local_anchor2(Point3::new(0.0, 0.0, -half))
        .contacts_enabled(false)
        .build()
}

/// Pointer-drag coupling pinning a dragged body's local origin to the
/// pointer anchor body. The anchor body is kinematic and stands in for
/// "world space": moving it moves the pinned point.
pub fn drag_joint() -> GenericJoint {
    GenericJointBuilder::new(JointAxesMask::LOCKED_SPHERICAL_AXES)
        .local_anchor1(Point3::origin())
        .local_anchor2(Point3::origin())
        .contacts_enabled(false)
        .build()
}
