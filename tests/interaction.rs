//! Pointer drag lifecycle against a live scene.

use nalgebra::{Point2, Point3};

use flexsim::{BodyKind, Scene};

/// Screen position of a mass point's current center.
fn ndc_of_point(scene: &Scene, index: usize) -> Point2<f32> {
    let handle = scene.active().points()[index];
    let center = Point3::from(*scene.physics.bodies[handle].translation());
    scene.camera.project(&center).expect("point in front of camera")
}

#[test]
fn test_miss_keeps_state_idle() {
    let mut scene = Scene::new(BodyKind::Rope).unwrap();
    let joints = scene.physics.joint_count();
    let bodies = scene.physics.body_count();

    // Bottom of the viewport, well under the hanging rope.
    scene.pointer_down(Point2::new(0.0, -0.9));

    assert!(!scene.interaction.is_dragging());
    assert_eq!(scene.physics.joint_count(), joints);
    assert_eq!(scene.physics.body_count(), bodies);
}

#[test]
fn test_press_on_point_starts_drag() {
    let mut scene = Scene::new(BodyKind::Rope).unwrap();
    let joints = scene.physics.joint_count();
    let bodies = scene.physics.body_count();
    let mid = scene.active().points().len() / 2;

    scene.pointer_down(ndc_of_point(&scene, mid));

    assert!(scene.interaction.is_dragging());
    assert_eq!(
        scene.interaction.dragged_point(),
        Some(scene.active().points()[mid])
    );
    // One drag constraint and one pointer anchor body.
    assert_eq!(scene.physics.joint_count(), joints + 1);
    assert_eq!(scene.physics.body_count(), bodies + 1);
}

#[test]
fn test_press_on_anchor_is_refused() {
    let mut scene = Scene::new(BodyKind::Rope).unwrap();
    let joints = scene.physics.joint_count();

    scene.pointer_down(ndc_of_point(&scene, 0));

    assert!(!scene.interaction.is_dragging());
    assert_eq!(scene.physics.joint_count(), joints);
}

#[test]
fn test_move_updates_drag_target() {
    let mut scene = Scene::new(BodyKind::Rope).unwrap();
    let mid = scene.active().points().len() / 2;
    let ndc = ndc_of_point(&scene, mid);

    scene.pointer_down(ndc);
    let before = scene.interaction.drag_target().unwrap();

    scene.pointer_move(Point2::new(ndc.x + 0.1, ndc.y));
    let after = scene.interaction.drag_target().unwrap();

    assert!(scene.interaction.is_dragging());
    assert!((after - before).norm() > 1e-3);
}

#[test]
fn test_drag_pulls_the_point() {
    let mut scene = Scene::new(BodyKind::Rope).unwrap();
    let mid = scene.active().points().len() / 2;
    let handle = scene.active().points()[mid];
    let start = Point3::from(*scene.physics.bodies[handle].translation());

    let ndc = ndc_of_point(&scene, mid);
    scene.pointer_down(ndc);
    scene.pointer_move(Point2::new(ndc.x + 0.15, ndc.y));
    for _ in 0..30 {
        scene.advance();
    }

    let moved = Point3::from(*scene.physics.bodies[handle].translation());
    assert!((moved - start).norm() > 0.05);
}

#[test]
fn test_release_removes_drag_objects() {
    let mut scene = Scene::new(BodyKind::Rope).unwrap();
    let joints = scene.physics.joint_count();
    let bodies = scene.physics.body_count();
    let mid = scene.active().points().len() / 2;

    scene.pointer_down(ndc_of_point(&scene, mid));
    scene.pointer_up();

    assert!(!scene.interaction.is_dragging());
    assert_eq!(scene.physics.joint_count(), joints);
    assert_eq!(scene.physics.body_count(), bodies);

    // A second release is a no-op.
    scene.pointer_up();
    assert_eq!(scene.physics.joint_count(), joints);
    assert_eq!(scene.physics.body_count(), bodies);
}

#[test]
fn test_switch_mid_drag_releases_cleanly() {
    let mut scene = Scene::new(BodyKind::Rope).unwrap();
    let mid = scene.active().points().len() / 2;

    scene.pointer_down(ndc_of_point(&scene, mid));
    assert!(scene.interaction.is_dragging());

    scene.switch_body(BodyKind::Chain).unwrap();

    assert!(!scene.interaction.is_dragging());
    assert_eq!(scene.active().kind(), BodyKind::Chain);
    // 15 chain links plus the floor; no rope or drag leftovers.
    assert_eq!(scene.physics.body_count(), 16);
    assert_eq!(scene.physics.joint_count(), 14);
}
