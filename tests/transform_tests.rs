//! TransformNode delta application tests
//!
//! Tests for:
//! - Translation, additive scale and anchored rotation
//! - Agreement with the literal world-matrix composition
//! - Drift over many small deltas
//! - Revision and last-delta bookkeeping

use glam::{Mat4, Quat, Vec3};
use pivot::{Scene, TransformDelta, TransformNode};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn node(scene: &Scene, handle: pivot::NodeHandle) -> &TransformNode {
    scene.get_node(handle).unwrap()
}

// ============================================================================
// Single Deltas
// ============================================================================

#[test]
fn new_node_is_identity_at_its_position() {
    let n = TransformNode::at("n", Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(n.rotation(), Quat::IDENTITY);
    assert_eq!(n.scale(), Vec3::ONE);
    assert_eq!(*n.world_matrix(), Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(n.revision(), 0);
    assert!(n.last_delta().is_none());
}

#[test]
fn translation_moves_the_node() {
    let mut scene = Scene::new();
    let h = scene.create_node_at("n", Vec3::X);

    scene
        .apply_transform_delta(h, TransformDelta::from_translation(Vec3::new(1.0, 2.0, 3.0)))
        .unwrap();

    assert!(vec3_approx(node(&scene, h).position(), Vec3::new(2.0, 2.0, 3.0)));
    assert!(vec3_approx(
        node(&scene, h).world_matrix().w_axis.truncate(),
        Vec3::new(2.0, 2.0, 3.0)
    ));
}

#[test]
fn scale_is_additive() {
    let mut scene = Scene::new();
    let h = scene.create_node("n");

    scene
        .apply_transform_delta(h, TransformDelta::from_scale(Vec3::new(1.0, 0.0, 0.5)))
        .unwrap();
    scene
        .apply_transform_delta(h, TransformDelta::from_scale(Vec3::new(1.0, 0.0, 0.5)))
        .unwrap();

    let n = node(&scene, h);
    assert!(vec3_approx(n.scale(), Vec3::new(3.0, 1.0, 2.0)));
    let (scale, _, _) = n.world_matrix().to_scale_rotation_translation();
    assert!(vec3_approx(scale, Vec3::new(3.0, 1.0, 2.0)));
}

#[test]
fn rotation_turns_about_the_anchor() {
    let mut scene = Scene::new();
    let h = scene.create_node("n");

    // Quarter turn about Y around a pivot one unit along +X.
    scene
        .apply_transform_delta(h, TransformDelta::from_rotation(Quat::from_rotation_y(FRAC_PI_2), Vec3::X))
        .unwrap();

    let n = node(&scene, h);
    assert!(vec3_approx(n.position(), Vec3::new(1.0, 0.0, 1.0)));
    assert!(n.rotation().abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2), EPSILON));
}

#[test]
fn zero_anchor_spins_in_place() {
    let mut scene = Scene::new();
    let h = scene.create_node_at("n", Vec3::new(4.0, 5.0, 6.0));

    scene
        .apply_transform_delta(h, TransformDelta::from_rotation(Quat::from_rotation_z(1.0), Vec3::ZERO))
        .unwrap();

    assert!(vec3_approx(node(&scene, h).position(), Vec3::new(4.0, 5.0, 6.0)));
}

#[test]
fn rotations_compose_ahead_of_previous_rotation() {
    let mut scene = Scene::new();
    let h = scene.create_node("n");
    let first = Quat::from_rotation_x(FRAC_PI_2);
    let second = Quat::from_rotation_y(FRAC_PI_2);

    scene.apply_transform_delta(h, TransformDelta::from_rotation(first, Vec3::ZERO)).unwrap();
    scene.apply_transform_delta(h, TransformDelta::from_rotation(second, Vec3::ZERO)).unwrap();

    assert!(node(&scene, h).rotation().abs_diff_eq(second * first, EPSILON));
}

// ============================================================================
// World Matrix Composition
// ============================================================================

#[test]
fn world_matrix_matches_literal_composition() {
    let mut scene = Scene::new();
    let h = scene.create_node_at("n", Vec3::new(2.0, 0.0, 0.0));

    // Give the node a non-trivial starting rotation and scale.
    scene
        .apply_transform_delta(h, TransformDelta::from_rotation(Quat::from_rotation_z(FRAC_PI_4), Vec3::ZERO))
        .unwrap();
    scene
        .apply_transform_delta(h, TransformDelta::from_scale(Vec3::ONE))
        .unwrap();

    let before = node(&scene, h).clone();
    let delta = TransformDelta {
        translation: Vec3::new(0.0, 1.0, 0.0),
        scale: Vec3::new(0.5, 0.0, 0.0),
        rotation: Quat::from_rotation_x(FRAC_PI_6),
        anchor: Vec3::new(0.0, 0.0, 1.0),
        target_translation: Vec3::ZERO,
    };
    scene.apply_transform_delta(h, delta).unwrap();

    let expected = Mat4::from_translation(before.position() + delta.translation)
        * Mat4::from_translation(delta.anchor)
        * Mat4::from_quat(delta.rotation)
        * Mat4::from_translation(-delta.anchor)
        * Mat4::from_quat(before.rotation())
        * Mat4::from_scale(before.scale() + delta.scale);

    assert!(node(&scene, h).world_matrix().abs_diff_eq(expected, EPSILON));
}

#[test]
fn world_matrix_tracks_decomposed_state() {
    let mut scene = Scene::new();
    let h = scene.create_node("n");
    let delta = TransformDelta {
        translation: Vec3::new(3.0, -1.0, 2.0),
        scale: Vec3::splat(0.25),
        rotation: Quat::from_rotation_y(0.7),
        anchor: Vec3::new(1.0, 1.0, 0.0),
        target_translation: Vec3::ZERO,
    };

    for _ in 0..5 {
        scene.apply_transform_delta(h, delta).unwrap();
    }

    let n = node(&scene, h);
    let expected = Mat4::from_scale_rotation_translation(n.scale(), n.rotation(), n.position());
    assert!(n.world_matrix().abs_diff_eq(expected, EPSILON));
}

#[test]
fn full_circle_of_small_deltas_returns_home() {
    let mut scene = Scene::new();
    let h = scene.create_node_at("n", Vec3::new(0.0, 0.0, 3.0));
    let step = Quat::from_rotation_y(1f32.to_radians());

    // Orbit the origin: the anchor always points from the node back to it.
    for _ in 0..360 {
        let anchor = -node(&scene, h).position();
        scene.apply_transform_delta(h, TransformDelta::from_rotation(step, anchor)).unwrap();
    }

    let n = node(&scene, h);
    assert!(n.position().abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-3));
    assert!((n.position().length() - 3.0).abs() < 1e-3);
    assert!(n.rotation().angle_between(Quat::IDENTITY) < 1e-3);
    assert!((n.rotation().length() - 1.0).abs() < EPSILON);
}

// ============================================================================
// Bookkeeping
// ============================================================================

#[test]
fn each_delta_bumps_revision_and_records_itself() {
    let mut scene = Scene::new();
    let h = scene.create_node("n");
    let delta = TransformDelta::from_translation(Vec3::Y);

    assert_eq!(scene.apply_transform_delta(h, delta).unwrap(), 1);
    scene.apply_transform_delta(h, TransformDelta::IDENTITY).unwrap();

    let n = node(&scene, h);
    assert_eq!(n.revision(), 2);
    assert_eq!(n.last_delta(), Some(&TransformDelta::IDENTITY));
    assert!(TransformDelta::IDENTITY.is_identity());
    assert!(!delta.is_identity());
}

#[test]
fn identity_delta_leaves_transform_unchanged() {
    let mut scene = Scene::new();
    let h = scene.create_node_at("n", Vec3::new(1.0, 2.0, 3.0));
    let before = *node(&scene, h).world_matrix();

    scene.apply_transform_delta(h, TransformDelta::default()).unwrap();

    assert!(node(&scene, h).world_matrix().abs_diff_eq(before, EPSILON));
}

#[test]
fn unknown_node_is_an_error() {
    let mut scene = Scene::new();
    let h = scene.create_node("n");
    scene.remove_node(h);

    let result = scene.apply_transform_delta(h, TransformDelta::from_translation(Vec3::X));
    assert!(matches!(result, Err(pivot::PivotError::NodeNotFound(handle)) if handle == h));
}
