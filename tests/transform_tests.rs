//! Transform and TransformSystem tests
//!
//! Tests for:
//! - Transform TRS operations and dirty checking
//! - Yaw/pitch/roll helpers
//! - Hierarchical matrix propagation through a component tree
//! - Costume root matrix changes reaching unchanged components

use costume::glam::{Affine3A, EulerRot, Quat, Vec3};
use costume::scene::{Component, ComponentBase, ComponentKind, ComponentTree, Transform};
use costume::Tag;
use std::f32::consts::FRAC_PI_2;

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn bone(position: Vec3) -> Component {
    let mut component = Component::new(
        ComponentBase::new(Tag::BONE, "bone"),
        ComponentKind::from_tag(Tag::BONE, "bone").unwrap(),
    );
    component.base.transform.position = position;
    component
}

/// A chain of `length` bones, each translating +1 in X.
fn create_chain(length: usize) -> ComponentTree {
    let mut tree = ComponentTree::new();
    for i in 0..length {
        let parent = i.checked_sub(1);
        tree.push(bone(Vec3::X), parent).unwrap();
    }
    tree
}

fn world_position(tree: &ComponentTree, id: usize) -> Vec3 {
    tree.get(id).unwrap().base.world_matrix().translation.into()
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    // First call should always return true (force_update starts true)
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.position = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.rotation = Quat::from_rotation_y(FRAC_PI_2);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.scale = Vec3::splat(2.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());
}

#[test]
fn transform_local_matrix_reflects_trs() {
    let mut t = Transform::new();
    t.position = Vec3::new(10.0, 20.0, 30.0);
    t.scale = Vec3::splat(2.0);
    t.update_local_matrix();

    let (scale, _, translation) = t.local_matrix().to_scale_rotation_translation();
    assert!(vec3_approx(translation, Vec3::new(10.0, 20.0, 30.0)));
    assert!(vec3_approx(scale, Vec3::splat(2.0)));
}

#[test]
fn transform_yaw_pitch_roll_roundtrip() {
    let mut t = Transform::new();
    let (yaw, pitch, roll) = (0.5, 0.3, 0.1);
    t.set_rotation_euler_with_order(yaw, pitch, roll, EulerRot::YXZ);

    let euler = t.rotation_yaw_pitch_roll();
    assert!(approx_eq(euler.x, yaw));
    assert!(approx_eq(euler.y, pitch));
    assert!(approx_eq(euler.z, roll));
}

#[test]
fn transform_mark_dirty_forces_update() {
    let mut t = Transform::new();
    t.update_local_matrix();
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());
}

// ============================================================================
// TransformSystem Hierarchy Tests
// ============================================================================

#[test]
fn hierarchy_chain_world_positions() {
    let mut tree = create_chain(5);
    tree.update_matrices(&Affine3A::IDENTITY, false);

    // Bone i should have world X = i+1 (cumulative translations)
    for i in 0..5 {
        let world_pos = world_position(&tree, i);
        let expected_x = (i + 1) as f32;
        assert!(
            approx_eq(world_pos.x, expected_x),
            "Bone {i}: expected x={expected_x}, got x={}",
            world_pos.x
        );
    }
}

#[test]
fn hierarchy_with_rotation_and_scale() {
    let mut tree = ComponentTree::new();

    // Parent: translate (5,0,0), rotate 90° around Y, scale 2x
    let mut parent = bone(Vec3::new(5.0, 0.0, 0.0));
    parent.base.transform.rotation = Quat::from_rotation_y(FRAC_PI_2);
    parent.base.transform.scale = Vec3::splat(2.0);
    tree.push(parent, None).unwrap();
    tree.push(bone(Vec3::X), Some(0)).unwrap();

    tree.update_matrices(&Affine3A::IDENTITY, false);

    // (1,0,0) -> rotated (0,0,-1) -> scaled (0,0,-2) -> translated (5,0,-2)
    let child_world = world_position(&tree, 1);
    assert!(vec3_approx(child_world, Vec3::new(5.0, 0.0, -2.0)), "child at {child_world}");
}

#[test]
fn hierarchy_local_change_reaches_descendants() {
    let mut tree = create_chain(5);
    tree.update_matrices(&Affine3A::IDENTITY, false);

    tree.get_mut(2).unwrap().base.transform.position = Vec3::new(10.0, 0.0, 0.0);
    tree.update_matrices(&Affine3A::IDENTITY, false);

    // Bones 0,1 unchanged; bone 2 at 1+1+10 = 12; bones 3,4 follow
    assert!(approx_eq(world_position(&tree, 1).x, 2.0));
    assert!(approx_eq(world_position(&tree, 2).x, 12.0));
    assert!(approx_eq(world_position(&tree, 3).x, 13.0));
    assert!(approx_eq(world_position(&tree, 4).x, 14.0));
}

#[test]
fn hierarchy_root_matrix_change_reaches_clean_tree() {
    let mut tree = create_chain(3);
    tree.update_matrices(&Affine3A::IDENTITY, false);

    let root = Affine3A::from_translation(Vec3::new(0.0, 3.0, 0.0));
    tree.update_matrices(&root, true);
    assert!(vec3_approx(world_position(&tree, 2), Vec3::new(3.0, 3.0, 0.0)));
}

#[test]
fn hierarchy_reparent_recomputes_world() {
    let mut tree = create_chain(3);
    tree.update_matrices(&Affine3A::IDENTITY, false);

    tree.set_parent(2, None).unwrap();
    tree.update_matrices(&Affine3A::IDENTITY, false);
    assert!(vec3_approx(world_position(&tree, 2), Vec3::X));
}
