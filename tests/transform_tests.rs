//! Transform & Hierarchy Tests
//!
//! Tests for:
//! - Transform: defaults, dirty check, yaw helpers, look_at
//! - World matrix propagation through the scene hierarchy
//! - Subtree refresh for mid-frame reads

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Affine3A, Quat, Vec3};
use vignette::scene::{Node, NodeHandle, Scene, Transform};

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
    assert_eq!(*t.local_matrix(), Affine3A::IDENTITY);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();
    assert!(t.update_local_matrix(), "first update is forced");
    assert!(!t.update_local_matrix(), "nothing changed");

    t.position = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
}

#[test]
fn transform_local_matrix_reflects_trs() {
    let mut t = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
    t.rotation = Quat::from_rotation_y(FRAC_PI_2);
    t.scale = Vec3::splat(2.0);
    t.update_local_matrix();

    let p = t.local_matrix().transform_point3(Vec3::X);
    // Scale to (2,0,0), rotate to (0,0,-2), translate.
    assert!(vec3_approx(p, Vec3::new(1.0, 0.0, -2.0)));
}

#[test]
fn transform_yaw_roundtrip() {
    let mut t = Transform::new();
    for yaw in [0.0, 0.5, -1.2, PI - 0.01] {
        t.set_yaw(yaw);
        assert!(approx_eq(t.yaw(), yaw), "yaw {yaw}");
    }
}

#[test]
fn transform_yaw_half_turn_mirrors_forward() {
    let mut t = Transform::new();
    t.set_yaw(PI);
    assert!(vec3_approx(t.rotation * Vec3::new(1.0, 0.0, 0.5), Vec3::new(-1.0, 0.0, -0.5)));
}

#[test]
fn transform_look_at_basic() {
    let mut t = Transform::from_position(Vec3::new(5.0, 0.0, 0.0));
    t.look_at(Vec3::ZERO, Vec3::Y);
    let forward = t.rotation * Vec3::NEG_Z;
    assert!(vec3_approx(forward, Vec3::NEG_X));
}

#[test]
fn transform_look_at_collinear_up_noop() {
    let mut t = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
    t.rotation = Quat::from_rotation_x(0.3);
    let before = t.rotation;
    t.look_at(Vec3::ZERO, Vec3::Y);
    assert_eq!(t.rotation, before);
}

// ============================================================================
// Hierarchy Propagation
// ============================================================================

fn chain(scene: &mut Scene, length: usize) -> Vec<NodeHandle> {
    let mut handles = Vec::with_capacity(length);
    let mut first = Node::new("n0");
    first.transform = Transform::from_position(Vec3::X);
    handles.push(scene.add_node(first));
    for i in 1..length {
        let mut node = Node::new(&format!("n{i}"));
        node.transform = Transform::from_position(Vec3::X);
        let parent = handles[i - 1];
        handles.push(scene.add_to_parent(node, parent));
    }
    handles
}

#[test]
fn hierarchy_chain_world_positions() {
    let mut scene = Scene::new();
    let handles = chain(&mut scene, 5);
    scene.update_matrix_world();

    for (i, &h) in handles.iter().enumerate() {
        let expected = Vec3::new((i + 1) as f32, 0.0, 0.0);
        assert!(vec3_approx(scene.world_position(h).unwrap(), expected), "node {i}");
    }
}

#[test]
fn hierarchy_with_rotation_and_scale() {
    let mut scene = Scene::new();
    let mut parent = Node::new("parent");
    parent.transform.position = Vec3::new(0.0, 0.0, -6.0);
    parent.transform.set_yaw(PI);
    parent.transform.scale = Vec3::splat(2.0);
    let parent = scene.add_node(parent);

    let mut child = Node::bone("Hips");
    child.transform = Transform::from_position(Vec3::new(1.0, 0.5, 0.0));
    let child = scene.add_to_parent(child, parent);
    scene.update_matrix_world();

    assert!(vec3_approx(scene.world_position(child).unwrap(), Vec3::new(-2.0, 1.0, -6.0)));
}

#[test]
fn hierarchy_parent_change_propagates() {
    let mut scene = Scene::new();
    let handles = chain(&mut scene, 3);
    scene.update_matrix_world();

    scene.get_node_mut(handles[0]).unwrap().transform.position = Vec3::new(0.0, 2.0, 0.0);
    scene.update_matrix_world();
    assert!(vec3_approx(scene.world_position(handles[2]).unwrap(), Vec3::new(2.0, 2.0, 0.0)));
}

#[test]
fn attach_rebuilds_world_under_new_parent() {
    let mut scene = Scene::new();
    let mut a = Node::new("a");
    a.transform = Transform::from_position(Vec3::new(0.0, 0.0, 4.0));
    let a = scene.add_node(a);
    let b = scene.add_node(Node::new("b"));
    scene.update_matrix_world();
    assert_eq!(scene.world_position(b), Some(Vec3::ZERO));

    scene.attach(b, a);
    scene.update_matrix_world();
    assert_eq!(scene.world_position(b), Some(Vec3::new(0.0, 0.0, 4.0)));
}

#[test]
fn update_subtree_refreshes_mid_frame() {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Keeper"));
    let hips = scene.add_to_parent(Node::bone("Hips"), root);
    scene.update_matrix_world();

    scene.get_node_mut(root).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
    scene.get_node_mut(hips).unwrap().transform.position = Vec3::new(0.0, 1.0, 0.0);
    assert_eq!(scene.world_position(hips), Some(Vec3::ZERO));

    scene.update_subtree(hips);
    assert!(vec3_approx(scene.world_position(hips).unwrap(), Vec3::new(1.0, 1.0, 0.0)));
}

#[test]
fn deeply_nested_hierarchy_no_stack_overflow() {
    let mut scene = Scene::new();
    let handles = chain(&mut scene, 10_000);
    scene.update_matrix_world();
    let last = *handles.last().unwrap();
    assert!(approx_eq(scene.world_position(last).unwrap().x, 10_000.0));
}
