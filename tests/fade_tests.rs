//! Visibility Fade Tests
//!
//! Tests for:
//! - Opacity curves for fade-in and fade-out
//! - Owner visibility at fade start and end
//! - Completion continuations, supersession and interruption

use glam::Vec3;

use vignette::fade::{FadeController, FadeDirection, opacity_at};
use vignette::scene::{Aabb, Node, NodeHandle, Scene, Surface, SurfaceKey};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// An actor root with two meshes: one opaque, one authored at 0.5 opacity.
fn actor() -> (Scene, NodeHandle, Vec<SurfaceKey>) {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("Actor"));
    let bounds = Aabb::from_half_extents(Vec3::splat(0.5));

    let opaque = scene.add_surface(Surface::opaque());
    scene.add_to_parent(Node::mesh("Body", bounds, Some(opaque)), root);
    let glass = scene.add_surface(Surface::new(0.5, true));
    scene.add_to_parent(Node::mesh("Visor", bounds, Some(glass)), root);

    let surfaces = scene.surfaces_under(root);
    (scene, root, surfaces)
}

fn opacity(scene: &Scene, key: SurfaceKey) -> f32 {
    scene.surface(key).unwrap().opacity
}

// ============================================================================
// Curves
// ============================================================================

#[test]
fn fade_out_ignores_base() {
    assert!(approx(opacity_at(FadeDirection::Out, 0.0, 0.5), 1.0));
    assert!(approx(opacity_at(FadeDirection::Out, 0.25, 0.5), 0.75));
    assert!(approx(opacity_at(FadeDirection::Out, 1.0, 0.5), 0.0));
}

#[test]
fn fade_in_scales_to_base() {
    assert!(approx(opacity_at(FadeDirection::In, 0.0, 0.5), 0.0));
    assert!(approx(opacity_at(FadeDirection::In, 0.5, 0.5), 0.25));
    assert!(approx(opacity_at(FadeDirection::In, 2.0, 0.5), 0.5));
}

// ============================================================================
// Controller
// ============================================================================

#[test]
fn fade_out_hides_owner_and_reports() {
    let (mut scene, root, surfaces) = actor();
    let mut fades: FadeController<&str> = FadeController::new();
    fades.run(&mut scene, root, &surfaces, FadeDirection::Out, 0.3, 0.0, Some("hidden"));

    for &key in &surfaces {
        assert!(scene.surface(key).unwrap().transparent);
    }
    assert!(fades.update(&mut scene, 0.15).is_empty());
    assert!(approx(opacity(&scene, surfaces[0]), 0.5));
    assert!(scene.get_node(root).unwrap().visible);

    let done = fades.update(&mut scene, 0.3);
    assert_eq!(done.as_slice(), &["hidden"]);
    assert!(!scene.get_node(root).unwrap().visible);
    assert_eq!(fades.active_count(), 0);
}

#[test]
fn fade_in_shows_owner_and_restores_base() {
    let (mut scene, root, surfaces) = actor();
    scene.set_visible(root, false);

    let mut fades: FadeController<u8> = FadeController::new();
    fades.run(&mut scene, root, &surfaces, FadeDirection::In, 0.3, 1.0, None);
    assert!(scene.get_node(root).unwrap().visible);
    assert!(approx(opacity(&scene, surfaces[0]), 0.0));

    assert!(fades.update(&mut scene, 5.0).is_empty());
    let body = scene.surface(surfaces[0]).unwrap();
    assert!(approx(body.opacity, 1.0));
    assert!(!body.transparent);
    let visor = scene.surface(surfaces[1]).unwrap();
    assert!(approx(visor.opacity, 0.5));
    assert!(visor.transparent);
}

#[test]
fn new_fade_supersedes_running_one() {
    let (mut scene, root, surfaces) = actor();
    let mut fades: FadeController<&str> = FadeController::new();
    fades.run(&mut scene, root, &surfaces, FadeDirection::Out, 1.0, 0.0, Some("first"));
    fades.update(&mut scene, 0.5);
    fades.run(&mut scene, root, &surfaces, FadeDirection::In, 1.0, 0.5, Some("second"));

    assert_eq!(fades.active_count(), 1);
    let done = fades.update(&mut scene, 2.0);
    assert_eq!(done.as_slice(), &["second"]);
    assert!(scene.get_node(root).unwrap().visible);
}

#[test]
fn cancel_leaves_opacity_in_place() {
    let (mut scene, root, surfaces) = actor();
    let mut fades: FadeController<u8> = FadeController::new();
    fades.run(&mut scene, root, &surfaces, FadeDirection::Out, 1.0, 0.0, Some(1));
    fades.update(&mut scene, 0.4);

    assert!(fades.cancel_owner(root));
    assert!(!fades.is_fading(root));
    assert!(fades.update(&mut scene, 9.0).is_empty());
    assert!(approx(opacity(&scene, surfaces[0]), 0.6));
}

#[test]
fn interrupt_hands_back_the_continuation() {
    let (mut scene, root, surfaces) = actor();
    let mut fades: FadeController<u8> = FadeController::new();
    fades.run(&mut scene, root, &surfaces, FadeDirection::Out, 1.0, 0.0, Some(7));
    fades.update(&mut scene, 0.5);

    assert_eq!(fades.interrupt(root), Some(7));
    assert!(!fades.is_fading(root));
    assert!(fades.update(&mut scene, 9.0).is_empty());
    assert!(scene.get_node(root).unwrap().visible);
    assert_eq!(fades.interrupt(root), None);
}

#[test]
fn zero_duration_completes_on_next_update() {
    let (mut scene, root, surfaces) = actor();
    let mut fades: FadeController<u8> = FadeController::new();
    fades.run(&mut scene, root, &surfaces, FadeDirection::Out, 0.0, 0.0, Some(9));
    assert_eq!(fades.update(&mut scene, 0.0).as_slice(), &[9]);
}
