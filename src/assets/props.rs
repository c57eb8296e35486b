//! Static props: ball, goal, the two prompt buttons and the camera.

use glam::Vec3;

use crate::config::VignetteConfig;
use crate::scene::{Aabb, Camera, Interactive, Node, NodeHandle, Scene, Surface, Transform, UiAction};

/// Handles of the props a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Props {
    pub ball: NodeHandle,
    pub goal: NodeHandle,
    pub start_prompt: NodeHandle,
    pub restart_prompt: NodeHandle,
    pub camera: NodeHandle,
}

/// A button node with a label mesh below it. Hits land on the label; the handler lives
/// on the parent.
fn spawn_prompt(scene: &mut Scene, name: &str, position: Vec3, interactive: Interactive) -> NodeHandle {
    let mut button = Node::new(name);
    button.transform = Transform::from_position(position);
    button.interactive = Some(interactive);
    let button = scene.add_node(button);

    let surface = scene.add_surface(Surface::opaque());
    scene.add_to_parent(
        Node::mesh(
            &format!("{name}.Label"),
            Aabb::from_half_extents(Vec3::new(0.6, 0.2, 0.05)),
            Some(surface),
        ),
        button,
    );
    button
}

/// Adds every prop to `scene`. The restart prompt starts hidden.
pub fn spawn_props(scene: &mut Scene, config: &VignetteConfig) -> Props {
    let ball_surface = scene.add_surface(Surface::opaque());
    let mut ball = Node::mesh(
        "Ball",
        Aabb::from_half_extents(Vec3::splat(config.ball.radius)),
        Some(ball_surface),
    );
    ball.transform = Transform::from_position(config.ball.spawn_position);
    let ball = scene.add_node(ball);

    let goal_surface = scene.add_surface(Surface::new(0.9, true));
    let mut goal = Node::mesh(
        "Goal",
        Aabb::new(Vec3::new(-3.66, 0.0, -1.0), Vec3::new(3.66, 2.44, 0.0)),
        Some(goal_surface),
    );
    goal.transform = Transform::from_position(Vec3::new(0.0, 0.0, -7.0));
    let goal = scene.add_node(goal);

    let start_prompt = spawn_prompt(
        scene,
        "StartPrompt",
        config.ui.start_prompt_position,
        Interactive::self_fading_button(UiAction::StartSequence),
    );
    let restart_prompt = spawn_prompt(
        scene,
        "RestartPrompt",
        config.ui.restart_prompt_position,
        Interactive::button(UiAction::Reset),
    );
    scene.set_visible(restart_prompt, false);

    let cam = &config.camera;
    let mut transform = Transform::from_position(cam.default_position);
    transform.look_at(cam.default_target, Vec3::Y);
    let camera = scene.add_camera(
        Camera::new_perspective(cam.fov, cam.aspect, cam.near, cam.far),
        transform,
    );

    scene.update_matrix_world();
    Props {
        ball,
        goal,
        start_prompt,
        restart_prompt,
        camera,
    }
}
