//! In-world prompt buttons.

use glam::Vec3;

use crate::scene::{NodeHandle, Scene};

/// Vertical bob of a floating button: `y = base_y + amplitude · sin(speed · t + phase)`.
#[derive(Debug, Clone, Copy)]
pub struct FloatingButton {
    pub node: NodeHandle,
    pub base_position: Vec3,
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
}

impl FloatingButton {
    #[must_use]
    pub fn offset_at(&self, time: f32) -> f32 {
        self.amplitude * (self.speed * time + self.phase).sin()
    }

    /// Moves the node to its bobbed position for `time`.
    pub fn apply(&self, scene: &mut Scene, time: f32) {
        if let Some(node) = scene.get_node_mut(self.node) {
            node.transform.position = self.base_position + Vec3::Y * self.offset_at(time);
        }
    }
}

/// The two prompts of the vignette.
#[derive(Debug, Clone, Copy)]
pub struct Prompts {
    pub start: FloatingButton,
    pub restart: FloatingButton,
}

impl Prompts {
    /// Bobs every visible prompt, skipping nodes `suspended` reports (pulsing ones).
    pub fn float(&self, scene: &mut Scene, time: f32, suspended: impl Fn(NodeHandle) -> bool) {
        for button in [&self.start, &self.restart] {
            let visible = scene.get_node(button.node).is_some_and(|n| n.visible);
            if visible && !suspended(button.node) {
                button.apply(scene, time);
            }
        }
    }
}
