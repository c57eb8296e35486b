//! Frame output seam.
//!
//! The session hands the finished scene to a [`FrameRenderer`] once per tick, after every
//! world matrix is current. Drawing is up to the implementor.

use glam::Affine3A;

use crate::scene::{Camera, NodeRole, Scene};

pub trait FrameRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera, camera_world: &Affine3A);
}

/// Draws nothing; counts frames and the meshes that would have been drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer {
    pub frames: u64,
    pub last_visible_meshes: usize,
}

impl NullRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameRenderer for NullRenderer {
    fn render(&mut self, scene: &Scene, _camera: &Camera, _camera_world: &Affine3A) {
        self.frames += 1;
        self.last_visible_meshes = scene
            .nodes
            .iter()
            .filter(|(handle, node)| node.role == NodeRole::Mesh && scene.is_visible_in_hierarchy(*handle))
            .count();
    }
}
