//! Scene graph module.
//!
//! Minimal hierarchical scene the vignette drives every frame:
//! - [`Node`]: hierarchy, transform, visibility and typed role
//! - [`Transform`]: local TRS with cached local/world matrices
//! - [`Surface`]: per-mesh opacity and transparency state consumed by fades
//! - [`Camera`]: perspective projection and pointer ray construction
//! - [`Scene`]: node storage, traversal, raycasting and state snapshots

pub mod camera;
pub mod node;
pub mod raycast;
pub mod scene;
pub mod surface;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use node::{Interactive, Node, NodeRole, UiAction};
pub use raycast::{Aabb, Ray, RayHit};
pub use scene::{Scene, SceneState};
pub use surface::Surface;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct SurfaceKey;
    pub struct CameraKey;
}
