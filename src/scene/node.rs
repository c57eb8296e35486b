use crate::scene::raycast::Aabb;
use crate::scene::transform::Transform;
use crate::scene::{CameraKey, NodeHandle, SurfaceKey};
use glam::Affine3A;

/// Capability tag resolved when the node is created.
///
/// Traversals branch on this tag instead of probing node contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeRole {
    /// Renderable geometry; participates in fades and raycasts.
    Mesh,
    /// Skeletal joint driven by animation tracks.
    Bone,
    #[default]
    Other,
}

/// Handler payload bound to a clickable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiAction {
    StartSequence,
    Reset,
}

/// Marks a node as a candidate for pointer hit resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interactive {
    pub is_button: bool,
    pub action: Option<UiAction>,
    /// The node fades itself out when clicked.
    pub fade_on_click: bool,
}

impl Interactive {
    #[must_use]
    pub fn button(action: UiAction) -> Self {
        Self {
            is_button: true,
            action: Some(action),
            fade_on_click: false,
        }
    }

    /// A button that fades itself out once its handler fires.
    #[must_use]
    pub fn self_fading_button(action: UiAction) -> Self {
        Self {
            fade_on_click: true,
            ..Self::button(action)
        }
    }

    /// Whether hit resolution may stop at this node.
    #[inline]
    #[must_use]
    pub fn qualifies(&self) -> bool {
        self.is_button && self.action.is_some()
    }
}

/// A scene node: hierarchy and transform plus a few optional components.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Core Spatial Data ===
    pub transform: Transform,

    // === Core State ===
    pub visible: bool,
    pub role: NodeRole,

    // === Components ===
    pub surface: Option<SurfaceKey>,
    /// Local-space bounds used by raycasting; only meshes carry them.
    pub bounds: Option<Aabb>,
    pub camera: Option<CameraKey>,
    pub interactive: Option<Interactive>,
}

impl Node {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_role(name, NodeRole::Other)
    }

    #[must_use]
    pub fn with_role(name: &str, role: NodeRole) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            role,
            surface: None,
            bounds: None,
            camera: None,
            interactive: None,
        }
    }

    #[must_use]
    pub fn bone(name: &str) -> Self {
        Self::with_role(name, NodeRole::Bone)
    }

    /// A mesh node with local bounds and an optional surface.
    #[must_use]
    pub fn mesh(name: &str, bounds: Aabb, surface: Option<SurfaceKey>) -> Self {
        let mut node = Self::with_role(name, NodeRole::Mesh);
        node.bounds = Some(bounds);
        node.surface = surface;
        node
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}
