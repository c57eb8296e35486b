use glam::{Quat, Vec3};
use slotmap::{SecondaryMap, SlotMap};

use crate::scene::camera::Camera;
use crate::scene::node::{Node, NodeRole};
use crate::scene::raycast::{Ray, RayHit, ray_hit_bounds};
use crate::scene::surface::Surface;
use crate::scene::transform::Transform;
use crate::scene::transform_system;
use crate::scene::{CameraKey, NodeHandle, SurfaceKey};

/// Scene container
///
/// Owns every node, surface and camera of the vignette.
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub surfaces: SlotMap<SurfaceKey, Surface>,
    pub cameras: SlotMap<CameraKey, Camera>,

    pub active_camera: Option<NodeHandle>,
}

/// Captured transforms, visibility and surface state, used to rewind the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    nodes: SecondaryMap<NodeHandle, NodeState>,
    surfaces: SecondaryMap<SurfaceKey, Surface>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NodeState {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
    visible: bool,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node at the scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, mut child: Node, parent: NodeHandle) -> NodeHandle {
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found while adding '{}'", child.name);
            return self.add_node(child);
        }
        child.parent = Some(parent);
        let handle = self.nodes.insert(child);
        self.nodes[parent].children.push(handle);
        handle
    }

    /// Re-parents `child` under `parent`, detaching it from its previous parent or the root list.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }
        self.detach(child);
        self.nodes[parent].children.push(child);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
        if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }
    }

    fn detach(&mut self, child: NodeHandle) {
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }
    }

    /// Removes a node and its whole subtree, together with owned surfaces and cameras.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.detach(handle);
        for h in self.descendants(handle) {
            if let Some(node) = self.nodes.remove(h) {
                if let Some(surface) = node.surface {
                    self.surfaces.remove(surface);
                }
                if let Some(camera) = node.camera {
                    self.cameras.remove(camera);
                }
            }
            if self.active_camera == Some(h) {
                self.active_camera = None;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// `root` followed by every node beneath it, depth first.
    #[must_use]
    pub fn descendants(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get(h) else {
                continue;
            };
            out.push(h);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// `handle` and then each of its ancestors up to the root.
    pub fn ancestors(&self, handle: NodeHandle) -> impl Iterator<Item = NodeHandle> + '_ {
        std::iter::successors(
            self.nodes.contains_key(handle).then_some(handle),
            |&h| self.nodes.get(h).and_then(|n| n.parent),
        )
    }

    /// Depth-first name lookup below `root` (inclusive).
    #[must_use]
    pub fn find_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.descendants(root)
            .into_iter()
            .find(|&h| self.nodes.get(h).is_some_and(|n| n.name == name))
    }

    /// Visible only if the node and every ancestor are visible.
    #[must_use]
    pub fn is_visible_in_hierarchy(&self, handle: NodeHandle) -> bool {
        let mut any = false;
        for h in self.ancestors(handle) {
            any = true;
            if !self.nodes[h].visible {
                return false;
            }
        }
        any
    }

    pub fn set_visible(&mut self, handle: NodeHandle, visible: bool) {
        if let Some(node) = self.nodes.get_mut(handle) {
            node.visible = visible;
        }
    }

    // ========================================================================
    // Matrix update pipeline
    // ========================================================================

    /// Refreshes world matrices of the whole scene. Called once per frame before rendering.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    /// Refreshes world matrices of one subtree against its parent's current world matrix.
    ///
    /// Ancestors are refreshed first so a mid-frame read sees up-to-date placement.
    pub fn update_subtree(&mut self, root: NodeHandle) {
        let top = self.ancestors(root).last();
        if let Some(top) = top {
            transform_system::update_subtree(&mut self.nodes, top);
        }
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.nodes
            .get(handle)
            .map(|n| Vec3::from(n.transform.world_matrix.translation))
    }

    // ========================================================================
    // Components
    // ========================================================================

    pub fn add_surface(&mut self, surface: Surface) -> SurfaceKey {
        self.surfaces.insert(surface)
    }

    #[inline]
    #[must_use]
    pub fn surface(&self, key: SurfaceKey) -> Option<&Surface> {
        self.surfaces.get(key)
    }

    #[inline]
    pub fn surface_mut(&mut self, key: SurfaceKey) -> Option<&mut Surface> {
        self.surfaces.get_mut(key)
    }

    /// Surfaces of every mesh at or below `root`.
    #[must_use]
    pub fn surfaces_under(&self, root: NodeHandle) -> Vec<SurfaceKey> {
        self.descendants(root)
            .into_iter()
            .filter_map(|h| {
                let node = &self.nodes[h];
                match node.role {
                    NodeRole::Mesh => node.surface,
                    NodeRole::Bone | NodeRole::Other => None,
                }
            })
            .collect()
    }

    /// Adds a camera node at the root and makes it active when none is.
    pub fn add_camera(&mut self, camera: Camera, transform: Transform) -> NodeHandle {
        let key = self.cameras.insert(camera);
        let mut node = Node::new("Camera");
        node.transform = transform;
        node.camera = Some(key);
        let handle = self.add_node(node);
        if self.active_camera.is_none() {
            self.active_camera = Some(handle);
        }
        handle
    }

    /// The active camera node's transform together with its camera.
    pub fn query_main_camera_bundle(&mut self) -> Option<(&mut Transform, &mut Camera)> {
        let node_id = self.active_camera?;
        let camera_key = self.nodes.get(node_id)?.camera?;
        let camera = self.cameras.get_mut(camera_key)?;
        let transform = &mut self.nodes.get_mut(node_id)?.transform;
        Some((transform, camera))
    }

    #[must_use]
    pub fn main_camera(&self) -> Option<(&Node, &Camera)> {
        let node = self.nodes.get(self.active_camera?)?;
        let camera = self.cameras.get(node.camera?)?;
        Some((node, camera))
    }

    // ========================================================================
    // Raycasting
    // ========================================================================

    /// Intersects the ray with every visible mesh in the scene, nearest first.
    ///
    /// World matrices must be current.
    #[must_use]
    pub fn raycast(&self, ray: &Ray) -> Vec<RayHit<NodeHandle>> {
        let mut hits: Vec<RayHit<NodeHandle>> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.role == NodeRole::Mesh)
            .filter_map(|(handle, node)| {
                let bounds = node.bounds.as_ref()?;
                if !self.is_visible_in_hierarchy(handle) {
                    return None;
                }
                let (distance, point) = ray_hit_bounds(ray, &node.transform.world_matrix, bounds)?;
                Some(RayHit {
                    node: handle,
                    distance,
                    point,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    // ========================================================================
    // State capture
    // ========================================================================

    #[must_use]
    pub fn capture_state(&self) -> SceneState {
        let nodes = self
            .nodes
            .iter()
            .map(|(h, n)| {
                (
                    h,
                    NodeState {
                        position: n.transform.position,
                        rotation: n.transform.rotation,
                        scale: n.transform.scale,
                        visible: n.visible,
                    },
                )
            })
            .collect();
        let surfaces = self.surfaces.iter().map(|(k, s)| (k, *s)).collect();
        SceneState { nodes, surfaces }
    }

    /// Rewinds every node and surface present in `state`. Nodes created later are untouched.
    pub fn restore_state(&mut self, state: &SceneState) {
        for (h, saved) in &state.nodes {
            if let Some(node) = self.nodes.get_mut(h) {
                node.transform.position = saved.position;
                node.transform.rotation = saved.rotation;
                node.transform.scale = saved.scale;
                node.visible = saved.visible;
            }
        }
        for (k, saved) in &state.surfaces {
            if let Some(surface) = self.surfaces.get_mut(k) {
                *surface = *saved;
            }
        }
        self.update_matrix_world();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::raycast::Aabb;

    #[test]
    fn attach_moves_node_out_of_roots() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::new("a"));
        let b = scene.add_node(Node::new("b"));
        scene.attach(b, a);
        assert_eq!(scene.root_nodes, vec![a]);
        assert_eq!(scene.get_node(b).unwrap().parent(), Some(a));
        assert_eq!(scene.ancestors(b).collect::<Vec<_>>(), vec![b, a]);
    }

    #[test]
    fn remove_node_drops_subtree_and_surfaces() {
        let mut scene = Scene::new();
        let root = scene.add_node(Node::new("root"));
        let surface = scene.add_surface(Surface::opaque());
        let mesh = scene.add_to_parent(
            Node::mesh("body", Aabb::from_half_extents(Vec3::ONE), Some(surface)),
            root,
        );
        scene.remove_node(root);
        assert!(!scene.contains(mesh));
        assert!(scene.surface(surface).is_none());
        assert!(scene.root_nodes.is_empty());
    }

    #[test]
    fn hidden_parent_hides_meshes_from_raycast() {
        let mut scene = Scene::new();
        let root = scene.add_node(Node::new("root"));
        scene.add_to_parent(Node::mesh("box", Aabb::from_half_extents(Vec3::ONE), None), root);
        scene.update_matrix_world();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap();
        assert_eq!(scene.raycast(&ray).len(), 1);

        scene.set_visible(root, false);
        assert!(scene.raycast(&ray).is_empty());
    }
}
