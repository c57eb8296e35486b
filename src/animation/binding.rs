use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

/// Track `track_index` of a clip drives `node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node: NodeHandle,
}

/// Resolves every track of `clip` against the nodes below `root`.
///
/// A track naming a node the actor does not have is dropped; the clip still plays
/// on the nodes that exist.
#[must_use]
pub fn bind_clip(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
    clip.tracks
        .iter()
        .enumerate()
        .filter_map(|(track_index, track)| {
            let node = scene.find_by_name(root, &track.node_name);
            if node.is_none() {
                log::debug!("Clip '{}': no node '{}' below the actor", clip.name, track.node_name);
            }
            node.map(|node| PropertyBinding { track_index, node })
        })
        .collect()
}
