//! Position bookkeeping across clip boundaries.
//!
//! Clips carry their own root motion on the anchor joint, relative to the clip's
//! origin. Chaining two clips naively either snaps the actor back to where the first
//! clip started or applies the displacement twice. The functions here move the actor
//! root so the visible body stays put across a clip change.

use glam::Vec3;

use crate::actor::Actor;
use crate::animation::{ActionHandle, HOLD_EPSILON, LoopMode};
use crate::config::SequenceConfig;
use crate::scene::Scene;

/// Clip to chain into after a one-shot clip ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Successor {
    pub index: usize,
    pub loop_mode: LoopMode,
}

fn anchor_world_position(scene: &mut Scene, actor: &Actor) -> Option<Vec3> {
    let anchor = actor.anchor?;
    scene.update_subtree(actor.root);
    scene.world_position(anchor)
}

/// Moves the actor root horizontally onto the anchor joint's current world position,
/// with the root height clamped to the ground.
///
/// Returns the new root position, or `None` when the rig has no anchor.
pub fn reroot_to_anchor(scene: &mut Scene, actor: &Actor) -> Option<Vec3> {
    let anchor = anchor_world_position(scene, actor)?;
    let node = scene.get_node_mut(actor.root)?;
    node.transform.position = Vec3::new(anchor.x, 0.0, anchor.z);
    let placed = node.transform.position;
    scene.update_subtree(actor.root);
    log::debug!("{} re-rooted at {placed}", actor.role.label());
    Some(placed)
}

/// Re-roots an actor frozen on a held last frame. Call right before replacing the clip.
///
/// Returns whether the actor was held.
pub fn reroot_if_held(scene: &mut Scene, actor: &Actor) -> bool {
    let held = actor.controller.state().is_some_and(|s| s.hold_last_frame);
    if held {
        reroot_to_anchor(scene, actor);
    }
    held
}

/// Re-roots onto the anchor while the current clip stays on screen.
///
/// The current clip keeps writing its anchor translation relative to the old root, so
/// that translation is offset by the distance the root moved.
fn reroot_in_place(scene: &mut Scene, actor: &mut Actor) {
    let Some(anchor) = actor.anchor else {
        return;
    };
    scene.update_subtree(actor.root);
    let Some(before) = scene.world_position(actor.root) else {
        return;
    };
    if reroot_to_anchor(scene, actor).is_none() {
        return;
    }
    let Some(after) = scene.world_position(actor.root) else {
        return;
    };
    let parent = scene.get_node(anchor).and_then(|n| n.parent());
    let Some(parent_world) = parent.and_then(|p| scene.get_node(p)).map(|n| *n.world_matrix()) else {
        return;
    };
    let offset = parent_world.inverse().transform_vector3(before - after);
    actor.controller.shift_translation(anchor, offset);
}

/// Re-roots the actor and cross-fades from the clip on screen into `next`, started
/// `start_time` into the clip.
///
/// The blend starts from exactly the pose that was showing, so the anchor does not move
/// on the frame of the swap.
pub fn blend_into(
    scene: &mut Scene,
    actor: &mut Actor,
    next: Successor,
    duration: f32,
    start_time: f32,
) -> Option<ActionHandle> {
    if next.index >= actor.controller.clip_count() {
        log::warn!("{} has no clip {} to blend into", actor.role.label(), next.index);
        return None;
    }
    reroot_in_place(scene, actor);
    let handle = actor
        .controller
        .cross_fade_to_at(scene, next.index, next.loop_mode, duration, false, start_time)?;
    actor.controller.advance(0.0, scene);
    Some(handle)
}

/// Handles the end of a one-shot clip whose final pose was just applied.
///
/// Without a successor the finished clip is pinned on its last frame and the re-root is
/// left to [`reroot_if_held`], since moving the root under a frozen pose would displace
/// the body twice. Otherwise the successor is blended in through [`blend_into`], started
/// `handoff_seek_secs` into the clip.
pub fn hand_off(
    scene: &mut Scene,
    actor: &mut Actor,
    successor: Option<Successor>,
    sequence: &SequenceConfig,
) -> Option<ActionHandle> {
    match successor {
        None => {
            actor.controller.set_hold_last_frame(true);
            actor.controller.current_action()
        }
        Some(next) => blend_into(scene, actor, next, sequence.handoff_fade_secs, sequence.handoff_seek_secs),
    }
}

/// Swaps the actor into clip `index` facing `yaw` without moving its anchor joint.
///
/// The anchor's world position is read before the swap, the new clip is sampled an
/// epsilon in, and the horizontal part of the difference is taken off the root.
pub fn swap_with_correction(
    scene: &mut Scene,
    actor: &mut Actor,
    index: usize,
    loop_mode: LoopMode,
    yaw: f32,
) -> Option<ActionHandle> {
    if index >= actor.controller.clip_count() {
        log::warn!("{} has no clip {index} to swap to", actor.role.label());
        return None;
    }
    let before = anchor_world_position(scene, actor);

    if let Some(node) = scene.get_node_mut(actor.root) {
        node.transform.set_yaw(yaw);
    }
    let handle = actor.controller.play(scene, index, loop_mode)?;
    actor.controller.advance(HOLD_EPSILON, scene);

    if let (Some(before), Some(after)) = (before, anchor_world_position(scene, actor)) {
        let delta = after - before;
        if let Some(node) = scene.get_node_mut(actor.root) {
            node.transform.position -= Vec3::new(delta.x, 0.0, delta.z);
        }
        scene.update_subtree(actor.root);
        log::debug!("{} swap corrected by {delta}", actor.role.label());
    }
    Some(handle)
}
