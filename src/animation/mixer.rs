use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::animation::ActionHandle;
use crate::animation::action::AnimationAction;
use crate::animation::clip::ChannelSample;
use crate::animation::values::Interpolatable;
use crate::scene::{NodeHandle, Scene};

/// Handles of one-shot actions that finished during an update.
pub type FinishedActions = SmallVec<[ActionHandle; 2]>;

/// Two-action blend window: `from` fades out while `to` fades in.
#[derive(Debug, Clone, Copy)]
struct CrossFade {
    from: ActionHandle,
    to: ActionHandle,
    duration: f32,
    elapsed: f32,
    /// Time-scale ramp endpoints when warping: (from_start, from_end, to_start).
    warp: Option<(f32, f32, f32)>,
}

#[derive(Debug, Clone, Copy)]
struct RestPose {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
}

#[derive(Debug, Clone, Copy)]
struct Blend<T> {
    value: T,
    weight: f32,
}

#[derive(Debug, Default)]
struct PoseAccumulator {
    position: Option<Blend<Vec3>>,
    rotation: Option<Blend<Quat>>,
    scale: Option<Blend<Vec3>>,
}

fn fold<T: Interpolatable>(slot: &mut Option<Blend<T>>, value: T, weight: f32) {
    *slot = Some(match *slot {
        None => Blend { value, weight },
        Some(b) => Blend {
            value: T::accumulate(b.value, b.weight, value, weight),
            weight: b.weight + weight,
        },
    });
}

fn resolve<T: Interpolatable>(slot: Option<Blend<T>>, rest: T) -> T {
    match slot {
        Some(b) if b.weight >= 1.0 - 1e-4 => b.value,
        Some(b) => T::mix(rest, b.value, b.weight),
        None => rest,
    }
}

/// Animation mixer for one actor.
///
/// Advances its actions, drives at most one cross-fade, and writes the weighted blend
/// of every applied action to the bound nodes. Bound nodes nothing contributes to fall
/// back to the pose they had when first bound.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: SlotMap<ActionHandle, AnimationAction>,
    fade: Option<CrossFade>,
    rest_pose: FxHashMap<NodeHandle, RestPose>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action, remembering the rest pose of any newly bound node.
    pub fn add_action(&mut self, scene: &Scene, action: AnimationAction) -> ActionHandle {
        for binding in &action.bindings {
            if let Some(node) = scene.get_node(binding.node) {
                self.rest_pose.entry(binding.node).or_insert(RestPose {
                    position: node.transform.position,
                    rotation: node.transform.rotation,
                    scale: node.transform.scale,
                });
            }
        }
        self.actions.insert(action)
    }

    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: ActionHandle) -> bool {
        self.actions.contains_key(handle)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionHandle, &AnimationAction)> {
        self.actions.iter()
    }

    /// Removes an action; a cross-fade it takes part in is resolved in favour of the other side.
    pub fn stop(&mut self, handle: ActionHandle) {
        if self.actions.remove(handle).is_none() {
            return;
        }
        if let Some(fade) = self.fade
            && (fade.from == handle || fade.to == handle)
        {
            let survivor = if fade.from == handle { fade.to } else { fade.from };
            if let Some(action) = self.actions.get_mut(survivor) {
                action.weight = 1.0;
                action.time_scale = 1.0;
            }
            self.fade = None;
        }
    }

    pub fn stop_all(&mut self) {
        self.actions.clear();
        self.fade = None;
    }

    #[must_use]
    pub fn is_cross_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Handle of the action fading out, if a cross-fade is running.
    #[must_use]
    pub fn fading_out(&self) -> Option<ActionHandle> {
        self.fade.map(|f| f.from)
    }

    /// Blends from `from` to `to` over `duration` seconds.
    ///
    /// A fade already in progress is collapsed first: its outgoing action is dropped so
    /// no more than two actions are ever live. With `warp`, the time scales ramp between
    /// the two clips' durations.
    pub fn cross_fade(&mut self, from: ActionHandle, to: ActionHandle, duration: f32, warp: bool) {
        if let Some(previous) = self.fade.take()
            && previous.from != to
        {
            self.actions.remove(previous.from);
        }

        let (Some(from_dur), Some(to_dur)) = (
            self.actions.get(from).map(|a| a.clip().duration),
            self.actions.get(to).map(|a| a.clip().duration),
        ) else {
            log::warn!("Cross-fade requested between missing actions");
            return;
        };

        if duration <= 0.0 {
            self.actions.remove(from);
            if let Some(action) = self.actions.get_mut(to) {
                action.weight = 1.0;
            }
            return;
        }

        let warp = (warp && from_dur > 0.0 && to_dur > 0.0)
            .then(|| (1.0, from_dur / to_dur, to_dur / from_dur));

        // A finished one-shot fades out from its end pose.
        if let Some(action) = self.actions.get_mut(from) {
            action.weight = 1.0;
            action.enabled = true;
        }
        if let Some(action) = self.actions.get_mut(to) {
            action.weight = 0.0;
            action.enabled = true;
            if let Some((_, _, to_start)) = warp {
                action.time_scale = to_start;
            }
        }
        self.fade = Some(CrossFade {
            from,
            to,
            duration,
            elapsed: 0.0,
            warp,
        });
    }

    /// Advances every action by `dt`, applies the blended pose to the scene and returns
    /// the one-shot actions that finished in this step.
    ///
    /// Finishing actions contribute their final pose to this step before being disabled
    /// (or pinned, when holding their last frame).
    pub fn update(&mut self, dt: f32, scene: &mut Scene) -> FinishedActions {
        let mut finished = FinishedActions::new();
        for (handle, action) in &mut self.actions {
            if action.update(dt) {
                finished.push(handle);
            }
        }

        self.advance_fade(dt);
        self.apply(scene);

        for &handle in &finished {
            if let Some(action) = self.actions.get_mut(handle)
                && !action.hold_last_frame
            {
                action.enabled = false;
            }
        }
        finished
    }

    fn advance_fade(&mut self, dt: f32) {
        let Some(mut fade) = self.fade else {
            return;
        };
        fade.elapsed += dt;
        let w = (fade.elapsed / fade.duration).clamp(0.0, 1.0);

        if let Some(action) = self.actions.get_mut(fade.from) {
            action.weight = 1.0 - w;
            if let Some((start, end, _)) = fade.warp {
                action.time_scale = start + (end - start) * w;
            }
        }
        if let Some(action) = self.actions.get_mut(fade.to) {
            action.weight = w;
            if let Some((_, _, to_start)) = fade.warp {
                action.time_scale = to_start + (1.0 - to_start) * w;
            }
        }

        if w >= 1.0 {
            self.actions.remove(fade.from);
            if let Some(action) = self.actions.get_mut(fade.to) {
                action.weight = 1.0;
                action.time_scale = 1.0;
            }
            self.fade = None;
        } else {
            self.fade = Some(fade);
        }
    }

    fn apply(&mut self, scene: &mut Scene) {
        let mut poses: FxHashMap<NodeHandle, PoseAccumulator> = FxHashMap::default();

        for action in self.actions.values_mut() {
            if !action.is_applied() {
                continue;
            }
            let weight = action.weight;
            let shift = action.root_shift;
            for i in 0..action.bindings.len() {
                let binding = action.bindings[i];
                let Some(sample) = action.sample_track(binding.track_index) else {
                    continue;
                };
                let pose = poses.entry(binding.node).or_default();
                match sample {
                    ChannelSample::Translation(v) => {
                        let v = match shift {
                            Some((node, offset)) if node == binding.node => v + offset,
                            _ => v,
                        };
                        fold(&mut pose.position, v, weight);
                    }
                    ChannelSample::Rotation(q) => fold(&mut pose.rotation, q, weight),
                    ChannelSample::Scale(v) => fold(&mut pose.scale, v, weight),
                }
            }
        }

        for (&handle, rest) in &self.rest_pose {
            let Some(node) = scene.get_node_mut(handle) else {
                continue;
            };
            let pose = poses.remove(&handle).unwrap_or_default();
            node.transform.position = resolve(pose.position, rest.position);
            node.transform.rotation = resolve(pose.rotation, rest.rotation).normalize();
            node.transform.scale = resolve(pose.scale, rest.scale);
        }
    }
}
