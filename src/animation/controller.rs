use std::sync::Arc;

use glam::Vec3;
use slotmap::SecondaryMap;
use smallvec::SmallVec;

use crate::animation::ActionHandle;
use crate::animation::action::{AnimationAction, LoopMode};
use crate::animation::binding::bind_clip;
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::AnimationMixer;
use crate::scene::{NodeHandle, Scene};

/// Observable state of one live clip instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipState {
    pub action: ActionHandle,
    pub clip_index: usize,
    pub clip: String,
    pub loop_mode: LoopMode,
    pub elapsed: f32,
    pub paused: bool,
    pub hold_last_frame: bool,
    pub weight: f32,
}

/// Continuations released by one controller update.
pub type Continuations<K> = SmallVec<[K; 2]>;

/// Clip playback for one actor.
///
/// Wraps an [`AnimationMixer`] and a single finish dispatcher. A continuation is keyed by
/// the [`ActionHandle`] of the playback it was registered for, so replacing the clip can
/// never fire (or lose) a continuation meant for a different instance:
/// - continuations of actions that finished are handed back by [`update`](Self::update),
/// - continuations of actions that were stopped first are discarded.
#[derive(Debug)]
pub struct ClipPlaybackController<K> {
    root: NodeHandle,
    clips: Vec<Arc<AnimationClip>>,
    mixer: AnimationMixer,

    current: Option<ActionHandle>,
    clip_of: SecondaryMap<ActionHandle, usize>,

    pending: SmallVec<[(ActionHandle, K); 2]>,
    ready: Continuations<K>,
}

impl<K> ClipPlaybackController<K> {
    #[must_use]
    pub fn new(root: NodeHandle, clips: Vec<Arc<AnimationClip>>) -> Self {
        Self {
            root,
            clips,
            mixer: AnimationMixer::new(),
            current: None,
            clip_of: SecondaryMap::new(),
            pending: SmallVec::new(),
            ready: SmallVec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    #[must_use]
    pub fn clips(&self) -> &[Arc<AnimationClip>] {
        &self.clips
    }

    #[must_use]
    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    #[must_use]
    pub fn current_action(&self) -> Option<ActionHandle> {
        self.current
    }

    #[must_use]
    pub fn current_clip_index(&self) -> Option<usize> {
        self.current.and_then(|h| self.clip_of.get(h).copied())
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub fn play(&mut self, scene: &Scene, index: usize, loop_mode: LoopMode) -> Option<ActionHandle> {
        self.play_at(scene, index, loop_mode, 0.0)
    }

    /// Replaces everything playing with a fresh instance of clip `index`, starting at `start_time`.
    ///
    /// Out-of-range indices log a warning and leave playback untouched.
    pub fn play_at(
        &mut self,
        scene: &Scene,
        index: usize,
        loop_mode: LoopMode,
        start_time: f32,
    ) -> Option<ActionHandle> {
        let action = self.instantiate(scene, index, loop_mode, start_time)?;
        self.stop_all();
        let handle = self.mixer.add_action(scene, action);
        self.clip_of.insert(handle, index);
        self.current = Some(handle);
        Some(handle)
    }

    pub fn cross_fade_to(
        &mut self,
        scene: &Scene,
        index: usize,
        loop_mode: LoopMode,
        duration: f32,
        warp: bool,
    ) -> Option<ActionHandle> {
        self.cross_fade_to_at(scene, index, loop_mode, duration, warp, 0.0)
    }

    /// Blends from the current clip into a fresh instance of clip `index` started at `start_time`.
    ///
    /// Without a current clip this is a plain [`play_at`](Self::play_at).
    pub fn cross_fade_to_at(
        &mut self,
        scene: &Scene,
        index: usize,
        loop_mode: LoopMode,
        duration: f32,
        warp: bool,
        start_time: f32,
    ) -> Option<ActionHandle> {
        let Some(from) = self.current.filter(|&h| self.mixer.contains(h)) else {
            return self.play_at(scene, index, loop_mode, start_time);
        };
        let action = self.instantiate(scene, index, loop_mode, start_time)?;
        let to = self.mixer.add_action(scene, action);
        self.clip_of.insert(to, index);
        self.mixer.cross_fade(from, to, duration, warp);
        self.current = Some(to);
        self.prune();
        Some(to)
    }

    /// Stops the current clip and drops its continuation.
    pub fn stop(&mut self) {
        if let Some(handle) = self.current.take() {
            self.mixer.stop(handle);
        }
        self.prune();
    }

    pub fn stop_all(&mut self) {
        self.mixer.stop_all();
        self.current = None;
        self.prune();
    }

    /// Registers `continuation` for the finish of `action`.
    ///
    /// Only live one-shot actions that have not finished yet can finish, so anything else
    /// is rejected with `false`. Registering twice for one action replaces the first.
    pub fn on_finished(&mut self, action: ActionHandle, continuation: K) -> bool {
        let accepts = self
            .mixer
            .action(action)
            .is_some_and(|a| a.loop_mode == LoopMode::Once && !a.is_finished());
        if !accepts {
            log::debug!("Finish continuation ignored for an action that cannot finish");
            return false;
        }
        self.pending.retain(|(h, _)| *h != action);
        self.pending.push((action, continuation));
        true
    }

    pub fn pause(&mut self) {
        if let Some(action) = self.current_mut() {
            action.paused = true;
        }
    }

    pub fn resume(&mut self) {
        if let Some(action) = self.current_mut()
            && !action.is_finished()
        {
            action.paused = false;
        }
    }

    pub fn set_time(&mut self, time: f32) {
        if let Some(action) = self.current_mut() {
            action.set_time(time);
        }
    }

    pub fn set_hold_last_frame(&mut self, hold: bool) {
        if let Some(action) = self.current_mut() {
            action.set_hold_last_frame(hold);
        }
    }

    /// Offsets what the current clip writes to `node`'s translation from now on.
    pub fn shift_translation(&mut self, node: NodeHandle, offset: Vec3) {
        if let Some(action) = self.current_mut() {
            action.root_shift = Some((node, offset));
        }
    }

    // ========================================================================
    // Frame update
    // ========================================================================

    /// Advances the mixer, applies the pose and returns the continuations whose actions
    /// finished (including any released by an earlier [`advance`](Self::advance)).
    pub fn update(&mut self, dt: f32, scene: &mut Scene) -> Continuations<K> {
        self.advance(dt, scene);
        std::mem::take(&mut self.ready)
    }

    /// Advances the mixer and applies the pose. Released continuations are kept for the
    /// next [`update`](Self::update).
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        for handle in self.mixer.update(dt, scene) {
            if let Some(pos) = self.pending.iter().position(|(h, _)| *h == handle) {
                let (_, continuation) = self.pending.remove(pos);
                self.ready.push(continuation);
            }
        }
        self.prune();
    }

    // ========================================================================
    // State
    // ========================================================================

    #[must_use]
    pub fn state(&self) -> Option<ClipState> {
        self.current.and_then(|h| self.state_of(h))
    }

    /// The current state, preceded by the fading-out one during a cross-fade.
    #[must_use]
    pub fn live_states(&self) -> SmallVec<[ClipState; 2]> {
        self.mixer
            .fading_out()
            .into_iter()
            .chain(self.current)
            .filter_map(|h| self.state_of(h))
            .collect()
    }

    fn state_of(&self, handle: ActionHandle) -> Option<ClipState> {
        let action = self.mixer.action(handle)?;
        Some(ClipState {
            action: handle,
            clip_index: self.clip_of.get(handle).copied().unwrap_or_default(),
            clip: action.clip().name.clone(),
            loop_mode: action.loop_mode,
            elapsed: action.time,
            paused: action.paused,
            hold_last_frame: action.hold_last_frame,
            weight: action.weight,
        })
    }

    fn current_mut(&mut self) -> Option<&mut AnimationAction> {
        self.current.and_then(|h| self.mixer.action_mut(h))
    }

    fn instantiate(&self, scene: &Scene, index: usize, loop_mode: LoopMode, start_time: f32) -> Option<AnimationAction> {
        let Some(clip) = self.clips.get(index) else {
            log::warn!("Clip index {index} out of range ({} clips)", self.clips.len());
            return None;
        };
        let bindings = bind_clip(scene, self.root, clip);
        let mut action = AnimationAction::new(Arc::clone(clip))
            .with_bindings(bindings)
            .with_loop_mode(loop_mode);
        action.restart_at(start_time);
        Some(action)
    }

    /// Drops continuations and bookkeeping of actions no longer in the mixer.
    fn prune(&mut self) {
        let mixer = &self.mixer;
        self.pending.retain(|(h, _)| mixer.contains(*h));
        self.clip_of.retain(|h, _| mixer.contains(h));
    }
}
