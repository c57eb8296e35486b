use std::sync::Arc;

use glam::Vec3;

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::{AnimationClip, ChannelSample};
use crate::animation::tracks::KeyframeCursor;
use crate::scene::NodeHandle;

/// How far before the clip end a held one-shot is pinned, in seconds.
pub const HOLD_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopMode {
    Once,
    Loop,
}

/// One playback of a clip.
///
/// Each `play` builds a fresh action, so its [`ActionHandle`](super::ActionHandle) names a
/// single playback and never a clip. A one-shot reports its finish exactly once.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,
    pub bindings: Vec<PropertyBinding>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,
    /// A finished one-shot stays applied at `duration - HOLD_EPSILON`.
    pub hold_last_frame: bool,
    /// Offset added to every translation sample this action writes to the node.
    pub root_shift: Option<(NodeHandle, Vec3)>,

    finished: bool,
    cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let cursors = vec![KeyframeCursor::default(); clip.tracks.len()];
        Self {
            clip,
            bindings: Vec::new(),
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            hold_last_frame: false,
            root_shift: None,
            finished: false,
            cursors,
        }
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: Vec<PropertyBinding>) -> Self {
        self.bindings = bindings;
        self
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Contributes to the pose this frame.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.enabled && self.weight > 0.0
    }

    fn duration(&self) -> f32 {
        self.clip.duration.max(0.0)
    }

    fn held_time(&self) -> f32 {
        (self.duration() - HOLD_EPSILON).max(0.0)
    }

    /// Plays again from `start_time`; the finish fires anew.
    pub fn restart_at(&mut self, start_time: f32) {
        self.time = start_time.clamp(0.0, self.duration());
        self.paused = false;
        self.enabled = true;
        self.finished = false;
        self.cursors.fill(KeyframeCursor::default());
    }

    /// Seeks. Looping actions wrap, one-shots clamp.
    pub fn set_time(&mut self, time: f32) {
        let duration = self.duration();
        self.time = if self.loop_mode == LoopMode::Loop && duration > 0.0 {
            time.rem_euclid(duration)
        } else {
            time.clamp(0.0, duration)
        };
    }

    /// Turning hold on for an action that already finished puts its last frame back on.
    pub fn set_hold_last_frame(&mut self, hold: bool) {
        self.hold_last_frame = hold;
        if hold && self.finished {
            self.time = self.held_time();
            self.enabled = true;
        }
    }

    /// Moves the playhead by `dt`. Returns `true` on the one update where a one-shot ends.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.finished || self.paused || !self.enabled {
            return false;
        }
        let duration = self.duration();

        if self.loop_mode == LoopMode::Loop {
            if duration > 0.0 {
                self.time = (self.time + dt * self.time_scale).rem_euclid(duration);
            }
            return false;
        }

        self.time += dt * self.time_scale;
        if self.time >= duration {
            self.time = if self.hold_last_frame { self.held_time() } else { duration };
            self.finished = true;
            self.paused = true;
            return true;
        }
        if self.time < 0.0 {
            self.time = 0.0;
            self.paused = true;
        }
        false
    }

    /// The value of track `track_index` at the playhead.
    pub fn sample_track(&mut self, track_index: usize) -> Option<ChannelSample> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.cursors.get_mut(track_index)?;
        track.sample(self.time, cursor)
    }
}
