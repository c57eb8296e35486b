//! Clip animation: keyframe tracks, per-playback actions, a blending mixer and the
//! per-actor playback controller built on top of it.

pub mod values;
pub mod action;
pub mod binding;
pub mod clip;
pub mod controller;
pub mod mixer;
pub mod tracks;

pub use action::{AnimationAction, HOLD_EPSILON, LoopMode};
pub use binding::{PropertyBinding, bind_clip};
pub use clip::{AnimationClip, Channel, ChannelSample, Track};
pub use controller::{ClipPlaybackController, ClipState, Continuations};
pub use mixer::{AnimationMixer, FinishedActions};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;

use slotmap::new_key_type;

new_key_type! {
    /// Identifies one playback instance inside an [`AnimationMixer`].
    pub struct ActionHandle;
}
