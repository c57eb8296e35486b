use glam::{Quat, Vec3};

use crate::animation::tracks::{KeyframeCursor, KeyframeTrack};

/// Keyframes for one transform channel.
#[derive(Debug, Clone)]
pub enum Channel {
    Translation(KeyframeTrack<Vec3>),
    Rotation(KeyframeTrack<Quat>),
    Scale(KeyframeTrack<Vec3>),
}

/// A channel sampled at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelSample {
    Translation(Vec3),
    Rotation(Quat),
    Scale(Vec3),
}

/// One channel of one node, addressed by the node's name below the actor root.
#[derive(Debug, Clone)]
pub struct Track {
    pub node_name: String,
    pub channel: Channel,
}

impl Track {
    #[must_use]
    pub fn translation(node_name: &str, keys: KeyframeTrack<Vec3>) -> Self {
        Self::on(node_name, Channel::Translation(keys))
    }

    #[must_use]
    pub fn rotation(node_name: &str, keys: KeyframeTrack<Quat>) -> Self {
        Self::on(node_name, Channel::Rotation(keys))
    }

    #[must_use]
    pub fn scale(node_name: &str, keys: KeyframeTrack<Vec3>) -> Self {
        Self::on(node_name, Channel::Scale(keys))
    }

    fn on(node_name: &str, channel: Channel) -> Self {
        Self {
            node_name: node_name.to_owned(),
            channel,
        }
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        match &self.channel {
            Channel::Translation(keys) | Channel::Scale(keys) => keys.duration(),
            Channel::Rotation(keys) => keys.duration(),
        }
    }

    pub fn sample(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<ChannelSample> {
        match &self.channel {
            Channel::Translation(keys) => keys.sample_with_cursor(time, cursor).map(ChannelSample::Translation),
            Channel::Rotation(keys) => keys.sample_with_cursor(time, cursor).map(ChannelSample::Rotation),
            Channel::Scale(keys) => keys.sample_with_cursor(time, cursor).map(ChannelSample::Scale),
        }
    }
}

/// A named, pre-authored motion. Lasts until its latest keyframe.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks.iter().map(Track::duration).fold(0.0, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }
}
