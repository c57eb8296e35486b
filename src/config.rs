//! Vignette configuration.
//!
//! Every timing constant, spawn pose and clip-index convention of the vignette lives
//! here rather than in control flow. All fields carry serde defaults, so an empty JSON
//! object (or a missing file, via [`VignetteConfig::load_or_default`]) yields the
//! stock setup.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::Deserialize;

use crate::errors::Result;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct VignetteConfig {
    pub sequence: SequenceConfig,
    pub kicker: ActorConfig,
    pub keeper: ActorConfig,
    pub ball: BallConfig,
    pub camera: CameraConfig,
    pub ui: UiConfig,
}

/// Offsets and durations of the scripted sequence, in seconds.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SequenceConfig {
    /// Offset of the ball launch / keeper reaction after sequence start.
    pub launch_offset_secs: f32,
    /// Nominal length of the sequence. Only used for overrun diagnostics.
    pub nominal_end_secs: f32,
    /// Delay between the kicker's strike and the ball launch for a lone kick.
    pub kick_to_flight_secs: f32,
    /// Actor visibility fade duration.
    pub fade_secs: f32,
    /// Delay between the celebration cross-fade and the restart prompt.
    pub prompt_delay_secs: f32,
    /// Start offset into the successor clip after a position hand-off.
    pub handoff_seek_secs: f32,
    /// Cross-fade length used by position hand-offs.
    pub handoff_fade_secs: f32,
    /// Cross-fade length into the looping celebration.
    pub celebrate_fade_secs: f32,
    /// Yaw applied to the keeper while it is invisible, before the recovery clip.
    pub recover_yaw: f32,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            launch_offset_secs: 0.8,
            nominal_end_secs: 3.0,
            kick_to_flight_secs: 0.8,
            fade_secs: 0.3,
            prompt_delay_secs: 0.5,
            handoff_seek_secs: 0.1,
            handoff_fade_secs: 0.2,
            celebrate_fade_secs: 0.4,
            recover_yaw: std::f32::consts::PI,
        }
    }
}

/// Name keywords and fallback indices used to map an intent onto a clip.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClipIntentRule {
    pub keywords: Vec<String>,
    pub fallback_index: usize,
}

impl ClipIntentRule {
    fn new(keywords: &[&str], fallback_index: usize) -> Self {
        Self {
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            fallback_index,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClipIntents {
    pub idle: ClipIntentRule,
    pub strike: ClipIntentRule,
    pub save: ClipIntentRule,
    pub recover: ClipIntentRule,
    pub celebrate: ClipIntentRule,
}

impl Default for ClipIntents {
    fn default() -> Self {
        Self {
            idle: ClipIntentRule::new(&["idle", "stand"], 0),
            strike: ClipIntentRule::new(&["kick", "shoot", "strike"], 1),
            save: ClipIntentRule::new(&["save", "dive", "block"], 2),
            recover: ClipIntentRule::new(&["recover", "getup", "turn"], 3),
            celebrate: ClipIntentRule::new(&["celebrate", "dance", "cheer"], 4),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ActorConfig {
    pub spawn_position: Vec3,
    pub spawn_yaw: f32,
    /// Joint whose world position is the actor's effective location after a clip.
    pub anchor_joint: String,
    pub intents: ClipIntents,
    /// Clip indices that repeat when selected directly.
    pub looping_clips: Vec<usize>,
    /// Clip indices that freeze on their last frame instead of returning to idle.
    pub hold_clips: Vec<usize>,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            spawn_position: Vec3::ZERO,
            spawn_yaw: 0.0,
            anchor_joint: "Hips".to_string(),
            intents: ClipIntents::default(),
            looping_clips: vec![0, 4],
            hold_clips: vec![2],
        }
    }
}

impl ActorConfig {
    #[must_use]
    pub fn kicker() -> Self {
        Self {
            spawn_position: Vec3::new(0.0, 0.0, 4.0),
            spawn_yaw: std::f32::consts::PI,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn keeper() -> Self {
        Self {
            spawn_position: Vec3::new(0.0, 0.0, -6.0),
            spawn_yaw: 0.0,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub spawn_position: Vec3,
    pub target_position: Vec3,
    pub flight_secs: f32,
    pub peak_height: f32,
    /// Roll applied on every sampled frame of the flight (radians).
    pub spin_per_frame: f32,
    pub radius: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            spawn_position: Vec3::new(0.0, 0.11, 3.0),
            target_position: Vec3::new(1.2, 0.11, -6.5),
            flight_secs: 1.0,
            peak_height: 1.5,
            spin_per_frame: 0.1,
            radius: 0.11,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub default_position: Vec3,
    pub default_target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub return_secs: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_position: Vec3::new(6.0, 4.0, 9.0),
            default_target: Vec3::new(0.0, 1.0, -1.0),
            fov: 50.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 200.0,
            return_secs: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub start_prompt_position: Vec3,
    pub restart_prompt_position: Vec3,
    pub pulse_secs: f32,
    pub pulse_scale: f32,
    pub bob_amplitude: f32,
    pub bob_speed: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            start_prompt_position: Vec3::new(0.0, 2.6, 1.0),
            restart_prompt_position: Vec3::new(0.0, 2.6, 1.0),
            pulse_secs: 0.2,
            pulse_scale: 0.85,
            bob_amplitude: 0.08,
            bob_speed: 2.0,
        }
    }
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            sequence: SequenceConfig::default(),
            kicker: ActorConfig::kicker(),
            keeper: ActorConfig::keeper(),
            ball: BallConfig::default(),
            camera: CameraConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl VignetteConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Config load error for {}: {err}. Falling back to defaults.", path.display());
                Self::default()
            }
        }
    }
}
