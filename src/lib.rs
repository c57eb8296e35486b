#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod errors;
pub mod config;
pub mod scene;
pub mod animation;
pub mod motion;
pub mod fade;
pub mod picking;
pub mod camera_rig;
pub mod sequence;
pub mod actor;
pub mod assets;
pub mod ui;
pub mod render;
pub mod session;
pub mod app;
pub mod utils;

pub use errors::{Result, VignetteError};
pub use config::VignetteConfig;
pub use scene::{Camera, Node, NodeHandle, Scene};
pub use animation::{AnimationAction, AnimationClip, AnimationMixer, ClipPlaybackController, LoopMode};
pub use motion::MotionTrack;
pub use fade::{FadeController, FadeDirection};
pub use picking::PointerHitTester;
pub use camera_rig::CameraReturn;
pub use sequence::{Cue, SequenceDirector};
pub use actor::{Actor, ActorRole};
pub use assets::{ActorSource, PlaceholderSource, RigFileSource};
pub use render::{FrameRenderer, NullRenderer};
pub use session::{Command, SceneObject, SceneSession, SessionSnapshot};
pub use utils::orbit_control::OrbitControls;
