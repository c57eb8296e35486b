//! Actor rigs and static props.
//!
//! An [`ActorSource`] adds one actor's node subtree to the scene and hands back its root
//! and clip list. Sources that fail are replaced by the procedural
//! [`PlaceholderSource`] through [`load_or_placeholder`], so a session always has both
//! actors.

pub mod placeholder;
pub mod props;
pub mod rig;

pub use placeholder::PlaceholderSource;
pub use props::{Props, spawn_props};
pub use rig::RigFileSource;

use std::sync::Arc;

use crate::actor::ActorRole;
use crate::animation::AnimationClip;
use crate::errors::Result;
use crate::scene::{NodeHandle, Scene};

/// A rig added to the scene, with the clips authored for it.
#[derive(Debug, Clone)]
pub struct LoadedActor {
    pub root: NodeHandle,
    pub clips: Vec<Arc<AnimationClip>>,
}

pub trait ActorSource {
    /// Adds the rig for `role` to `scene`. A failing source must leave the scene untouched.
    fn load(&mut self, scene: &mut Scene, role: ActorRole) -> Result<LoadedActor>;
}

/// Loads `role` from `source`, falling back to a placeholder rig of the same role.
pub fn load_or_placeholder(source: &mut dyn ActorSource, scene: &mut Scene, role: ActorRole) -> LoadedActor {
    match source.load(scene, role) {
        Ok(actor) => {
            log::info!("Loaded {} rig with {} clip(s)", role.label(), actor.clips.len());
            actor
        }
        Err(err) => {
            log::warn!("{} rig failed to load: {err}. Using a placeholder.", role.label());
            PlaceholderSource::build(scene, role)
        }
    }
}
