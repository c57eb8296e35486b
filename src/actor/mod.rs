//! The two animated characters of the vignette.

pub mod reactor;

use glam::Vec3;

use crate::animation::{ActionHandle, ClipPlaybackController, LoopMode};
use crate::assets::LoadedActor;
use crate::config::{ActorConfig, ClipIntentRule};
use crate::scene::{NodeHandle, Scene, SurfaceKey};
use crate::sequence::Cue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorRole {
    Kicker,
    Keeper,
}

impl ActorRole {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ActorRole::Kicker => "kicker",
            ActorRole::Keeper => "keeper",
        }
    }

    /// Name given to the rig's root node.
    #[must_use]
    pub fn node_name(self) -> &'static str {
        match self {
            ActorRole::Kicker => "Kicker",
            ActorRole::Keeper => "Keeper",
        }
    }
}

/// What a clip is used for, independent of how the asset names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipIntent {
    Idle,
    Strike,
    Save,
    Recover,
    Celebrate,
}

/// Clip indices resolved for each intent, plus the per-index playback rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipLibrary {
    idle: usize,
    strike: usize,
    save: usize,
    recover: usize,
    celebrate: usize,
    looping: Vec<usize>,
    hold: Vec<usize>,
}

/// First clip whose lowercase name contains one of the rule's keywords, else the
/// fallback index.
fn resolve_intent(names: &[&str], rule: &ClipIntentRule, role: ActorRole, intent: ClipIntent) -> usize {
    let found = names.iter().position(|name| {
        let name = name.to_lowercase();
        rule.keywords.iter().any(|k| name.contains(&k.to_lowercase()))
    });
    found.unwrap_or_else(|| {
        log::warn!(
            "No {} clip matches {intent:?} ({:?}); falling back to index {}",
            role.label(),
            rule.keywords,
            rule.fallback_index
        );
        rule.fallback_index
    })
}

impl ClipLibrary {
    #[must_use]
    pub fn resolve(names: &[&str], config: &ActorConfig, role: ActorRole) -> Self {
        let intents = &config.intents;
        Self {
            idle: resolve_intent(names, &intents.idle, role, ClipIntent::Idle),
            strike: resolve_intent(names, &intents.strike, role, ClipIntent::Strike),
            save: resolve_intent(names, &intents.save, role, ClipIntent::Save),
            recover: resolve_intent(names, &intents.recover, role, ClipIntent::Recover),
            celebrate: resolve_intent(names, &intents.celebrate, role, ClipIntent::Celebrate),
            looping: config.looping_clips.clone(),
            hold: config.hold_clips.clone(),
        }
    }

    #[must_use]
    pub fn index(&self, intent: ClipIntent) -> usize {
        match intent {
            ClipIntent::Idle => self.idle,
            ClipIntent::Strike => self.strike,
            ClipIntent::Save => self.save,
            ClipIntent::Recover => self.recover,
            ClipIntent::Celebrate => self.celebrate,
        }
    }

    /// Loop mode of a directly selected clip.
    #[must_use]
    pub fn loop_mode_for(&self, index: usize) -> LoopMode {
        if self.looping.contains(&index) {
            LoopMode::Loop
        } else {
            LoopMode::Once
        }
    }

    /// Whether a directly selected one-shot clip freezes on its last frame.
    #[must_use]
    pub fn holds(&self, index: usize) -> bool {
        self.hold.contains(&index)
    }
}

/// A loaded character: its node subtree, surfaces, anchor joint and clip playback.
#[derive(Debug)]
pub struct Actor {
    pub role: ActorRole,
    pub root: NodeHandle,
    /// Joint read for position hand-offs; absent rigs skip the correction.
    pub anchor: Option<NodeHandle>,
    pub surfaces: Vec<SurfaceKey>,
    pub controller: ClipPlaybackController<Cue>,
    pub library: ClipLibrary,
    pub spawn_position: Vec3,
    pub spawn_yaw: f32,
}

impl Actor {
    /// Wraps a loaded rig, placing it at its spawn pose.
    #[must_use]
    pub fn new(scene: &mut Scene, role: ActorRole, loaded: LoadedActor, config: &ActorConfig) -> Self {
        let names: Vec<&str> = loaded.clips.iter().map(|c| c.name.as_str()).collect();
        let library = ClipLibrary::resolve(&names, config, role);

        let anchor = scene.find_by_name(loaded.root, &config.anchor_joint);
        if anchor.is_none() {
            log::warn!(
                "{} rig has no '{}' joint; position hand-offs are disabled",
                role.label(),
                config.anchor_joint
            );
        }

        let actor = Self {
            role,
            root: loaded.root,
            anchor,
            surfaces: scene.surfaces_under(loaded.root),
            controller: ClipPlaybackController::new(loaded.root, loaded.clips),
            library,
            spawn_position: config.spawn_position,
            spawn_yaw: config.spawn_yaw,
        };
        actor.place_at_spawn(scene);
        actor
    }

    pub fn place_at_spawn(&self, scene: &mut Scene) {
        if let Some(node) = scene.get_node_mut(self.root) {
            node.transform.position = self.spawn_position;
            node.transform.set_yaw(self.spawn_yaw);
        }
        scene.update_subtree(self.root);
    }

    pub fn play_intent(&mut self, scene: &Scene, intent: ClipIntent, loop_mode: LoopMode) -> Option<ActionHandle> {
        self.controller.play(scene, self.library.index(intent), loop_mode)
    }

    /// Starts the looping idle clip.
    pub fn play_default(&mut self, scene: &Scene) -> Option<ActionHandle> {
        self.play_intent(scene, ClipIntent::Idle, LoopMode::Loop)
    }

    /// The actor is still part of the scene.
    #[must_use]
    pub fn is_alive(&self, scene: &Scene) -> bool {
        scene.contains(self.root)
    }

    #[must_use]
    pub fn is_visible(&self, scene: &Scene) -> bool {
        scene.get_node(self.root).is_some_and(|n| n.visible)
    }

    #[must_use]
    pub fn position(&self, scene: &Scene) -> Option<Vec3> {
        scene.get_node(self.root).map(|n| n.transform.position)
    }
}
