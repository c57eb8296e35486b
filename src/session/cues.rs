//! Cue execution.
//!
//! Every handler re-checks its preconditions (actor still in the scene, ball at rest)
//! because a cue can arrive after the state it was scheduled for has moved on.

use crate::actor::reactor::{self, Successor};
use crate::actor::{ActorRole, ClipIntent};
use crate::animation::LoopMode;
use crate::fade::FadeDirection;
use crate::sequence::Cue;
use crate::session::SceneSession;

impl SceneSession {
    pub(super) fn run_cue(&mut self, cue: Cue, now: f32) {
        log::debug!("Cue {cue:?} at {now:.3}s");
        match cue {
            Cue::KickerStrike => self.kicker_strike(now),
            Cue::LaunchAndReact => {
                self.launch_ball(now);
                self.keeper_save(now);
            }
            Cue::LaunchBall => {
                if !self.launch_ball(now) {
                    self.kick_in_flight = false;
                }
            }
            Cue::KickerFinished => {
                let successor = self.idle_successor(ActorRole::Kicker);
                self.hand_off(ActorRole::Kicker, Some(successor));
            }
            Cue::KeeperSaveFinished => self.keeper_save_finished(now),
            Cue::KeeperHidden => self.keeper_hidden(now),
            Cue::KeeperRecovered => self.keeper_recovered(now),
            Cue::ShowPrompt => {
                self.fade_node(self.props.restart_prompt, FadeDirection::In, now);
                self.director.finish(now);
            }
            Cue::ClipFinished { actor, index } => {
                let successor = if self.actor(actor).library.holds(index) {
                    None
                } else {
                    Some(self.idle_successor(actor))
                };
                self.hand_off(actor, successor);
            }
        }
    }

    fn alive(&self, role: ActorRole) -> bool {
        let alive = self.actor(role).is_alive(&self.scene);
        if !alive {
            log::debug!("{} is gone, cue skipped", role.label());
        }
        alive
    }

    fn hand_off(&mut self, role: ActorRole, successor: Option<Successor>) {
        if !self.alive(role) {
            return;
        }
        let sequence = self.config.sequence.clone();
        let (scene, actor) = self.split(role);
        reactor::hand_off(scene, actor, successor, &sequence);
    }

    /// A step whose clip could not start still owes the rest of the chain its
    /// continuation; it runs on the next tick as if the clip had ended at once.
    fn continue_without_clip(&mut self, role: ActorRole, then: Cue, now: f32) {
        log::warn!("{} clip unavailable, continuing with {then:?}", role.label());
        self.director.schedule(now, then);
    }

    pub(super) fn kicker_strike(&mut self, now: f32) {
        if !self.alive(ActorRole::Kicker) {
            return;
        }
        let (scene, kicker) = self.split(ActorRole::Kicker);
        reactor::reroot_if_held(scene, kicker);
        match kicker.play_intent(scene, ClipIntent::Strike, LoopMode::Once) {
            Some(strike) => {
                kicker.controller.on_finished(strike, Cue::KickerFinished);
            }
            None => self.continue_without_clip(ActorRole::Kicker, Cue::KickerFinished, now),
        }
    }

    fn keeper_save(&mut self, now: f32) {
        if !self.alive(ActorRole::Keeper) {
            return;
        }
        let (scene, keeper) = self.split(ActorRole::Keeper);
        reactor::reroot_if_held(scene, keeper);
        match keeper.play_intent(scene, ClipIntent::Save, LoopMode::Once) {
            Some(save) => {
                keeper.controller.on_finished(save, Cue::KeeperSaveFinished);
            }
            None => self.continue_without_clip(ActorRole::Keeper, Cue::KeeperSaveFinished, now),
        }
    }

    /// Freezes the dive and fades the keeper out.
    fn keeper_save_finished(&mut self, now: f32) {
        if !self.alive(ActorRole::Keeper) {
            return;
        }
        self.keeper.controller.set_hold_last_frame(true);
        let surfaces = self.keeper.surfaces.clone();
        self.fades.run(
            &mut self.scene,
            self.keeper.root,
            &surfaces,
            FadeDirection::Out,
            self.config.sequence.fade_secs,
            now,
            Some(Cue::KeeperHidden),
        );
    }

    /// Turns the invisible keeper around into its recovery clip, anchored where the dive
    /// ended, and fades it back in.
    fn keeper_hidden(&mut self, now: f32) {
        if !self.alive(ActorRole::Keeper) {
            return;
        }
        let yaw = self.config.sequence.recover_yaw;
        let (scene, keeper) = self.split(ActorRole::Keeper);
        let index = keeper.library.index(ClipIntent::Recover);
        match reactor::swap_with_correction(scene, keeper, index, LoopMode::Once, yaw) {
            Some(recover) => {
                keeper.controller.on_finished(recover, Cue::KeeperRecovered);
            }
            None => self.continue_without_clip(ActorRole::Keeper, Cue::KeeperRecovered, now),
        }

        let surfaces = self.keeper.surfaces.clone();
        self.fades.run(
            &mut self.scene,
            self.keeper.root,
            &surfaces,
            FadeDirection::In,
            self.config.sequence.fade_secs,
            now,
            None,
        );
    }

    fn keeper_recovered(&mut self, now: f32) {
        if !self.alive(ActorRole::Keeper) {
            return;
        }
        let fade = self.config.sequence.celebrate_fade_secs;
        let (scene, keeper) = self.split(ActorRole::Keeper);
        let celebrate = Successor {
            index: keeper.library.index(ClipIntent::Celebrate),
            loop_mode: LoopMode::Loop,
        };
        reactor::blend_into(scene, keeper, celebrate, fade, 0.0);

        self.director
            .schedule(now + self.config.sequence.prompt_delay_secs, Cue::ShowPrompt);
    }
}
