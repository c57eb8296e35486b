//! The scene session: one explicit context owning everything the vignette mutates.
//!
//! A session is driven from outside by [`SceneSession::tick`] (or
//! [`tick_with_input`](SceneSession::tick_with_input)) and by commands. Deferred work only
//! ever goes through the director's timer queue, the clip controllers' finish
//! continuations and the fade controller's completions, all of which resolve to a
//! [`Cue`] that the session executes.

mod cues;
pub mod commands;

pub use commands::{Command, SceneObject, default_key_map};

use glam::{Quat, Vec2, Vec3};

use crate::actor::reactor::{self, Successor};
use crate::actor::{Actor, ActorRole, ClipIntent};
use crate::animation::{ActionHandle, LoopMode};
use crate::app::input::{Input, Key};
use crate::assets::{ActorSource, Props, load_or_placeholder, spawn_props};
use crate::camera_rig::{CameraPose, CameraReturn};
use crate::config::VignetteConfig;
use crate::errors::{Result, VignetteError};
use crate::fade::{FadeController, FadeDirection};
use crate::motion::MotionTrack;
use crate::picking::PointerHitTester;
use crate::render::FrameRenderer;
use crate::scene::{NodeHandle, Scene, SceneState};
use crate::sequence::{Cue, SequenceDirector};
use crate::ui::{FloatingButton, Prompts};
use crate::utils::{FrameClock, OrbitControls};

/// Comparable summary of a session's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub scene: SceneState,
    pub sequence_running: bool,
    pub pending_cues: usize,
    pub flight_active: bool,
    pub kick_in_flight: bool,
    pub active_fades: usize,
    pub kicker_clip: Option<usize>,
    pub keeper_clip: Option<usize>,
}

#[derive(Debug)]
pub struct SceneSession {
    config: VignetteConfig,
    scene: Scene,
    kicker: Actor,
    keeper: Actor,
    props: Props,
    prompts: Prompts,

    director: SequenceDirector,
    fades: FadeController<Cue>,
    hit_tester: PointerHitTester,
    camera_return: CameraReturn,
    orbit: OrbitControls,
    clock: FrameClock,

    flight: Option<MotionTrack>,
    kick_in_flight: bool,
    screen: Vec2,

    initial: Option<SessionSnapshot>,
}

impl SceneSession {
    /// Builds the scene, loads both actors (placeholders on failure) and starts their idle
    /// clips. The state at the end of construction is what [`reset`](Self::reset) returns to.
    pub fn new(config: VignetteConfig, source: &mut dyn ActorSource) -> Self {
        let mut scene = Scene::new();

        let kicker = load_or_placeholder(source, &mut scene, ActorRole::Kicker);
        let kicker = Actor::new(&mut scene, ActorRole::Kicker, kicker, &config.kicker);
        let keeper = load_or_placeholder(source, &mut scene, ActorRole::Keeper);
        let keeper = Actor::new(&mut scene, ActorRole::Keeper, keeper, &config.keeper);

        let props = spawn_props(&mut scene, &config);
        let float = |node, base_position, phase| FloatingButton {
            node,
            base_position,
            amplitude: config.ui.bob_amplitude,
            speed: config.ui.bob_speed,
            phase,
        };
        let prompts = Prompts {
            start: float(props.start_prompt, config.ui.start_prompt_position, 0.0),
            restart: float(props.restart_prompt, config.ui.restart_prompt_position, 0.0),
        };

        let home = CameraPose {
            position: config.camera.default_position,
            target: config.camera.default_target,
        };
        let screen = Vec2::new(1280.0, 1280.0 / config.camera.aspect.max(1e-3));

        let mut session = Self {
            director: SequenceDirector::new(&config.sequence),
            fades: FadeController::new(),
            hit_tester: PointerHitTester::new(&config.ui),
            camera_return: CameraReturn::new(home, config.camera.return_secs),
            orbit: OrbitControls::from_pose(home.position, home.target),
            clock: FrameClock::new(),
            flight: None,
            kick_in_flight: false,
            screen,
            initial: None,
            config,
            scene,
            kicker,
            keeper,
            props,
            prompts,
        };

        session.kicker.play_default(&session.scene);
        session.keeper.play_default(&session.scene);
        session.scene.update_matrix_world();
        session.initial = Some(session.snapshot());
        log::info!("Session ready with {} node(s)", session.scene.nodes.len());
        session
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &VignetteConfig {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn actor(&self, role: ActorRole) -> &Actor {
        match role {
            ActorRole::Kicker => &self.kicker,
            ActorRole::Keeper => &self.keeper,
        }
    }

    /// The scene and one actor, borrowed together.
    fn split(&mut self, role: ActorRole) -> (&mut Scene, &mut Actor) {
        let actor = match role {
            ActorRole::Kicker => &mut self.kicker,
            ActorRole::Keeper => &mut self.keeper,
        };
        (&mut self.scene, actor)
    }

    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    #[must_use]
    pub fn director(&self) -> &SequenceDirector {
        &self.director
    }

    #[must_use]
    pub fn flight(&self) -> Option<&MotionTrack> {
        self.flight.as_ref()
    }

    #[must_use]
    pub fn is_kick_in_flight(&self) -> bool {
        self.kick_in_flight
    }

    #[must_use]
    pub fn is_camera_returning(&self) -> bool {
        self.camera_return.is_active()
    }

    /// Session time in seconds.
    #[must_use]
    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    #[must_use]
    pub fn screen_size(&self) -> Vec2 {
        self.screen
    }

    /// The snapshot taken at the end of construction.
    #[must_use]
    pub fn initial_snapshot(&self) -> Option<&SessionSnapshot> {
        self.initial.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            scene: self.scene.capture_state(),
            sequence_running: self.director.is_running(),
            pending_cues: self.director.pending(),
            flight_active: self.flight.is_some(),
            kick_in_flight: self.kick_in_flight,
            active_fades: self.fades.active_count(),
            kicker_clip: self.kicker.controller.current_clip_index(),
            keeper_clip: self.keeper.controller.current_clip_index(),
        }
    }

    pub fn set_screen_size(&mut self, size: Vec2) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        self.screen = size;
        if let Some((_, camera)) = self.scene.query_main_camera_bundle() {
            camera.set_aspect(size.x / size.y);
        }
    }

    // ========================================================================
    // Frame tick
    // ========================================================================

    pub fn tick(&mut self, dt: f32, renderer: &mut dyn FrameRenderer) {
        self.frame(dt, None, renderer);
    }

    /// Dispatches this frame's keys and taps, then ticks with orbit input applied.
    pub fn tick_with_input(&mut self, dt: f32, input: &Input, renderer: &mut dyn FrameRenderer) {
        self.handle_input(input);
        self.frame(dt, Some(input), renderer);
    }

    fn frame(&mut self, dt: f32, input: Option<&Input>, renderer: &mut dyn FrameRenderer) {
        let dt = self.clock.advance(dt);
        let now = self.clock.now();

        for cue in self.director.due(now) {
            self.run_cue(cue, now);
        }

        self.update_camera(input, dt, now);

        for cue in self.kicker.controller.update(dt, &mut self.scene) {
            self.run_cue(cue, now);
        }
        for cue in self.keeper.controller.update(dt, &mut self.scene) {
            self.run_cue(cue, now);
        }

        self.update_flight(now);

        for cue in self.fades.update(&mut self.scene, now) {
            self.run_cue(cue, now);
        }

        for pick in self.hit_tester.update(&mut self.scene, now) {
            if pick.fade_on_click {
                self.fade_node(pick.node, FadeDirection::Out, now);
            }
            self.execute(pick.action.into());
        }
        let tester = &self.hit_tester;
        self.prompts.float(&mut self.scene, now, |node| tester.is_pulsing(node));

        self.scene.update_matrix_world();

        if let Some((node, camera)) = self.scene.main_camera() {
            renderer.render(&self.scene, camera, node.world_matrix());
        }
    }

    fn update_camera(&mut self, input: Option<&Input>, dt: f32, now: f32) {
        if let Some(input) = input
            && OrbitControls::is_user_active(input)
            && self.camera_return.is_active()
        {
            log::debug!("Camera return cancelled by user input");
            self.camera_return.cancel();
        }

        if let Some(pose) = self.camera_return.update(now) {
            if let Some((transform, _)) = self.scene.query_main_camera_bundle() {
                transform.position = pose.position;
                transform.look_at(pose.target, Vec3::Y);
            }
            self.orbit.set_pose(pose.position, pose.target);
            return;
        }

        if let Some(input) = input {
            let fov = self.config.camera.fov;
            if let Some((transform, _)) = self.scene.query_main_camera_bundle() {
                self.orbit.update(transform, input, fov, dt);
            }
        }
    }

    fn update_flight(&mut self, now: f32) {
        let Some(track) = self.flight.as_mut() else {
            return;
        };
        let sample = track.sample(now);
        if let Some(ball) = self.scene.get_node_mut(self.props.ball) {
            ball.transform.position = sample.position;
            ball.transform.rotation *= Quat::from_rotation_x(sample.rotation_delta);
        }
        if track.poll_completion(now) {
            log::debug!("Ball landed at {}", sample.position);
            self.flight = None;
            self.kick_in_flight = false;
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Runs the default key binding of `key`. Returns whether a command ran.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match default_key_map(key) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    /// Clicks whatever button is under `pointer` (window pixels). Returns whether a
    /// button started its pulse.
    pub fn handle_pointer(&mut self, pointer: Vec2) -> bool {
        self.scene.update_matrix_world();
        let now = self.clock.now();
        match self.hit_tester.click(&self.scene, pointer, self.screen, now) {
            Some(pick) => {
                log::debug!("Clicked {:?} at {:.2} units", pick.action, pick.distance);
                true
            }
            None => false,
        }
    }

    pub fn handle_input(&mut self, input: &Input) {
        if input.screen_size() != self.screen && input.screen_size() != Vec2::ZERO {
            self.set_screen_size(input.screen_size());
        }
        for &key in input.keys_down() {
            self.handle_key(key);
        }
        for &tap in input.taps() {
            self.handle_pointer(tap);
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Runs `command`. Returns `false` when it was a no-op.
    pub fn execute(&mut self, command: Command) -> bool {
        log::debug!("Command {command:?}");
        let now = self.clock.now();
        match command {
            Command::ToggleVisibility(object) => self.toggle_visibility(object, now),
            Command::Kick => self.kick(now),
            Command::StartSequence => self.start_sequence(now),
            Command::PlayClip { actor, index } => match self.play_clip(actor, index) {
                Ok(_) => true,
                Err(err) => {
                    log::warn!("{err}");
                    false
                }
            },
            Command::Reset => {
                self.reset();
                true
            }
            Command::RecenterCamera => self.recenter_camera(now),
        }
    }

    fn object_node(&self, object: SceneObject) -> NodeHandle {
        match object {
            SceneObject::Kicker => self.kicker.root,
            SceneObject::Keeper => self.keeper.root,
            SceneObject::Ball => self.props.ball,
            SceneObject::Goal => self.props.goal,
        }
    }

    fn toggle_visibility(&mut self, object: SceneObject, now: f32) -> bool {
        let node = self.object_node(object);
        if !self.scene.contains(node) {
            return false;
        }
        // The toggle ends the fade early, but whatever waited on it still runs.
        if let Some(cue) = self.fades.interrupt(node) {
            log::debug!("{object:?} fade interrupted, continuing with {cue:?}");
            self.run_cue(cue, now);
            self.fades.cancel_owner(node);
        }
        let Some(visible) = self.scene.get_node(node).map(|n| n.visible) else {
            return false;
        };
        for key in self.scene.surfaces_under(node) {
            if let Some(surface) = self.scene.surface_mut(key) {
                surface.restore_base();
            }
        }
        self.scene.set_visible(node, !visible);
        log::debug!("{object:?} visible: {}", !visible);
        true
    }

    /// Kicker strike plus a lone flight. A no-op while a kick, a flight or the sequence runs.
    fn kick(&mut self, now: f32) -> bool {
        if self.kick_in_flight || self.flight.is_some() || self.director.is_running() {
            log::debug!("Kick ignored, one is already in flight");
            return false;
        }
        if !self.kicker.is_alive(&self.scene) {
            return false;
        }
        self.kicker_strike(now);
        self.kick_in_flight = true;
        self.director
            .schedule(now + self.config.sequence.kick_to_flight_secs, Cue::LaunchBall);
        true
    }

    fn start_sequence(&mut self, now: f32) -> bool {
        if !self.director.start(now) {
            return false;
        }
        let start = self.props.start_prompt;
        if self.scene.is_visible_in_hierarchy(start) && !self.fades.is_fading(start) {
            self.fade_node(start, FadeDirection::Out, now);
        }
        true
    }

    /// Plays clip `index` on `role` as a directly selected clip.
    ///
    /// Loop mode comes from the actor's `looping_clips`. A one-shot either holds its last
    /// frame (`hold_clips`) or hands back to idle when it ends. Refused while the sequence
    /// runs, since replacing its clips would drop the steps waiting on them.
    pub fn play_clip(&mut self, role: ActorRole, index: usize) -> Result<ActionHandle> {
        if self.director.is_running() {
            return Err(VignetteError::SequenceRunning {
                actor: role.label().to_string(),
                index,
            });
        }
        let (scene, actor) = self.split(role);
        let len = actor.controller.clip_count();
        let out_of_bounds = || VignetteError::ClipIndexOutOfBounds {
            actor: role.label().to_string(),
            index,
            len,
        };
        if index >= len {
            return Err(out_of_bounds());
        }
        let loop_mode = actor.library.loop_mode_for(index);

        reactor::reroot_if_held(scene, actor);
        let handle = actor.controller.play(scene, index, loop_mode).ok_or_else(out_of_bounds)?;
        if loop_mode == LoopMode::Once {
            actor
                .controller
                .on_finished(handle, Cue::ClipFinished { actor: role, index });
        }
        log::info!("{} plays clip {index} ({loop_mode:?})", role.label());
        Ok(handle)
    }

    fn recenter_camera(&mut self, now: f32) -> bool {
        let Some((node, _)) = self.scene.main_camera() else {
            return false;
        };
        let position = node.transform.position;
        self.camera_return.begin(now, position, self.orbit.center);
        true
    }

    /// Returns the session to its post-construction state.
    pub fn reset(&mut self) {
        self.director.reset();
        self.fades.clear();
        self.hit_tester.clear(&mut self.scene);
        self.camera_return.cancel();
        self.flight = None;
        self.kick_in_flight = false;

        self.kicker.controller.stop_all();
        self.keeper.controller.stop_all();

        if let Some(initial) = &self.initial {
            self.scene.restore_state(&initial.scene);
        }
        let home = self.camera_return.home();
        self.orbit.set_pose(home.position, home.target);

        self.kicker.play_default(&self.scene);
        self.keeper.play_default(&self.scene);
        log::info!("Session reset");
    }

    // ========================================================================
    // Helpers shared with cue handlers
    // ========================================================================

    fn fade_node(&mut self, node: NodeHandle, direction: FadeDirection, now: f32) {
        let surfaces = self.scene.surfaces_under(node);
        self.fades.run(
            &mut self.scene,
            node,
            &surfaces,
            direction,
            self.config.sequence.fade_secs,
            now,
            None,
        );
    }

    fn idle_successor(&self, role: ActorRole) -> Successor {
        Successor {
            index: self.actor(role).library.index(ClipIntent::Idle),
            loop_mode: LoopMode::Loop,
        }
    }

    /// Starts the ball flight when the ball is visible and at rest.
    fn launch_ball(&mut self, now: f32) -> bool {
        if self.flight.is_some() || !self.scene.is_visible_in_hierarchy(self.props.ball) {
            log::debug!("Ball launch skipped");
            return false;
        }
        let ball = &self.config.ball;
        if let Some(node) = self.scene.get_node_mut(self.props.ball) {
            node.transform.position = ball.spawn_position;
        }
        self.flight = Some(MotionTrack::start(
            ball.spawn_position,
            ball.target_position,
            now,
            ball.flight_secs,
            ball.peak_height,
            ball.spin_per_frame,
        ));
        log::debug!("Ball launched at {now:.3}s");
        true
    }
}
