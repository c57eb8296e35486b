//! Scene Session Tests
//!
//! Tests for:
//! - The full scripted sequence on placeholder rigs
//! - Reset returning to the post-construction state
//! - Anchor continuity across clip changes and rigs missing sequence clips
//! - Lone kicks, direct clip selection and visibility toggles
//! - Prompt clicks and camera recentering

use glam::{Vec2, Vec3};

use vignette::actor::ActorRole;
use vignette::assets::LoadedActor;
use vignette::scene::{Camera, Scene};
use vignette::{
    ActorSource, Command, NullRenderer, PlaceholderSource, SceneObject, SceneSession, VignetteConfig,
    VignetteError,
};

const STEP: f32 = 1.0 / 60.0;

fn session() -> SceneSession {
    SceneSession::new(VignetteConfig::default(), &mut PlaceholderSource)
}

/// Placeholder rigs cut down to idle and kick.
struct TwoClipSource;

impl ActorSource for TwoClipSource {
    fn load(&mut self, scene: &mut Scene, role: ActorRole) -> vignette::Result<LoadedActor> {
        let mut actor = PlaceholderSource::build(scene, role);
        actor.clips.truncate(2);
        Ok(actor)
    }
}

fn run_for(session: &mut SceneSession, renderer: &mut NullRenderer, secs: f32) {
    let frames = (secs / STEP).ceil() as usize;
    for _ in 0..frames {
        session.tick(STEP, renderer);
    }
}

/// Ticks until the director goes idle. Returns the elapsed session time.
fn run_sequence(session: &mut SceneSession, renderer: &mut NullRenderer) -> f32 {
    let start = session.now();
    while session.director().is_running() {
        assert!(session.now() - start < 10.0, "sequence never finished");
        session.tick(STEP, renderer);
    }
    session.now() - start
}

fn visible(session: &SceneSession, node: vignette::NodeHandle) -> bool {
    session.scene().is_visible_in_hierarchy(node)
}

fn root_position(session: &SceneSession, role: ActorRole) -> Vec3 {
    session.actor(role).position(session.scene()).unwrap()
}

/// Window pixel of a world point as seen by the session camera.
fn project(session: &SceneSession, world: Vec3) -> Vec2 {
    let (node, camera) = session.scene().main_camera().unwrap();
    let view_proj = *camera.projection_matrix() * Camera::view_matrix(node.world_matrix());
    let ndc = view_proj.project_point3(world);
    let screen = session.screen_size();
    Vec2::new((ndc.x + 1.0) * 0.5 * screen.x, (1.0 - ndc.y) * 0.5 * screen.y)
}

// ============================================================================
// Scripted Sequence
// ============================================================================

#[test]
fn sequence_runs_to_idle_and_shows_restart_prompt() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    let props = *session.props();
    assert!(!visible(&session, props.restart_prompt));

    assert!(session.execute(Command::StartSequence));
    let elapsed = run_sequence(&mut session, &mut renderer);
    assert!(elapsed > 3.0 && elapsed < 5.0, "sequence took {elapsed}s");

    run_for(&mut session, &mut renderer, 0.5);
    assert!(visible(&session, props.restart_prompt));
    assert!(!visible(&session, props.start_prompt));
    assert!(session.flight().is_none());
    assert!(!session.is_kick_in_flight());

    let snapshot = session.snapshot();
    assert_eq!(snapshot.kicker_clip, Some(0));
    assert_eq!(snapshot.keeper_clip, Some(4));
    assert_eq!(snapshot.active_fades, 0);
    assert_eq!(snapshot.pending_cues, 0);
    assert!(renderer.frames as f32 >= elapsed / STEP);
    assert!(renderer.last_visible_meshes > 0);
}

#[test]
fn keeper_ends_where_its_dive_left_it() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    let spawn = root_position(&session, ActorRole::Keeper);

    session.execute(Command::StartSequence);
    run_sequence(&mut session, &mut renderer);

    let end = root_position(&session, ActorRole::Keeper);
    assert!((end.x - (spawn.x + 1.5)).abs() < 0.05, "keeper root at {end}");
    assert!((end.z - spawn.z).abs() < 0.05);
    assert!(end.y.abs() < 1e-5);
    assert!(session.actor(ActorRole::Keeper).is_visible(session.scene()));
}

#[test]
fn kicker_steps_forward_after_strike() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    let spawn = root_position(&session, ActorRole::Kicker);

    session.execute(Command::StartSequence);
    run_for(&mut session, &mut renderer, 1.5);

    // The strike carries the hips half a unit forward; the kicker faces -Z.
    let after = root_position(&session, ActorRole::Kicker);
    assert!((after.z - (spawn.z - 0.5)).abs() < 0.05, "kicker root at {after}");
    assert_eq!(session.snapshot().kicker_clip, Some(0));
}

#[test]
fn anchors_move_smoothly_across_clip_changes() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    session.tick(STEP, &mut renderer);

    let anchors: Vec<_> = [ActorRole::Kicker, ActorRole::Keeper]
        .into_iter()
        .map(|role| session.actor(role).anchor.unwrap())
        .collect();
    let mut last: Vec<Vec3> = anchors
        .iter()
        .map(|&a| session.scene().world_position(a).unwrap())
        .collect();

    session.execute(Command::StartSequence);
    let mut worst = [0.0_f32; 2];
    for _ in 0..240 {
        session.tick(STEP, &mut renderer);
        for (i, &anchor) in anchors.iter().enumerate() {
            let now = session.scene().world_position(anchor).unwrap();
            let jump = Vec2::new(now.x - last[i].x, now.z - last[i].z).length();
            worst[i] = worst[i].max(jump);
            last[i] = now;
        }
    }
    assert!(worst[0] < 0.1, "kicker anchor jumped {}", worst[0]);
    assert!(worst[1] < 0.1, "keeper anchor jumped {}", worst[1]);
}

#[test]
fn sequence_finishes_when_rig_lacks_its_clips() {
    let mut session = SceneSession::new(VignetteConfig::default(), &mut TwoClipSource);
    let mut renderer = NullRenderer::new();
    let props = *session.props();

    assert!(session.execute(Command::StartSequence));
    run_sequence(&mut session, &mut renderer);
    run_for(&mut session, &mut renderer, 0.5);

    assert!(visible(&session, props.restart_prompt));
    let snapshot = session.snapshot();
    assert_eq!(snapshot.kicker_clip, Some(0));
    assert_eq!(snapshot.keeper_clip, Some(0));
    assert!(session.actor(ActorRole::Keeper).is_visible(session.scene()));
    assert!(session.execute(Command::StartSequence));
}

#[test]
fn direct_clip_is_refused_during_sequence() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    session.execute(Command::StartSequence);
    run_for(&mut session, &mut renderer, 1.0);

    assert!(!session.execute(Command::PlayClip {
        actor: ActorRole::Keeper,
        index: 0,
    }));
    let err = session.play_clip(ActorRole::Kicker, 4).unwrap_err();
    assert!(matches!(err, VignetteError::SequenceRunning { index: 4, .. }));
    assert_eq!(session.snapshot().keeper_clip, Some(2));

    run_sequence(&mut session, &mut renderer);
    assert_eq!(session.snapshot().keeper_clip, Some(4));
    assert!(session.play_clip(ActorRole::Keeper, 0).is_ok());
}

#[test]
fn start_while_running_is_ignored() {
    let mut session = session();
    assert!(session.execute(Command::StartSequence));
    assert!(!session.execute(Command::StartSequence));
}

#[test]
fn sequence_can_run_again_after_finishing() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    session.execute(Command::StartSequence);
    run_sequence(&mut session, &mut renderer);

    assert!(session.execute(Command::StartSequence));
    run_sequence(&mut session, &mut renderer);
    assert!(!session.director().is_running());
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn reset_after_sequence_restores_initial_snapshot() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    session.execute(Command::StartSequence);
    run_sequence(&mut session, &mut renderer);

    assert!(session.execute(Command::Reset));
    assert_eq!(session.initial_snapshot(), Some(&session.snapshot()));
}

#[test]
fn reset_mid_sequence_drops_every_pending_step() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    let props = *session.props();
    session.execute(Command::StartSequence);
    run_for(&mut session, &mut renderer, 1.1);
    assert!(session.flight().is_some());

    session.execute(Command::Reset);
    assert_eq!(session.initial_snapshot(), Some(&session.snapshot()));

    run_for(&mut session, &mut renderer, 5.0);
    assert!(!session.director().is_running());
    assert!(session.flight().is_none());
    assert!(!visible(&session, props.restart_prompt));
    assert!(visible(&session, props.start_prompt));
    assert_eq!(session.snapshot().keeper_clip, Some(0));
}

// ============================================================================
// Lone Kick
// ============================================================================

#[test]
fn kick_is_ignored_while_one_is_in_flight() {
    let mut session = session();
    let mut renderer = NullRenderer::new();

    assert!(session.execute(Command::Kick));
    assert!(session.is_kick_in_flight());
    assert!(!session.execute(Command::Kick));

    run_for(&mut session, &mut renderer, 0.9);
    assert!(session.flight().is_some());
    assert!(!session.execute(Command::Kick));

    run_for(&mut session, &mut renderer, 1.2);
    assert!(session.flight().is_none());
    assert!(!session.is_kick_in_flight());

    let ball = session.scene().get_node(session.props().ball).unwrap();
    assert!((ball.transform.position - session.config().ball.target_position).length() < 1e-3);
    assert!(session.execute(Command::Kick));
}

#[test]
fn kick_is_ignored_during_sequence() {
    let mut session = session();
    session.execute(Command::StartSequence);
    assert!(!session.execute(Command::Kick));
}

#[test]
fn kick_with_hidden_ball_releases_the_guard() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    session.execute(Command::ToggleVisibility(SceneObject::Ball));

    assert!(session.execute(Command::Kick));
    run_for(&mut session, &mut renderer, 1.0);
    assert!(session.flight().is_none());
    assert!(!session.is_kick_in_flight());
}

// ============================================================================
// Direct Clip Selection
// ============================================================================

#[test]
fn out_of_range_clip_is_an_error() {
    let mut session = session();
    let before = session.snapshot();

    let err = session.play_clip(ActorRole::Kicker, 9).unwrap_err();
    assert!(matches!(err, VignetteError::ClipIndexOutOfBounds { index: 9, len: 5, .. }));
    assert!(!session.execute(Command::PlayClip {
        actor: ActorRole::Keeper,
        index: 5,
    }));
    assert_eq!(session.snapshot(), before);
}

#[test]
fn one_shot_clip_returns_to_idle() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    session.play_clip(ActorRole::Kicker, 1).unwrap();
    assert_eq!(session.snapshot().kicker_clip, Some(1));

    run_for(&mut session, &mut renderer, 1.5);
    assert_eq!(session.snapshot().kicker_clip, Some(0));
}

#[test]
fn looping_clip_keeps_playing() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    session.play_clip(ActorRole::Keeper, 4).unwrap();
    run_for(&mut session, &mut renderer, 3.0);
    assert_eq!(session.snapshot().keeper_clip, Some(4));
}

#[test]
fn hold_clip_freezes_then_reroots_on_next_clip() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    let spawn = root_position(&session, ActorRole::Keeper);

    session.play_clip(ActorRole::Keeper, 2).unwrap();
    run_for(&mut session, &mut renderer, 2.0);

    let keeper = session.actor(ActorRole::Keeper);
    let state = keeper.controller.state().unwrap();
    assert_eq!(state.clip_index, 2);
    assert!(state.hold_last_frame);
    assert_eq!(root_position(&session, ActorRole::Keeper), spawn);

    session.play_clip(ActorRole::Keeper, 0).unwrap();
    let moved = root_position(&session, ActorRole::Keeper);
    assert!((moved.x - (spawn.x + 1.2)).abs() < 0.05, "keeper root at {moved}");
}

#[test]
fn direct_clip_ignores_stale_finish_of_replaced_clip() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    session.play_clip(ActorRole::Kicker, 1).unwrap();
    run_for(&mut session, &mut renderer, 0.5);
    session.play_clip(ActorRole::Kicker, 4).unwrap();

    run_for(&mut session, &mut renderer, 2.0);
    assert_eq!(session.snapshot().kicker_clip, Some(4));
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn toggle_hides_and_shows() {
    let mut session = session();
    let goal = session.props().goal;
    assert!(session.execute(Command::ToggleVisibility(SceneObject::Goal)));
    assert!(!visible(&session, goal));
    assert!(session.execute(Command::ToggleVisibility(SceneObject::Goal)));
    assert!(visible(&session, goal));

    let surface = session.scene().surfaces_under(goal)[0];
    assert!((session.scene().surface(surface).unwrap().opacity - 0.9).abs() < 1e-6);
}

#[test]
fn toggling_keeper_mid_fade_restores_its_surfaces() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    session.execute(Command::StartSequence);
    // Keeper fade-out starts when the save ends, 2.0s in.
    run_for(&mut session, &mut renderer, 2.1);

    let keeper = session.actor(ActorRole::Keeper).root;
    session.execute(Command::ToggleVisibility(SceneObject::Keeper));
    for &key in &session.actor(ActorRole::Keeper).surfaces {
        let surface = session.scene().surface(key).unwrap();
        assert!((surface.opacity - 1.0).abs() < 1e-6);
        assert!(!surface.transparent);
    }
    assert!(!visible(&session, keeper));
}

#[test]
fn toggling_keeper_mid_fade_lets_sequence_finish() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    let props = *session.props();
    session.execute(Command::StartSequence);
    run_for(&mut session, &mut renderer, 2.1);

    let keeper = session.actor(ActorRole::Keeper).root;
    assert!(session.execute(Command::ToggleVisibility(SceneObject::Keeper)));
    assert!(!visible(&session, keeper));
    assert_eq!(session.snapshot().keeper_clip, Some(3));

    run_sequence(&mut session, &mut renderer);
    run_for(&mut session, &mut renderer, 0.5);
    assert!(visible(&session, props.restart_prompt));
    assert_eq!(session.snapshot().keeper_clip, Some(4));
    assert!(!visible(&session, keeper));

    assert!(session.execute(Command::ToggleVisibility(SceneObject::Keeper)));
    assert!(visible(&session, keeper));
    assert!(session.execute(Command::Kick));
}

// ============================================================================
// Pointer and Camera
// ============================================================================

#[test]
fn clicking_start_prompt_starts_sequence_after_pulse() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    let start = session.props().start_prompt;
    let pixel = project(&session, session.scene().world_position(start).unwrap());

    assert!(session.handle_pointer(pixel));
    assert!(!session.director().is_running());

    run_for(&mut session, &mut renderer, 0.25);
    assert!(session.director().is_running());

    run_for(&mut session, &mut renderer, 0.5);
    assert!(!visible(&session, start));
}

#[test]
fn clicking_empty_space_does_nothing() {
    let mut session = session();
    assert!(!session.handle_pointer(Vec2::new(2.0, 2.0)));
}

#[test]
fn recenter_eases_back_to_default_pose() {
    let mut session = session();
    let mut renderer = NullRenderer::new();
    assert!(session.execute(Command::RecenterCamera));
    assert!(session.is_camera_returning());

    let settle = session.config().camera.return_secs + 0.1;
    run_for(&mut session, &mut renderer, settle);
    assert!(!session.is_camera_returning());

    let camera = session.scene().get_node(session.props().camera).unwrap();
    let home = session.config().camera.default_position;
    assert!((camera.transform.position - home).length() < 1e-4);
}
