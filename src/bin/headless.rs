//! Runs the scripted sequence without a window and checks that a reset rewinds it.
//!
//! Usage: `vignette-headless [config.json] [rig-dir]`

use std::process::ExitCode;

use vignette::{
    ActorSource, Command, NullRenderer, PlaceholderSource, RigFileSource, SceneSession, VignetteConfig,
};

const STEP: f32 = 1.0 / 60.0;
const MAX_SECS: f32 = 20.0;

fn run_until_idle(session: &mut SceneSession, renderer: &mut NullRenderer) -> f32 {
    let start = session.now();
    while session.director().is_running() && session.now() - start < MAX_SECS {
        session.tick(STEP, renderer);
    }
    session.now() - start
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = args
        .next()
        .map_or_else(VignetteConfig::default, VignetteConfig::load_or_default);
    let mut source: Box<dyn ActorSource> = match args.next() {
        Some(dir) => Box::new(RigFileSource::new(dir)),
        None => Box::new(PlaceholderSource),
    };

    let mut session = SceneSession::new(config, source.as_mut());
    let mut renderer = NullRenderer::new();

    session.execute(Command::StartSequence);
    let elapsed = run_until_idle(&mut session, &mut renderer);
    if session.director().is_running() {
        log::error!("Sequence still running after {MAX_SECS}s");
        return ExitCode::FAILURE;
    }
    log::info!(
        "Sequence done in {elapsed:.2}s over {} frame(s), {} mesh(es) visible",
        renderer.frames,
        renderer.last_visible_meshes
    );

    session.execute(Command::Kick);
    for _ in 0..120 {
        session.tick(STEP, &mut renderer);
    }

    session.execute(Command::Reset);
    let rewound = session.initial_snapshot().is_some_and(|initial| *initial == session.snapshot());
    if !rewound {
        log::error!("Reset did not restore the initial state");
        return ExitCode::FAILURE;
    }
    log::info!("Reset restored the initial state");
    ExitCode::SUCCESS
}
