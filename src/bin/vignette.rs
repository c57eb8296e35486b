//! Runs the vignette behind a desktop window.
//!
//! The window is an input and timing harness: it draws nothing itself. Keys, clicks
//! and orbit drags drive the session, and progress shows up in the log
//! (`RUST_LOG=vignette=debug` traces every cue). Drawing needs a [`FrameRenderer`]
//! plugged in through [`App::with_renderer`].
//!
//! Usage: `vignette [config.json] [rig-dir]`
//!
//! [`FrameRenderer`]: vignette::FrameRenderer

use vignette::app::App;
use vignette::{ActorSource, PlaceholderSource, RigFileSource, SceneSession, VignetteConfig};

fn main() -> vignette::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = args
        .next()
        .map_or_else(VignetteConfig::default, VignetteConfig::load_or_default);
    let mut source: Box<dyn ActorSource> = match args.next() {
        Some(dir) => Box::new(RigFileSource::new(dir)),
        None => Box::new(PlaceholderSource),
    };

    let session = SceneSession::new(config, source.as_mut());
    log::info!("No renderer attached; the window only collects input");
    App::new(session).with_title("Vignette (input only)").run()
}
