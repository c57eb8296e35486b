use crate::actor::ActorRole;

/// One step of the scripted vignette.
///
/// Cues are plain data: timers, clip finish continuations and fade completions all
/// resolve to a cue, and the session executes it against its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// The kicker strikes the ball.
    KickerStrike,
    /// The ball is launched and the keeper starts its save.
    LaunchAndReact,
    /// The kicker's strike ended; hand it back to idle.
    KickerFinished,
    /// The keeper's save ended; fade it out.
    KeeperSaveFinished,
    /// The keeper is invisible; turn it around into the recovery clip and fade it back in.
    KeeperHidden,
    /// The keeper recovered; blend into the celebration.
    KeeperRecovered,
    /// Show the restart prompt; the sequence is over.
    ShowPrompt,
    /// Ball launch of a lone kick.
    LaunchBall,
    /// A directly selected clip ended.
    ClipFinished { actor: ActorRole, index: usize },
}
