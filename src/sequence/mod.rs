//! Scripted sequence timing: the cue vocabulary, the timer queue and the director.

pub mod cue;
pub mod director;
pub mod timer;

pub use cue::Cue;
pub use director::SequenceDirector;
pub use timer::TimerQueue;
