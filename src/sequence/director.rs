use smallvec::SmallVec;

use crate::config::SequenceConfig;
use crate::sequence::cue::Cue;
use crate::sequence::timer::TimerQueue;

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    epoch: u64,
    cue: Cue,
}

/// Timed state machine of the vignette (`Idle → Running → Idle`).
///
/// Owns the single timer queue. Every scheduled cue remembers the epoch it was scheduled
/// in; [`reset`](Self::reset) bumps the epoch so nothing queued before it can fire.
#[derive(Debug)]
pub struct SequenceDirector {
    running: bool,
    epoch: u64,
    started_at: Option<f32>,
    launch_offset: f32,
    nominal_end: f32,
    timers: TimerQueue<Scheduled>,
}

impl SequenceDirector {
    #[must_use]
    pub fn new(config: &SequenceConfig) -> Self {
        Self {
            running: false,
            epoch: 0,
            started_at: None,
            launch_offset: config.launch_offset_secs,
            nominal_end: config.nominal_end_secs,
            timers: TimerQueue::new(),
        }
    }

    /// Starts the sequence at `now`. A no-op returning `false` while it is running.
    pub fn start(&mut self, now: f32) -> bool {
        if self.running {
            log::debug!("Sequence already running, start ignored");
            return false;
        }
        self.running = true;
        self.started_at = Some(now);
        self.schedule(now, Cue::KickerStrike);
        self.schedule(now + self.launch_offset, Cue::LaunchAndReact);
        log::info!("Sequence started at {now:.3}s");
        true
    }

    /// Queues `cue` for absolute session time `at` under the current epoch.
    pub fn schedule(&mut self, at: f32, cue: Cue) {
        self.timers.schedule(at, Scheduled { epoch: self.epoch, cue });
    }

    /// Pops every cue due at `now`, in due order. Cues of an older epoch are dropped.
    pub fn due(&mut self, now: f32) -> SmallVec<[Cue; 4]> {
        let mut cues = SmallVec::new();
        while let Some(entry) = self.timers.pop_due(now) {
            if entry.epoch == self.epoch {
                cues.push(entry.cue);
            } else {
                log::debug!("Dropped stale cue {:?}", entry.cue);
            }
        }
        cues
    }

    /// Marks the sequence idle. Overruns of the nominal length are only reported.
    pub fn finish(&mut self, now: f32) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(start) = self.started_at.take() {
            let length = now - start;
            if length > self.nominal_end {
                log::info!(
                    "Sequence finished after {length:.2}s (nominal {:.2}s)",
                    self.nominal_end
                );
            } else {
                log::info!("Sequence finished after {length:.2}s");
            }
        }
    }

    /// Drops all pending cues and returns to idle.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.epoch += 1;
        self.running = false;
        self.started_at = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<f32> {
        self.started_at
    }
}
