//! Procedural motion along an analytic arc.
//!
//! A [`MotionTrack`] gives the pose of a single thrown object as a pure function of time:
//! the horizontal axes travel linearly from the launch to the landing point while the
//! height follows `peak · sin(π·p)`, which is zero at both ends with one apex at `p = ½`.

use std::f32::consts::PI;

use glam::Vec3;

/// Pose of a track at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub position: Vec3,
    /// Roll to add this frame, in radians. Constant per sampled frame, not scaled by time.
    pub rotation_delta: f32,
    /// Normalized progress in `[0, 1]`.
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MotionTrack {
    start_pos: Vec3,
    end_pos: Vec3,
    start_time: f32,
    duration: f32,
    peak_height: f32,
    rotation_rate: f32,
    completion_reported: bool,
}

impl MotionTrack {
    /// Starts a flight at session time `now`.
    ///
    /// The Y component of `to` is ignored; height is always the launch height plus the arc.
    #[must_use]
    pub fn start(from: Vec3, to: Vec3, now: f32, duration: f32, peak_height: f32, rotation_rate: f32) -> Self {
        Self {
            start_pos: from,
            end_pos: to,
            start_time: now,
            duration,
            peak_height,
            rotation_rate,
            completion_reported: false,
        }
    }

    #[must_use]
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    /// Height above the launch point at progress `p`.
    #[must_use]
    pub fn height_at(&self, p: f32) -> f32 {
        self.peak_height * (PI * p.clamp(0.0, 1.0)).sin()
    }

    #[must_use]
    pub fn sample(&self, now: f32) -> MotionSample {
        let p = self.progress(now);
        let position = Vec3::new(
            self.start_pos.x + (self.end_pos.x - self.start_pos.x) * p,
            self.start_pos.y + self.height_at(p),
            self.start_pos.z + (self.end_pos.z - self.start_pos.z) * p,
        );
        let rotation_delta = if p >= 1.0 { 0.0 } else { -self.rotation_rate };
        MotionSample {
            position,
            rotation_delta,
            progress: p,
        }
    }

    #[must_use]
    pub fn is_complete(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }

    /// `true` exactly once: on the first poll at or after completion.
    pub fn poll_completion(&mut self, now: f32) -> bool {
        if self.completion_reported || !self.is_complete(now) {
            return false;
        }
        self.completion_reported = true;
        true
    }

    #[must_use]
    pub fn landing_position(&self) -> Vec3 {
        Vec3::new(self.end_pos.x, self.start_pos.y, self.end_pos.z)
    }
}
