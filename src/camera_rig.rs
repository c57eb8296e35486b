//! Eased camera return to the default viewpoint.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

#[must_use]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    start_time: f32,
    from: CameraPose,
}

/// Interpolates camera position and look target back to a fixed pose.
///
/// Cancelling leaves the camera wherever the last update put it.
#[derive(Debug, Clone)]
pub struct CameraReturn {
    home: CameraPose,
    duration: f32,
    active: Option<Transition>,
}

impl CameraReturn {
    #[must_use]
    pub fn new(home: CameraPose, duration: f32) -> Self {
        Self {
            home,
            duration,
            active: None,
        }
    }

    #[must_use]
    pub fn home(&self) -> CameraPose {
        self.home
    }

    /// Starts (or restarts) the return from the current pose.
    pub fn begin(&mut self, now: f32, from_position: Vec3, from_target: Vec3) {
        self.active = Some(Transition {
            start_time: now,
            from: CameraPose {
                position: from_position,
                target: from_target,
            },
        });
    }

    /// The pose for `now` while a return runs. The update that reaches the home pose
    /// returns it and ends the transition.
    pub fn update(&mut self, now: f32) -> Option<CameraPose> {
        let transition = self.active?;
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            ((now - transition.start_time) / self.duration).clamp(0.0, 1.0)
        };
        let k = ease_in_out_cubic(t);
        if t >= 1.0 {
            self.active = None;
        }
        Some(CameraPose {
            position: transition.from.position.lerp(self.home.position, k),
            target: transition.from.target.lerp(self.home.target, k),
        })
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
