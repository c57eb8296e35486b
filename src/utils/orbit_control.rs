use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::app::input::{Input, MouseButton};
use crate::scene::transform::Transform;

/// Keeps the polar angle off the poles, where the look-at basis degenerates.
const POLE_MARGIN: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    pub rotate_speed: f32,
    /// Fraction of the radius removed per scroll line.
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Per-60Hz-frame share of pending rotation applied; `None` applies it at once.
    pub damping: Option<f32>,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping: Some(0.05),
            min_distance: 1.0,
            max_distance: 100.0,
        }
    }
}

/// Camera orbit around `center`: left-drag rotates, right-drag pans, the wheel zooms.
///
/// Spherical coordinates are Y-up: `theta` is the heading from +Z, `phi` the angle from +Y.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub settings: OrbitSettings,
    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
    /// Rotation requested but not yet applied (damped).
    pending: Vec2,
}

impl OrbitControls {
    /// Orbit placing the camera at `position` looking at `target`.
    #[must_use]
    pub fn from_pose(position: Vec3, target: Vec3) -> Self {
        let mut controls = Self {
            settings: OrbitSettings::default(),
            center: target,
            radius: 1.0,
            theta: 0.0,
            phi: PI / 2.0,
            pending: Vec2::ZERO,
        };
        controls.set_pose(position, target);
        controls
    }

    /// Re-derives the spherical coordinates from a camera pose and drops pending rotation.
    pub fn set_pose(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        self.center = target;
        self.radius = offset.length().max(1e-4);
        self.theta = offset.x.atan2(offset.z);
        self.phi = (offset.y / self.radius).clamp(-1.0, 1.0).acos();
        self.pending = Vec2::ZERO;
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.center + self.radius * Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
    }

    /// Whether the user is steering the camera this frame.
    #[must_use]
    pub fn is_user_active(input: &Input) -> bool {
        let held = input.is_button_held(MouseButton::Left) || input.is_button_held(MouseButton::Right);
        (held && input.drag() != Vec2::ZERO) || input.scroll().y != 0.0
    }

    /// Applies this frame's drag and scroll input and writes the resulting pose.
    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_degrees: f32, dt: f32) {
        let screen_height = input.screen_size().y.max(1.0);

        if input.is_button_held(MouseButton::Left) {
            self.pending -= input.drag() * (TAU / screen_height) * self.settings.rotate_speed;
        }
        self.integrate_rotation(dt);
        self.zoom(input.scroll().y);
        if input.is_button_held(MouseButton::Right) {
            self.pan(input.drag(), fov_degrees, screen_height);
        }

        transform.position = self.position();
        transform.look_at(self.center, Vec3::Y);
    }

    fn integrate_rotation(&mut self, dt: f32) {
        let step = match self.settings.damping {
            Some(factor) => {
                let retention = (1.0 - factor).powf(dt * 60.0);
                let step = self.pending * (1.0 - retention);
                self.pending *= retention;
                step
            }
            None => std::mem::take(&mut self.pending),
        };
        self.theta += step.x;
        self.phi = (self.phi + step.y).clamp(POLE_MARGIN, PI - POLE_MARGIN);
    }

    fn zoom(&mut self, lines: f32) {
        if lines == 0.0 {
            return;
        }
        let factor = (1.0 - self.settings.zoom_speed).powf(lines.abs());
        let radius = if lines > 0.0 { self.radius * factor } else { self.radius / factor };
        self.radius = radius.clamp(self.settings.min_distance, self.settings.max_distance);
    }

    /// Moves the center in the view plane so the point under the cursor follows it.
    fn pan(&mut self, drag: Vec2, fov_degrees: f32, screen_height: f32) {
        let world_per_pixel = 2.0 * self.radius * (fov_degrees.to_radians() / 2.0).tan() / screen_height;
        let forward = (self.center - self.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        self.center += (up * drag.y - right * drag.x) * world_per_pixel * self.settings.pan_speed;
    }
}
