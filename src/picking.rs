//! Pointer hit testing for in-world buttons.
//!
//! Pointer pixels become NDC, NDC becomes a camera ray, the ray is intersected with
//! every visible mesh, and the nearest hit whose ancestor chain holds a bound button
//! wins. A clicked button pulses (scale down, then back up) and its action is released
//! once the pulse ends.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::config::UiConfig;
use crate::scene::{NodeHandle, RayHit, Scene, UiAction};

/// Converts window pixels (origin top-left, y down) to NDC (y up).
///
/// Returns `None` for an empty screen.
#[must_use]
pub fn pointer_to_ndc(pointer: Vec2, screen: Vec2) -> Option<Vec2> {
    if screen.x <= 0.0 || screen.y <= 0.0 {
        return None;
    }
    Some(Vec2::new(
        2.0 * pointer.x / screen.x - 1.0,
        1.0 - 2.0 * pointer.y / screen.y,
    ))
}

/// A resolved button under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    /// The button node (not necessarily the mesh that was hit).
    pub node: NodeHandle,
    pub action: UiAction,
    pub fade_on_click: bool,
    pub distance: f32,
}

/// Walks from each hit up its ancestors; the first hit reaching a qualifying button wins.
#[must_use]
pub fn resolve_hits(scene: &Scene, hits: &[RayHit<NodeHandle>]) -> Option<Pick> {
    hits.iter().find_map(|hit| {
        scene.ancestors(hit.node).find_map(|h| {
            let interactive = scene.get_node(h)?.interactive?;
            let action = interactive.action.filter(|_| interactive.qualifies())?;
            Some(Pick {
                node: h,
                action,
                fade_on_click: interactive.fade_on_click,
                distance: hit.distance,
            })
        })
    })
}

#[derive(Debug, Clone, Copy)]
struct Pulse {
    pick: Pick,
    start_time: f32,
    base_scale: Vec3,
}

/// Resolves clicks and runs the click pulses.
#[derive(Debug, Clone)]
pub struct PointerHitTester {
    pulse_secs: f32,
    pulse_scale: f32,
    pulses: Vec<Pulse>,
}

impl PointerHitTester {
    #[must_use]
    pub fn new(config: &UiConfig) -> Self {
        Self {
            pulse_secs: config.pulse_secs,
            pulse_scale: config.pulse_scale,
            pulses: Vec::new(),
        }
    }

    /// The button under `pointer`, if any. World matrices must be current.
    #[must_use]
    pub fn pick(&self, scene: &Scene, pointer: Vec2, screen: Vec2) -> Option<Pick> {
        let ndc = pointer_to_ndc(pointer, screen)?;
        let (camera_node, camera) = scene.main_camera()?;
        let ray = camera.ray_from_ndc(ndc, camera_node.world_matrix())?;
        let hits = scene.raycast(&ray);
        let pick = resolve_hits(scene, &hits);
        if pick.is_none() {
            log::debug!("Pointer at {pointer} hit {} node(s), none interactive", hits.len());
        }
        pick
    }

    /// Starts the pulse of the button under `pointer`.
    ///
    /// Returns the pick when a pulse started; a button already pulsing ignores the click.
    pub fn click(&mut self, scene: &Scene, pointer: Vec2, screen: Vec2, now: f32) -> Option<Pick> {
        let pick = self.pick(scene, pointer, screen)?;
        if self.is_pulsing(pick.node) {
            log::debug!("Click ignored, {:?} is still pulsing", pick.action);
            return None;
        }
        let base_scale = scene.get_node(pick.node)?.transform.scale;
        self.pulses.push(Pulse {
            pick,
            start_time: now,
            base_scale,
        });
        Some(pick)
    }

    /// Writes pulse scales for `now` and returns the picks whose pulse ended.
    pub fn update(&mut self, scene: &mut Scene, now: f32) -> SmallVec<[Pick; 2]> {
        let mut fired = SmallVec::new();
        let (duration, depth) = (self.pulse_secs, 1.0 - self.pulse_scale);
        self.pulses.retain(|pulse| {
            let t = if duration <= 0.0 {
                1.0
            } else {
                ((now - pulse.start_time) / duration).clamp(0.0, 1.0)
            };
            let factor = 1.0 - depth * (PI * t).sin();
            if let Some(node) = scene.get_node_mut(pulse.pick.node) {
                node.transform.scale = if t >= 1.0 { pulse.base_scale } else { pulse.base_scale * factor };
            }
            if t >= 1.0 {
                fired.push(pulse.pick);
                false
            } else {
                true
            }
        });
        fired
    }

    #[must_use]
    pub fn is_pulsing(&self, node: NodeHandle) -> bool {
        self.pulses.iter().any(|p| p.pick.node == node)
    }

    /// Drops every pulse without firing its action, restoring the pulsed scales.
    pub fn clear(&mut self, scene: &mut Scene) {
        for pulse in self.pulses.drain(..) {
            if let Some(node) = scene.get_node_mut(pulse.pick.node) {
                node.transform.scale = pulse.base_scale;
            }
        }
    }
}
