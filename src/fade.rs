//! Opacity ramps over sets of surfaces.

use smallvec::SmallVec;

use crate::scene::{NodeHandle, Scene, SurfaceKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FadeDirection {
    In,
    Out,
}

/// Opacity of a surface with authored opacity `base` at fade progress `p`.
///
/// Out ramps `1 → 0` regardless of the base; in ramps `0 → base`.
#[must_use]
pub fn opacity_at(direction: FadeDirection, p: f32, base: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    match direction {
        FadeDirection::Out => 1.0 - p,
        FadeDirection::In => p * base,
    }
}

#[derive(Debug)]
struct FadeState<K> {
    owner: NodeHandle,
    surfaces: SmallVec<[SurfaceKey; 4]>,
    direction: FadeDirection,
    start_time: f32,
    duration: f32,
    on_complete: Option<K>,
}

impl<K> FadeState<K> {
    fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }
}

/// Runs any number of concurrent fades, at most one per owner node.
///
/// A fade-out hides its owner when it ends. A fade-in shows the owner when it starts
/// and puts every surface back to its base opacity when it ends.
#[derive(Debug)]
pub struct FadeController<K> {
    fades: Vec<FadeState<K>>,
}

impl<K> Default for FadeController<K> {
    fn default() -> Self {
        Self { fades: Vec::new() }
    }
}

impl<K> FadeController<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts fading `surfaces` of `owner`, superseding any fade already running on it.
    ///
    /// `on_complete` is handed back by [`update`](Self::update) when the fade ends.
    pub fn run(
        &mut self,
        scene: &mut Scene,
        owner: NodeHandle,
        surfaces: &[SurfaceKey],
        direction: FadeDirection,
        duration: f32,
        now: f32,
        on_complete: Option<K>,
    ) {
        if self.cancel_owner(owner) {
            log::debug!("Fade on {owner:?} superseded");
        }

        for &key in surfaces {
            if let Some(surface) = scene.surface_mut(key) {
                surface.transparent = true;
                surface.opacity = opacity_at(direction, 0.0, surface.base_opacity());
            }
        }
        if direction == FadeDirection::In {
            scene.set_visible(owner, true);
        }

        self.fades.push(FadeState {
            owner,
            surfaces: surfaces.iter().copied().collect(),
            direction,
            start_time: now,
            duration,
            on_complete,
        });
    }

    /// Writes the opacities for `now` and returns continuations of fades that ended.
    pub fn update(&mut self, scene: &mut Scene, now: f32) -> SmallVec<[K; 2]> {
        let mut completed = SmallVec::new();
        let mut i = 0;
        while i < self.fades.len() {
            let fade = &self.fades[i];
            let p = fade.progress(now);
            for &key in &fade.surfaces {
                if let Some(surface) = scene.surface_mut(key) {
                    surface.opacity = opacity_at(fade.direction, p, surface.base_opacity());
                }
            }

            if p < 1.0 {
                i += 1;
                continue;
            }

            let fade = self.fades.swap_remove(i);
            Self::finish(scene, &fade);
            if let Some(k) = fade.on_complete {
                completed.push(k);
            }
        }
        completed
    }

    fn finish(scene: &mut Scene, fade: &FadeState<K>) {
        match fade.direction {
            FadeDirection::Out => scene.set_visible(fade.owner, false),
            FadeDirection::In => {
                for &key in &fade.surfaces {
                    if let Some(surface) = scene.surface_mut(key) {
                        let base = surface.base_opacity();
                        surface.opacity = base;
                        if base >= 1.0 {
                            surface.transparent = surface.base_transparent();
                        }
                    }
                }
            }
        }
    }

    /// Drops the running fade of `owner`, leaving opacities where they are.
    /// Returns whether there was one.
    pub fn cancel_owner(&mut self, owner: NodeHandle) -> bool {
        let before = self.fades.len();
        self.fades.retain(|f| f.owner != owner);
        before != self.fades.len()
    }

    /// Stops the running fade of `owner` like [`cancel_owner`](Self::cancel_owner), but
    /// hands back its continuation so the caller can still run it.
    pub fn interrupt(&mut self, owner: NodeHandle) -> Option<K> {
        let index = self.fades.iter().position(|f| f.owner == owner)?;
        self.fades.swap_remove(index).on_complete
    }

    #[must_use]
    pub fn is_fading(&self, owner: NodeHandle) -> bool {
        self.fades.iter().any(|f| f.owner == owner)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.fades.len()
    }

    pub fn clear(&mut self) {
        self.fades.clear();
    }
}
