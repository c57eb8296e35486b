/// Opacity state of one renderable surface (a mesh material).
///
/// `base_opacity` and `base_transparent` are the authored values captured at creation.
/// Fades ramp `opacity` and toggle `transparent`, then restore from the base values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub opacity: f32,
    pub transparent: bool,
    base_opacity: f32,
    base_transparent: bool,
}

impl Surface {
    #[must_use]
    pub fn new(opacity: f32, transparent: bool) -> Self {
        let opacity = opacity.clamp(0.0, 1.0);
        Self {
            opacity,
            transparent,
            base_opacity: opacity,
            base_transparent: transparent,
        }
    }

    #[must_use]
    pub fn opaque() -> Self {
        Self::new(1.0, false)
    }

    #[inline]
    #[must_use]
    pub fn base_opacity(&self) -> f32 {
        self.base_opacity
    }

    #[inline]
    #[must_use]
    pub fn base_transparent(&self) -> bool {
        self.base_transparent
    }

    /// Puts the surface back to its authored state.
    pub fn restore_base(&mut self) {
        self.opacity = self.base_opacity;
        self.transparent = self.base_transparent;
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::opaque()
    }
}
