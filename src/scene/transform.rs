use glam::{Affine3A, EulerRot, Mat3, Quat, Vec3};

/// Translation, rotation and scale as last baked into the local matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trs {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
}

/// Local TRS of a node with cached local and world matrices.
///
/// The local matrix is rebuilt lazily: [`update_local_matrix`](Self::update_local_matrix)
/// compares the public TRS against the snapshot it last baked and only recomputes on change.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    /// `None` forces the next rebuild.
    baked: Option<Trs>,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self::from_position(Vec3::ZERO)
    }

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
            baked: None,
        }
    }

    fn trs(&self) -> Trs {
        Trs {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Rebuilds the local matrix if the TRS changed since the last rebuild.
    /// Returns whether it did.
    pub fn update_local_matrix(&mut self) -> bool {
        let current = self.trs();
        if self.baked == Some(current) {
            return false;
        }
        self.local_matrix = Affine3A::from_scale_rotation_translation(current.scale, current.rotation, current.position);
        self.baked = Some(current);
        true
    }

    pub fn mark_dirty(&mut self) {
        self.baked = None;
    }

    /// Heading around +Y, the only rotation actors use at the root.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.rotation.to_euler(EulerRot::YXZ).0
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.rotation = Quat::from_rotation_y(yaw);
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Turns -Z toward `target` (parent space). A no-op when `up` is parallel to the view.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        let side = forward.cross(up);
        if side.length_squared() < 1e-4 {
            return;
        }
        let right = side.normalize();
        let true_up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, true_up, -forward));
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
