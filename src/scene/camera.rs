use glam::{Affine3A, Mat4, Vec2, Vec3};

use crate::scene::raycast::Ray;

/// Perspective camera. Placement lives on the owning node's transform.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub(crate) projection_matrix: Mat4,
}

impl Camera {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
            self.update_projection_matrix();
        }
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    #[must_use]
    pub fn view_matrix(world: &Affine3A) -> Mat4 {
        Mat4::from(*world).inverse()
    }

    /// Builds a world-space ray through `ndc` (x right, y up, both in [-1, 1]).
    ///
    /// `world` is the camera node's world matrix. The ray starts at the camera position.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2, world: &Affine3A) -> Option<Ray> {
        let inv_projection = self.projection_matrix.inverse();
        // perspective_rh maps depth to [0, 1]; unproject a point on the far half.
        let view_point = inv_projection.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        let origin = Vec3::from(world.translation);
        let target = world.transform_point3(view_point);
        Ray::new(origin, target - origin)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new_perspective(50.0, 16.0 / 9.0, 0.1, 200.0)
    }
}
