use glam::{Affine3A, Vec3};

/// Axis-aligned box in a node's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    #[must_use]
    pub fn from_half_extents(half: Vec3) -> Self {
        Self::new(-half, half)
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Builds a ray, normalizing the direction. Degenerate directions yield `None`.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    #[must_use]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// One ray intersection, `distance` measured in world units from the ray origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<H> {
    pub node: H,
    pub distance: f32,
    pub point: Vec3,
}

/// Slab test. Returns the entry distance (or exit distance when starting inside).
#[must_use]
pub fn ray_aabb_intersection(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_min: f32 = 0.0;
    let mut t_max: f32 = f32::INFINITY;
    let origin = origin.to_array();
    let dir = dir.to_array();
    let min = min.to_array();
    let max = max.to_array();
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < 1e-6 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
        } else {
            let inv_d = 1.0 / d;
            let mut t1 = (min[axis] - o) * inv_d;
            let mut t2 = (max[axis] - o) * inv_d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
    }
    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

/// Intersects a world-space ray with bounds placed by `world`.
///
/// The test runs in local space so rotated and scaled boxes stay exact; the returned
/// distance is converted back to world units.
#[must_use]
pub fn ray_hit_bounds(ray: &Ray, world: &Affine3A, bounds: &Aabb) -> Option<(f32, Vec3)> {
    let inv = world.inverse();
    if !inv.is_finite() {
        return None;
    }
    let origin_local = inv.transform_point3(ray.origin);
    let dir_local = inv.transform_vector3(ray.direction).try_normalize()?;
    let t_local = ray_aabb_intersection(origin_local, dir_local, bounds.min, bounds.max)?;
    let hit_world = world.transform_point3(origin_local + dir_local * t_local);
    Some(((hit_world - ray.origin).length(), hit_world))
}
