use glam::{Quat, Vec3};

/// Keyframe value types: anything the tracks can interpolate and the mixer can average.
pub trait Interpolatable: Copy {
    /// `t = 0` yields `from`, `t = 1` yields `to`.
    fn mix(from: Self, to: Self, t: f32) -> Self;

    /// Adds `value` at `weight` to a running weighted mean whose weights sum to `accumulated`.
    #[inline]
    fn accumulate(mean: Self, accumulated: f32, value: Self, weight: f32) -> Self {
        let total = accumulated + weight;
        if total > f32::EPSILON {
            Self::mix(mean, value, weight / total)
        } else {
            mean
        }
    }
}

impl Interpolatable for f32 {
    fn mix(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Interpolatable for Vec3 {
    fn mix(from: Self, to: Self, t: f32) -> Self {
        from.lerp(to, t)
    }
}

/// Shortest-arc slerp.
impl Interpolatable for Quat {
    fn mix(from: Self, to: Self, t: f32) -> Self {
        from.slerp(to, t)
    }
}
