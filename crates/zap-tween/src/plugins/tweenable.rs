use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

use glam::{Vec2, Vec3, Vec4};

/// A value that can be interpolated lane by lane.
pub trait Tweenable:
    Copy + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self> + 'static
{
    /// Length of the value seen as a vector; drives speed-based durations.
    fn magnitude(self) -> f32;

    /// Combine two values lane by lane.
    fn zip_map(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self;

    fn is_finite(self) -> bool;
}

impl Tweenable for f32 {
    fn magnitude(self) -> f32 {
        self.abs()
    }

    fn zip_map(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        f(self, other)
    }

    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Tweenable for Vec2 {
    fn magnitude(self) -> f32 {
        self.length()
    }

    fn zip_map(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Vec2::new(f(self.x, other.x), f(self.y, other.y))
    }

    fn is_finite(self) -> bool {
        Vec2::is_finite(self)
    }
}

impl Tweenable for Vec3 {
    fn magnitude(self) -> f32 {
        self.length()
    }

    fn zip_map(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Vec3::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }

    fn is_finite(self) -> bool {
        Vec3::is_finite(self)
    }
}

/// Colors are tweened as `Vec4` (r, g, b, a).
impl Tweenable for Vec4 {
    fn magnitude(self) -> f32 {
        self.length()
    }

    fn zip_map(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Vec4::new(
            f(self.x, other.x),
            f(self.y, other.y),
            f(self.z, other.z),
            f(self.w, other.w),
        )
    }

    fn is_finite(self) -> bool {
        Vec4::is_finite(self)
    }
}
