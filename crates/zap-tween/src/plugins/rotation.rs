//! Rotations, tweened through Euler angles in degrees.

use glam::{EulerRot, Quat, Vec3};

use crate::core::error::{Result, TweenError};
use crate::core::target::Property;
use crate::extensions::easing::{EaseShape, Easing};
use super::{Plugin, PluginCore};

pub struct RotationPlugin<T> {
    core: PluginCore,
    property: Property<T, Quat>,
    /// Euler degrees (XYZ): the end, the from-value, or the relative delta.
    value: Vec3,
    beyond_360: bool,
    start: Vec3,
    change: Vec3,
}

fn to_degrees(q: Quat) -> Vec3 {
    let (x, y, z) = q.to_euler(EulerRot::XYZ);
    Vec3::new(x, y, z).map(|r| r.to_degrees().rem_euclid(360.0))
}

fn to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}

impl<T> RotationPlugin<T> {
    /// Rotate to `euler_degrees` (XYZ order).
    pub fn new(property: Property<T, Quat>, euler_degrees: Vec3) -> Result<Self> {
        if !euler_degrees.is_finite() {
            return Err(TweenError::NonFiniteValue {
                property: property.name().to_string(),
            });
        }
        Ok(Self {
            core: PluginCore::new(),
            property,
            value: euler_degrees,
            beyond_360: false,
            start: Vec3::ZERO,
            change: Vec3::ZERO,
        })
    }

    /// Rotate to the orientation `q`.
    pub fn to(property: Property<T, Quat>, q: Quat) -> Result<Self> {
        Self::new(property, to_degrees(q))
    }

    /// Rotate by `euler_degrees` from the orientation at startup.
    pub fn relative(property: Property<T, Quat>, euler_degrees: Vec3) -> Result<Self> {
        let mut plugin = Self::new(property, euler_degrees)?;
        plugin.core.set_relative(true);
        Ok(plugin)
    }

    /// Spin through the literal angle difference instead of the shortest route.
    pub fn beyond_360(mut self) -> Self {
        self.beyond_360 = true;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.core.set_custom_ease(easing, EaseShape::default());
        self
    }

    /// Angle change in degrees per axis.
    pub fn change(&self) -> Vec3 {
        self.change
    }

    fn resolve(&self, current: Quat, is_from: bool) -> (Vec3, Vec3) {
        let current = to_degrees(current);
        let relative = self.core.is_relative();
        let (start, end) = if is_from {
            let start = if relative { current + self.value } else { self.value };
            (start, current)
        } else if relative {
            return (current, self.value);
        } else {
            (current, self.value)
        };
        let change = if self.beyond_360 {
            end - start
        } else {
            (end - start).map(|d| (d + 180.0).rem_euclid(360.0) - 180.0)
        };
        (start, change)
    }
}

impl<T: 'static> Plugin<T> for RotationPlugin<T> {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn property(&self) -> &str {
        self.property.name()
    }

    fn capture(&mut self, target: &T, is_from: bool) {
        let (start, change) = self.resolve(self.property.get(target), is_from);
        self.start = start;
        self.change = change;
    }

    /// In revolutions, so speeds are revolutions per second.
    fn change_magnitude(&self) -> f32 {
        self.change.length() / 360.0
    }

    fn preview_magnitude(&self, target: &T, is_from: bool) -> f32 {
        self.resolve(self.property.get(target), is_from).1.length() / 360.0
    }

    fn apply(&mut self, elapsed: f32, target: &mut T) {
        let core = &self.core;
        let degrees = Vec3::new(
            core.ease(elapsed, self.start.x, self.change.x),
            core.ease(elapsed, self.start.y, self.change.y),
            core.ease(elapsed, self.start.z, self.change.z),
        );
        self.property.set(target, to_quat(degrees));
    }

    fn set_incremental(&mut self, diff: i32) {
        self.start += self.change * diff as f32;
    }

    fn write_start(&mut self, target: &mut T) {
        self.property.set(target, to_quat(self.start));
    }
}
