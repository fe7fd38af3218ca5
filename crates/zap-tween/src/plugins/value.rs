//! Generic interpolation of any [`Tweenable`] property: scalars, vectors and
//! colors all go through this one plugin.

use crate::core::error::{Result, TweenError};
use crate::core::target::Property;
use crate::extensions::easing::{EaseShape, Easing};
use super::{Plugin, PluginCore, Tweenable};

pub struct ValuePlugin<T, V: Tweenable> {
    core: PluginCore,
    property: Property<T, V>,
    /// End value as configured (or the start value for from-tweens).
    value: V,
    start: V,
    end: V,
    change: V,
}

impl<T, V: Tweenable> ValuePlugin<T, V> {
    /// Animate `property` to `value`.
    pub fn new(property: Property<T, V>, value: V) -> Result<Self> {
        if !value.is_finite() {
            return Err(TweenError::NonFiniteValue {
                property: property.name().to_string(),
            });
        }
        Ok(Self {
            core: PluginCore::new(),
            property,
            value,
            start: value,
            end: value,
            change: value - value,
        })
    }

    /// Animate `property` by `delta` from wherever it is at startup.
    pub fn relative(property: Property<T, V>, delta: V) -> Result<Self> {
        let mut plugin = Self::new(property, delta)?;
        plugin.core.set_relative(true);
        Ok(plugin)
    }

    /// Use this ease instead of the tween's.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.core.set_custom_ease(easing, EaseShape::default());
        self
    }

    pub fn with_ease_shape(mut self, easing: Easing, shape: EaseShape) -> Self {
        self.core.set_custom_ease(easing, shape);
        self
    }

    pub fn start_value(&self) -> V {
        self.start
    }

    pub fn end_value(&self) -> V {
        self.end
    }

    pub fn change(&self) -> V {
        self.change
    }

    /// (start, end, change) for a given current property value.
    fn resolve(&self, current: V, is_from: bool) -> (V, V, V) {
        let relative = self.core.is_relative();
        if is_from {
            let start = if relative { current + self.value } else { self.value };
            (start, current, current - start)
        } else if relative {
            (current, current + self.value, self.value)
        } else {
            (current, self.value, self.value - current)
        }
    }
}

impl<T: 'static, V: Tweenable> Plugin<T> for ValuePlugin<T, V> {
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
        let (start, end, change) = self.resolve(self.property.get(target), is_from);
        self.start = start;
        self.end = end;
        self.change = change;
    }

    fn change_magnitude(&self) -> f32 {
        self.change.magnitude()
    }

    fn preview_magnitude(&self, target: &T, is_from: bool) -> f32 {
        self.resolve(self.property.get(target), is_from).2.magnitude()
    }

    fn apply(&mut self, elapsed: f32, target: &mut T) {
        let core = &self.core;
        let value = self.start.zip_map(self.change, |b, c| core.ease(elapsed, b, c));
        self.property.set(target, value);
    }

    fn set_incremental(&mut self, diff: i32) {
        let shift = self.change * diff as f32;
        self.start = self.start + shift;
        self.end = self.end + shift;
    }

    fn write_start(&mut self, target: &mut T) {
        self.property.set(target, self.start);
    }
}
