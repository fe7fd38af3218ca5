//! Interpolation plugins: the per-property half of a tween.
//!
//! A plugin captures start and end values from its target the first time the
//! owning tween starts, then turns the tween's loop-local elapsed time into a
//! value and writes it back. Value kinds share [`PluginCore`] for easing,
//! duration and incremental-loop bookkeeping.

pub mod tweenable;
pub mod value;
pub mod rotation;
#[cfg(feature = "paths")]
pub mod path;

use glam::Vec3;

use crate::api::types::LoopType;
use crate::extensions::easing::{EaseShape, Easing};

pub use tweenable::Tweenable;
pub use value::ValuePlugin;
pub use rotation::RotationPlugin;
#[cfg(feature = "paths")]
pub use path::PathPlugin;

/// Tween-level settings handed to a plugin when it is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSettings {
    /// Duration in seconds, or speed for speed-based tweens.
    pub duration: f32,
    pub easing: Easing,
    pub ease_shape: EaseShape,
    pub is_from: bool,
    pub speed_based: bool,
}

/// Loop state of the owning tween, seen by a plugin on every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopInfo {
    pub loop_type: LoopType,
    /// Completed loops to fold into incremental baselines.
    pub incremental_loops: i32,
}

/// State every plugin carries regardless of its value type.
#[derive(Debug, Clone)]
pub struct PluginCore {
    duration: f32,
    speed: Option<f32>,
    easing: Easing,
    shape: EaseShape,
    custom_ease: bool,
    ease_reversed: bool,
    relative: bool,
    started: bool,
    prev_completed_loops: i32,
}

impl Default for PluginCore {
    fn default() -> Self {
        Self {
            duration: 0.0,
            speed: None,
            easing: Easing::Linear,
            shape: EaseShape::default(),
            custom_ease: false,
            ease_reversed: false,
            relative: false,
            started: false,
            prev_completed_loops: 0,
        }
    }
}

impl PluginCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn attach(&mut self, settings: &TweenSettings) {
        self.duration = settings.duration;
        self.speed = settings.speed_based.then_some(settings.duration);
        if !self.custom_ease {
            self.easing = settings.easing;
            self.shape = settings.ease_shape;
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub(crate) fn set_duration(&mut self, duration: f32) {
        self.duration = duration;
    }

    /// Configured speed for speed-based tweens.
    pub fn speed(&self) -> Option<f32> {
        self.speed
    }

    /// Seconds needed to cover `magnitude` at the configured speed.
    pub(crate) fn duration_for(&self, magnitude: f32) -> f32 {
        match self.speed {
            Some(speed) => (magnitude / speed).abs(),
            None => self.duration,
        }
    }

    /// Base ease, ignoring reversal.
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Ease used for evaluation right now.
    pub fn current_easing(&self) -> Easing {
        if self.ease_reversed {
            self.easing.inverse().unwrap_or(self.easing)
        } else {
            self.easing
        }
    }

    pub fn is_ease_reversed(&self) -> bool {
        self.ease_reversed
    }

    /// Swap to the inverse ease. Curves without an inverse stay as they are.
    pub fn reverse_ease(&mut self) {
        if self.easing.inverse().is_some() {
            self.ease_reversed = !self.ease_reversed;
        }
    }

    /// Change the ease, keeping the reversal state when the new ease allows it.
    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
        if easing.inverse().is_none() {
            self.ease_reversed = false;
        }
    }

    pub(crate) fn set_custom_ease(&mut self, easing: Easing, shape: EaseShape) {
        self.custom_ease = true;
        self.shape = shape;
        self.set_easing(easing);
    }

    pub fn has_custom_ease(&self) -> bool {
        self.custom_ease
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub(crate) fn set_relative(&mut self, relative: bool) {
        self.relative = relative;
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Eased value at `t` for a lane going from `b` by `c`.
    #[inline]
    pub fn ease(&self, t: f32, b: f32, c: f32) -> f32 {
        self.current_easing().evaluate_shaped(t, b, c, self.duration, self.shape)
    }

    /// Baseline shift owed since the last update, in change units.
    pub(crate) fn incremental_step(&mut self, loops: LoopInfo) -> i32 {
        if loops.loop_type == LoopType::Incremental {
            let diff = loops.incremental_loops - self.prev_completed_loops;
            self.prev_completed_loops = loops.incremental_loops;
            diff
        } else {
            self.unwind_incremental()
        }
    }

    /// Shift that undoes every baseline change applied so far.
    pub(crate) fn unwind_incremental(&mut self) -> i32 {
        let diff = -self.prev_completed_loops;
        self.prev_completed_loops = 0;
        diff
    }
}

/// One interpolated property of a target of type `T`.
pub trait Plugin<T> {
    fn core(&self) -> &PluginCore;
    fn core_mut(&mut self) -> &mut PluginCore;

    /// Name of the animated property.
    fn property(&self) -> &str;

    /// Capture start and end values from the target and compute the change.
    fn capture(&mut self, target: &T, is_from: bool);

    /// Size of the captured change, in the units speeds are given in.
    fn change_magnitude(&self) -> f32;

    /// Size of the change a capture would produce right now, without capturing.
    fn preview_magnitude(&self, target: &T, is_from: bool) -> f32;

    /// Write the value for loop-local time `elapsed`.
    fn apply(&mut self, elapsed: f32, target: &mut T);

    /// Shift the baseline by `diff` change vectors.
    fn set_incremental(&mut self, diff: i32);

    fn write_start(&mut self, target: &mut T);

    fn attach(&mut self, settings: &TweenSettings) {
        self.core_mut().attach(settings);
    }

    fn is_path(&self) -> bool {
        false
    }

    /// Constant-speed point at path fraction `t`, for path plugins.
    fn path_point(&mut self, _t: f32) -> Option<Vec3> {
        None
    }

    /// Single-use initialisation. Repeated calls are ignored.
    fn startup(&mut self, target: &T, settings: &TweenSettings) {
        if self.core().is_started() {
            log::warn!("startup called twice on `{}` plugin; ignored", self.property());
            return;
        }
        self.core_mut().started = true;
        self.capture(target, settings.is_from);
        let magnitude = self.change_magnitude();
        let duration = self.core().duration_for(magnitude);
        self.core_mut().set_duration(duration);
    }

    /// Duration startup would settle on for the target's current state.
    fn preview_duration(&self, target: &T, settings: &TweenSettings) -> f32 {
        if self.core().is_started() {
            return self.core().duration();
        }
        self.core().duration_for(self.preview_magnitude(target, settings.is_from))
    }

    fn update(&mut self, elapsed: f32, target: &mut T, loops: LoopInfo) {
        let diff = self.core_mut().incremental_step(loops);
        if diff != 0 {
            self.set_incremental(diff);
        }
        let elapsed = elapsed.clamp(0.0, self.core().duration());
        self.apply(elapsed, target);
    }

    /// Undo incremental shifts and write the start value.
    fn rewind(&mut self, target: &mut T) {
        let diff = self.core_mut().unwind_incremental();
        if diff != 0 {
            self.set_incremental(diff);
        }
        self.write_start(target);
    }

    fn reverse_ease(&mut self) {
        self.core_mut().reverse_ease();
    }

    fn set_easing(&mut self, easing: Easing) {
        self.core_mut().set_easing(easing);
    }
}
