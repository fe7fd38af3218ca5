//! Moves a `Vec3` property along a Catmull-Rom path at constant speed.

use glam::Vec3;

use crate::core::error::{Result, TweenError};
use crate::core::target::Property;
use crate::extensions::easing::{EaseShape, Easing};
use crate::extensions::path::Path;
use super::{Plugin, PluginCore, TweenSettings};

/// Per-axis tolerance below which the current value counts as already
/// sitting on the first waypoint.
const ON_PATH_EPSILON: f32 = 0.001;

struct Orientation<T> {
    property: Property<T, Vec3>,
    look_ahead: f32,
}

pub struct PathPlugin<T> {
    core: PluginCore,
    property: Property<T, Vec3>,
    waypoints: Vec<Vec3>,
    closed: bool,
    path: Option<Path>,
    /// Last waypoint minus first, the shift applied per incremental loop.
    diff_change: Vec3,
    orientation: Option<Orientation<T>>,
}

impl<T> PathPlugin<T> {
    pub fn new(property: Property<T, Vec3>, waypoints: Vec<Vec3>) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(TweenError::PathTooShort {
                property: property.name().to_string(),
                count: waypoints.len(),
            });
        }
        if waypoints.iter().any(|p| !p.is_finite()) {
            return Err(TweenError::NonFiniteValue {
                property: property.name().to_string(),
            });
        }
        Ok(Self {
            core: PluginCore::new(),
            property,
            waypoints,
            closed: false,
            path: None,
            diff_change: Vec3::ZERO,
            orientation: None,
        })
    }

    /// Waypoints are offsets: the path is moved so it starts at the
    /// property's value at startup.
    pub fn relative(property: Property<T, Vec3>, waypoints: Vec<Vec3>) -> Result<Self> {
        let mut plugin = Self::new(property, waypoints)?;
        plugin.core.set_relative(true);
        Ok(plugin)
    }

    /// Return to the first waypoint at the end.
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.core.set_custom_ease(easing, EaseShape::default());
        self
    }

    /// Also write the unit direction towards the point `look_ahead` further
    /// along the path (as a path fraction) into `property`.
    pub fn orient_to_path(mut self, property: Property<T, Vec3>, look_ahead: f32) -> Self {
        self.orientation = Some(Orientation {
            property,
            look_ahead: look_ahead.clamp(0.0001, 0.9999),
        });
        self
    }

    /// The path built at startup.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Share of the path length between two waypoints; 0 before startup.
    pub fn waypoints_length_percentage(&self, from: usize, to: usize) -> f32 {
        self.path
            .as_ref()
            .map_or(0.0, |p| p.waypoints_length_percentage(from, to))
    }

    /// Path for a given current property value.
    fn build(&self, current: Vec3, is_from: bool) -> Path {
        let mut points = self.waypoints.clone();
        if is_from {
            points.reverse();
        }
        if self.core.is_relative() {
            let shift = current - points[0];
            for p in &mut points {
                *p += shift;
            }
        } else {
            let anchor = if is_from { points[points.len() - 1] } else { points[0] };
            let off_path = (current - anchor).abs().max_element() > ON_PATH_EPSILON;
            if off_path {
                if is_from {
                    points.push(current);
                } else {
                    points.insert(0, current);
                }
            }
        }
        Path::build(&points, self.closed)
    }
}

impl<T: 'static> Plugin<T> for PathPlugin<T> {
    fn core(&self) -> &PluginCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PluginCore {
        &mut self.core
    }

    fn property(&self) -> &str {
        self.property.name()
    }

    fn attach(&mut self, settings: &TweenSettings) {
        self.core.attach(settings);
        if settings.is_from && self.core.is_relative() {
            log::warn!(
                "relative path on `{}` cannot be combined with a from-tween; using absolute waypoints",
                self.property.name()
            );
            self.core.set_relative(false);
        }
    }

    fn capture(&mut self, target: &T, is_from: bool) {
        let path = self.build(self.property.get(target), is_from);
        let points = path.points();
        self.diff_change = if self.closed {
            Vec3::ZERO
        } else {
            points[points.len() - 2] - points[1]
        };
        self.path = Some(path);
    }

    fn change_magnitude(&self) -> f32 {
        self.path.as_ref().map_or(0.0, Path::length)
    }

    fn preview_magnitude(&self, target: &T, is_from: bool) -> f32 {
        self.build(self.property.get(target), is_from).length()
    }

    fn apply(&mut self, elapsed: f32, target: &mut T) {
        let perc = self.core.ease(elapsed, 0.0, 1.0);
        let Some(path) = self.path.as_mut() else {
            return;
        };
        path.refresh();
        let point = path.const_point(perc);
        self.property.set(target, point);

        if let Some(orient) = &self.orientation {
            let mut ahead = perc + orient.look_ahead;
            if ahead > 1.0 {
                ahead = if path.is_closed() { ahead - 1.0 } else { 1.0 };
            }
            let dir = (path.const_point(ahead) - point).normalize_or_zero();
            if dir != Vec3::ZERO {
                orient.property.set(target, dir);
            }
        }
    }

    fn set_incremental(&mut self, diff: i32) {
        if self.closed {
            return;
        }
        if let Some(path) = self.path.as_mut() {
            path.translate(self.diff_change * diff as f32);
        }
    }

    fn write_start(&mut self, target: &mut T) {
        if let Some(path) = self.path.as_mut() {
            path.refresh();
            self.property.set(target, path.const_point(0.0));
        }
    }

    fn is_path(&self) -> bool {
        true
    }

    fn path_point(&mut self, t: f32) -> Option<Vec3> {
        let path = self.path.as_mut()?;
        path.refresh();
        Some(path.const_point(t))
    }
}
