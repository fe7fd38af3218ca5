// extensions/path.rs
//
// Catmull-Rom curve through a list of control points, with an arc-length
// table for constant-speed traversal.
//
// The first and last control points only shape the tangents at the ends;
// the curve runs from points[1] to points[len - 2].

use glam::Vec3;

use crate::core::error::{Result, TweenError};
use super::easing::lerp;

/// Arc-length table samples per curve section.
const TABLE_SAMPLES_PER_SECTION: usize = 32;

// Section length integration (Vincent & Forsey).
const K_EPSILON: f32 = 1.0e-5;
const K_EPSILON2: f32 = 1.0e-6;
const K_MAX_ARC: f32 = 1.05;
const K_LEN_RATIO: f32 = 1.2;
const K_MAX_DEPTH: u32 = 16;

#[derive(Debug, Clone)]
pub struct Path {
    points: Vec<Vec3>,
    closed: bool,
    changed: bool,
    /// Cumulative length at each table sample.
    lengths: Vec<f32>,
    /// Curve parameter at each table sample.
    params: Vec<f32>,
    length: f32,
    /// Length of each waypoint-to-waypoint section.
    section_lengths: Vec<f32>,
}

impl Path {
    /// Curve through `waypoints`, adding the two tangent control points.
    /// Closed paths return to the first waypoint.
    pub fn through(waypoints: &[Vec3], closed: bool) -> Result<Self> {
        if waypoints.len() < 2 {
            return Err(TweenError::PathTooShort {
                property: "path".into(),
                count: waypoints.len(),
            });
        }
        Ok(Self::build(waypoints, closed))
    }

    /// Same as [`through`](Self::through) for callers that already checked
    /// there are at least two waypoints.
    pub(crate) fn build(waypoints: &[Vec3], closed: bool) -> Self {
        let mut points = Vec::with_capacity(waypoints.len() + 3);
        points.push(Vec3::ZERO);
        points.extend_from_slice(waypoints);
        if closed {
            points.push(waypoints[0]);
        }
        points.push(Vec3::ZERO);
        Self::from_control_points(points, closed)
    }

    /// Curve over `points`, where the first and last entries are tangent
    /// controls that get recomputed from their neighbours. Needs at least 4.
    fn from_control_points(mut points: Vec<Vec3>, closed: bool) -> Self {
        let n = points.len();
        debug_assert!(n >= 4, "a path needs two waypoints and two controls");
        if closed {
            points[n - 2] = points[1];
            points[0] = points[n - 3];
            points[n - 1] = points[2];
        } else {
            points[0] = points[1];
            let last = points[n - 2];
            let before = points[n - 3];
            points[n - 1] = last + (last - before);
        }
        let mut path = Self {
            points,
            closed,
            changed: true,
            lengths: Vec::new(),
            params: Vec::new(),
            length: 0.0,
            section_lengths: Vec::new(),
        };
        path.rebuild();
        path
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of curve sections between consecutive waypoints.
    pub fn section_count(&self) -> usize {
        self.points.len() - 3
    }

    /// Total length, as measured by the arc-length table.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Whether points moved since the table was last built.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Position at curve parameter `t` in [0, 1]. Sections share the range
    /// equally, so equal steps in `t` are not equal steps in distance.
    pub fn point(&self, t: f32) -> Vec3 {
        let (i, u) = self.locate(t);
        let a = self.points[i];
        let b = self.points[i + 1];
        let c = self.points[i + 2];
        let d = self.points[i + 3];
        0.5 * ((-a + 3.0 * b - 3.0 * c + d) * (u * u * u)
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * (u * u)
            + (-a + c) * u
            + 2.0 * b)
    }

    /// Derivative of [`point`](Self::point) with respect to the local section parameter.
    pub fn velocity(&self, t: f32) -> Vec3 {
        let (i, u) = self.locate(t);
        let a = self.points[i];
        let b = self.points[i + 1];
        let c = self.points[i + 2];
        let d = self.points[i + 3];
        1.5 * (-a + 3.0 * b - 3.0 * c + d) * (u * u)
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * u
            + 0.5 * c
            - 0.5 * a
    }

    /// Section index and local parameter for global parameter `t`.
    fn locate(&self, t: f32) -> (usize, f32) {
        let sections = self.section_count();
        let scaled = t.clamp(0.0, 1.0) * sections as f32;
        let i = (scaled.floor() as usize).min(sections - 1);
        (i, scaled - i as f32)
    }

    /// Position at arc-length fraction `t` in [0, 1].
    pub fn const_point(&self, t: f32) -> Vec3 {
        self.point(self.const_param(t))
    }

    /// Curve parameter that lies at arc-length fraction `t`.
    pub fn const_param(&self, t: f32) -> f32 {
        if t <= 0.0 || self.length <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let target = t * self.length;
        let i = self.lengths.partition_point(|&len| len < target).max(1);
        let (l0, l1) = (self.lengths[i - 1], self.lengths[i]);
        let span = l1 - l0;
        let frac = if span > 0.0 { (target - l0) / span } else { 0.0 };
        lerp(self.params[i - 1], self.params[i], frac)
    }

    /// Move every control point by `delta`; the table is rebuilt on the next refresh.
    pub fn translate(&mut self, delta: Vec3) {
        for p in &mut self.points {
            *p += delta;
        }
        self.changed = true;
    }

    /// Rebuild the arc-length table if points moved.
    pub fn refresh(&mut self) {
        if self.changed {
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        let samples = self.section_count() * TABLE_SAMPLES_PER_SECTION;
        self.store_arc_length_table(samples);
        self.section_lengths = (0..self.section_count())
            .map(|s| self.section_length(s))
            .collect();
        self.changed = false;
    }

    /// Sample the curve at `subdivisions` equal parameter steps and store
    /// the cumulative polyline length at each.
    pub fn store_arc_length_table(&mut self, subdivisions: usize) {
        let subdivisions = subdivisions.max(1);
        self.params.clear();
        self.lengths.clear();
        self.params.reserve(subdivisions + 1);
        self.lengths.reserve(subdivisions + 1);

        let mut total = 0.0;
        let mut prev = self.point(0.0);
        self.params.push(0.0);
        self.lengths.push(0.0);
        for i in 1..=subdivisions {
            let t = i as f32 / subdivisions as f32;
            let p = self.point(t);
            total += p.distance(prev);
            prev = p;
            self.params.push(t);
            self.lengths.push(total);
        }
        self.length = total;
    }

    /// Length of one waypoint-to-waypoint section.
    fn section_length(&self, section: usize) -> f32 {
        let sections = self.section_count() as f32;
        let t0 = section as f32 / sections;
        let t1 = (section + 1) as f32 / sections;
        self.arc_length(t0, t1)
    }

    /// Arc length between curve parameters `t0` and `t1`.
    pub fn arc_length(&self, t0: f32, t1: f32) -> f32 {
        let a = self.point(t0);
        let b = self.point(t1);
        self.subdivide_length(t0, t1, a, b, a.distance(b), 0)
    }

    fn subdivide_length(&self, t0: f32, t1: f32, p0: Vec3, p1: Vec3, chord: f32, depth: u32) -> f32 {
        let mid_t = (t0 + t1) * 0.5;
        let mid = self.point(mid_t);
        let left = p0.distance(mid);
        let right = mid.distance(p1);
        let halves = left + right;

        let settled = depth >= K_MAX_DEPTH
            || halves <= K_EPSILON
            || (t1 - t0) <= K_EPSILON2
            || (halves <= chord * K_MAX_ARC && (left.max(right) <= left.min(right) * K_LEN_RATIO));
        if settled {
            // Richardson extrapolation of the two-chord estimate.
            return halves + (halves - chord) / 3.0;
        }
        self.subdivide_length(t0, mid_t, p0, mid, left, depth + 1)
            + self.subdivide_length(mid_t, t1, mid, p1, right, depth + 1)
    }

    /// Share of the total length covered between waypoints `from` and `to`
    /// (waypoint indices, `to` exclusive of the sections after it).
    pub fn waypoints_length_percentage(&self, from: usize, to: usize) -> f32 {
        let total: f32 = self.section_lengths.iter().sum();
        if total <= 0.0 || to <= from {
            return 0.0;
        }
        let to = to.min(self.section_lengths.len());
        let covered: f32 = self.section_lengths[from.min(to)..to].iter().sum();
        covered / total
    }
}
