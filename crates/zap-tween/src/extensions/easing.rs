// extensions/easing.rs
//
// Pure easing functions for animation interpolation.
// Every curve is a normalized shape `g(x)` with g(0) = 0 and g(1) = 1; the
// classic four-argument form `f(t, b, c, d)` is `b + c * g(t / d)`.

use std::f32::consts::PI;
use serde::{Deserialize, Serialize};

const TAU: f32 = PI * 2.0;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Sine wave easing (smooth).
    SineIn,
    SineOut,
    SineInOut,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Slow start and end.
    QuadInOut,
    /// Stronger slow start.
    CubicIn,
    /// Stronger slow end.
    CubicOut,
    /// Stronger slow start and end.
    CubicInOut,
    /// Very strong slow start.
    QuartIn,
    /// Very strong slow end.
    QuartOut,
    /// Very strong slow start and end.
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
    /// Exponential easing (dramatic).
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    /// Circular arc.
    CircIn,
    CircOut,
    CircInOut,
    /// Elastic spring. Shaped by amplitude and period.
    ElasticIn,
    ElasticOut,
    ElasticInOut,
    /// Overshoot then settle. Shaped by overshoot.
    BackIn,
    BackOut,
    BackInOut,
    /// Bouncy finish.
    BounceIn,
    BounceOut,
    BounceInOut,
}

/// Extra parameters for the Back and Elastic families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EaseShape {
    /// Back overshoot amount.
    pub overshoot: f32,
    /// Elastic amplitude as a multiple of the change; values below 1 mean "auto".
    pub amplitude: f32,
    /// Elastic period as a fraction of the duration; 0 picks the family default.
    pub period: f32,
}

impl Default for EaseShape {
    fn default() -> Self {
        Self {
            overshoot: 1.70158,
            amplitude: 0.0,
            period: 0.0,
        }
    }
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// Returns the eased value, also typically in [0, 1] (but can overshoot for Back/Elastic).
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        self.apply_shaped(t, EaseShape::default())
    }

    /// Classic form: value at time `t` of a change `c` from `b` over duration `d`.
    #[inline]
    pub fn evaluate(self, t: f32, b: f32, c: f32, d: f32) -> f32 {
        self.evaluate_shaped(t, b, c, d, EaseShape::default())
    }

    pub fn evaluate_shaped(self, t: f32, b: f32, c: f32, d: f32, shape: EaseShape) -> f32 {
        if d <= 0.0 {
            return b + c;
        }
        b + c * self.apply_shaped(t / d, shape)
    }

    /// The ease that plays this curve backwards in time, if one exists.
    ///
    /// In and Out variants swap; symmetric curves have no inverse.
    pub fn inverse(self) -> Option<Easing> {
        use Easing::*;
        Some(match self {
            SineIn => SineOut,
            SineOut => SineIn,
            QuadIn => QuadOut,
            QuadOut => QuadIn,
            CubicIn => CubicOut,
            CubicOut => CubicIn,
            QuartIn => QuartOut,
            QuartOut => QuartIn,
            QuintIn => QuintOut,
            QuintOut => QuintIn,
            ExpoIn => ExpoOut,
            ExpoOut => ExpoIn,
            CircIn => CircOut,
            CircOut => CircIn,
            ElasticIn => ElasticOut,
            ElasticOut => ElasticIn,
            BackIn => BackOut,
            BackOut => BackIn,
            BounceIn => BounceOut,
            BounceOut => BounceIn,
            _ => return None,
        })
    }

    pub fn apply_shaped(self, t: f32, shape: EaseShape) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,

            // Sine
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,

            // Power curves
            Easing::QuadIn => t.powi(2),
            Easing::QuadOut => 1.0 - (1.0 - t).powi(2),
            Easing::QuadInOut => power_in_out(t, 2),
            Easing::CubicIn => t.powi(3),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::CubicInOut => power_in_out(t, 3),
            Easing::QuartIn => t.powi(4),
            Easing::QuartOut => 1.0 - (1.0 - t).powi(4),
            Easing::QuartInOut => power_in_out(t, 4),
            Easing::QuintIn => t.powi(5),
            Easing::QuintOut => 1.0 - (1.0 - t).powi(5),
            Easing::QuintInOut => power_in_out(t, 5),

            // Exponential
            Easing::ExpoIn => {
                if t == 0.0 { 0.0 } else { 2.0_f32.powf(10.0 * t - 10.0) }
            }
            Easing::ExpoOut => {
                if t == 1.0 { 1.0 } else { 1.0 - 2.0_f32.powf(-10.0 * t) }
            }
            Easing::ExpoInOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            // Circular
            Easing::CircIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircOut => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::CircInOut => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }

            // Elastic
            Easing::ElasticIn => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let (a, p, s) = elastic_params(shape, 0.3);
                let t = t - 1.0;
                -(a * 2.0_f32.powf(10.0 * t) * ((t - s) * TAU / p).sin())
            }
            Easing::ElasticOut => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let (a, p, s) = elastic_params(shape, 0.3);
                a * 2.0_f32.powf(-10.0 * t) * ((t - s) * TAU / p).sin() + 1.0
            }
            Easing::ElasticInOut => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let (a, p, s) = elastic_params(shape, 0.3 * 1.5);
                let t = t * 2.0 - 1.0;
                if t < 0.0 {
                    -0.5 * (a * 2.0_f32.powf(10.0 * t) * ((t - s) * TAU / p).sin())
                } else {
                    a * 2.0_f32.powf(-10.0 * t) * ((t - s) * TAU / p).sin() * 0.5 + 1.0
                }
            }

            // Back (overshoot)
            Easing::BackIn => {
                let s = shape.overshoot;
                t * t * ((s + 1.0) * t - s)
            }
            Easing::BackOut => {
                let s = shape.overshoot;
                let t = t - 1.0;
                t * t * ((s + 1.0) * t + s) + 1.0
            }
            Easing::BackInOut => {
                let s = shape.overshoot * 1.525;
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * (t * t * ((s + 1.0) * t - s))
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
                }
            }

            // Bounce
            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::BounceInOut => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

#[inline]
fn power_in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        2.0_f32.powi(power - 1) * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}

/// Returns (amplitude, period, phase shift) for the elastic family.
#[inline]
fn elastic_params(shape: EaseShape, default_period: f32) -> (f32, f32, f32) {
    let p = if shape.period > 0.0 { shape.period } else { default_period };
    if shape.amplitude < 1.0 {
        (1.0, p, p / 4.0)
    } else {
        let a = shape.amplitude;
        (a, p, p / TAU * (1.0 / a).asin())
    }
}

#[inline]
fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
