//! Pure interpolation and easing math shared by every subsystem.
//!
//! All easing functions clamp `t` to \[0, 1\] at entry and map 0 -> 0 and
//! 1 -> 1 exactly, so transitions built on them land on their targets
//! instead of drifting asymptotically.

use std::f32::consts::PI;

/// Linear interpolation between `a` and `b` by `t` (unclamped).
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp a scalar into \[0, 1\].
#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Normalized position of `x` within \[a, b\], clamped to \[0, 1\].
#[inline]
pub fn inv_lerp(a: f32, b: f32, x: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        return 0.0;
    }
    clamp01((x - a) / (b - a))
}

#[inline]
pub fn ease_in_quad(t: f32) -> f32 {
    let t = clamp01(t);
    t * t
}

#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = clamp01(t);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = clamp01(t);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[inline]
pub fn ease_in_sine(t: f32) -> f32 {
    let t = clamp01(t);
    1.0 - (t * PI / 2.0).cos()
}

#[inline]
pub fn ease_out_sine(t: f32) -> f32 {
    let t = clamp01(t);
    (t * PI / 2.0).sin()
}

#[inline]
pub fn ease_in_out_sine(t: f32) -> f32 {
    let t = clamp01(t);
    -((PI * t).cos() - 1.0) / 2.0
}

#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = clamp01(t);
    t * t * t
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = clamp01(t);
    1.0 - (1.0 - t).powi(3)
}

#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = clamp01(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Named easing curve, so transition values can carry their curve as data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    SineInOut,
    CubicOut,
    CubicInOut,
}

impl Easing {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => clamp01(t),
            Easing::QuadIn => ease_in_quad(t),
            Easing::QuadOut => ease_out_quad(t),
            Easing::QuadInOut => ease_in_out_quad(t),
            Easing::SineInOut => ease_in_out_sine(t),
            Easing::CubicOut => ease_out_cubic(t),
            Easing::CubicInOut => ease_in_out_cubic(t),
        }
    }
}
