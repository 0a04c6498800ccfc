//! Generic timed transition between two values of a parameter group.
//!
//! Every slow-changing parameter in the engine (breath timing, physics
//! coefficients, emitter configs, layer colors) moves through a
//! [`Transition`]: retargeting rebases the start at the current
//! (possibly mid-flight) value so the output is always continuous, and
//! once `elapsed >= duration` the output equals the target exactly.

use crate::ease::Easing;
use glam::Vec2;

/// Minimum transition duration treated as animated; anything at or below
/// this snaps straight to the target.
pub const MIN_DURATION: f32 = 1e-4;

/// Types that can be component-wise interpolated.
pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for [f32; 3] {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        [
            f32::lerp(a[0], b[0], t),
            f32::lerp(a[1], b[1], t),
            f32::lerp(a[2], b[2], t),
        ]
    }
}

impl Lerp for [f32; 4] {
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        [
            f32::lerp(a[0], b[0], t),
            f32::lerp(a[1], b[1], t),
            f32::lerp(a[2], b[2], t),
            f32::lerp(a[3], b[3], t),
        ]
    }
}

/// A value easing from `start` to `target` over `duration` seconds.
#[derive(Clone, Copy, Debug)]
pub struct Transition<T: Lerp> {
    start: T,
    target: T,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl<T: Lerp> Transition<T> {
    /// A settled transition holding `value`.
    pub fn fixed(value: T, easing: Easing) -> Self {
        Self {
            start: value,
            target: value,
            elapsed: 0.0,
            duration: 0.0,
            easing,
        }
    }

    /// Redirect toward `target`, rebasing `start` at the current value so
    /// the output never jumps. A non-positive duration snaps.
    pub fn retarget(&mut self, target: T, duration: f32) {
        self.start = self.value();
        self.target = target;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.done() {
            self.elapsed += dt.max(0.0);
        }
    }

    /// Current interpolated value; exactly `target` once complete.
    pub fn value(&self) -> T {
        if self.done() {
            return self.target;
        }
        let t = self.easing.apply(self.elapsed / self.duration);
        T::lerp(self.start, self.target, t)
    }

    pub fn target(&self) -> T {
        self.target
    }

    pub fn done(&self) -> bool {
        self.duration <= MIN_DURATION || self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_transition_equals_target_exactly() {
        let mut tr = Transition::fixed(0.0_f32, Easing::QuadInOut);
        tr.retarget(10.0, 2.0);
        for _ in 0..30 {
            tr.advance(0.1);
        }
        // No asymptotic drift: bit-exact arrival.
        assert_eq!(tr.value(), 10.0);
        assert!(tr.done());
    }

    #[test]
    fn zero_duration_snaps() {
        let mut tr = Transition::fixed(1.0_f32, Easing::Linear);
        tr.retarget(5.0, 0.0);
        assert_eq!(tr.value(), 5.0);
    }

    #[test]
    fn retarget_rebases_at_current_value() {
        let mut tr = Transition::fixed(0.0_f32, Easing::Linear);
        tr.retarget(10.0, 1.0);
        tr.advance(0.5);
        let mid = tr.value();
        assert!((mid - 5.0).abs() < 1e-5);
        // Superseding mid-flight must not jump.
        tr.retarget(0.0, 1.0);
        assert!((tr.value() - mid).abs() < 1e-5);
    }

    #[test]
    fn value_moves_monotonically_toward_target() {
        let mut tr = Transition::fixed(2.0_f32, Easing::SineInOut);
        tr.retarget(-3.0, 1.5);
        let mut prev = tr.value();
        for _ in 0..40 {
            tr.advance(0.05);
            let v = tr.value();
            assert!(v <= prev + 1e-6);
            prev = v;
        }
        assert_eq!(prev, -3.0);
    }

    #[test]
    fn vec2_and_color_lerp_componentwise() {
        let v = Vec2::lerp(Vec2::ZERO, Vec2::new(2.0, 4.0), 0.5);
        assert!((v.x - 1.0).abs() < 1e-6 && (v.y - 2.0).abs() < 1e-6);
        let c = <[f32; 3] as Lerp>::lerp([0.0, 0.2, 1.0], [1.0, 0.4, 0.0], 0.5);
        assert!((c[0] - 0.5).abs() < 1e-6);
        assert!((c[1] - 0.3).abs() < 1e-6);
        assert!((c[2] - 0.5).abs() < 1e-6);
    }
}
