//! Autonomous breathing oscillator.
//!
//! Produces a 0..1 intensity and a phase segment every frame. A cycle
//! accumulator wraps once per breath; each wraparound rolls the next
//! irregularity variant from a seeded RNG, weighted by the current
//! irregularity parameter. Variant selection is a pure function of
//! `(state, rolls)` so it is testable without timers.

use crate::constants::{
    CATCH_BAND, CATCH_PLATEAU_END, CATCH_PLATEAU_START, INHALE_FRACTION, RECOVERY_AMPLITUDE,
    SHALLOW_AMPLITUDE, SHALLOW_BAND, SKIP_AMPLITUDE, SKIP_BAND, SKIP_DURATION_MUL,
    SKIP_PAUSE_EXTENSION_SECS,
};
use crate::ease::{clamp01, ease_in_out_sine, Easing};
use crate::params::BreathTargets;
use crate::transition::Transition;
use rand::prelude::*;

/// Phase of the current breath cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreathSegment {
    Inhale,
    Exhale,
    Pause,
}

/// Irregularity mode layered onto the base oscillator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreathVariant {
    Normal,
    CatchBreath,
    Shallow,
    Skip,
    Recovery,
}

impl BreathVariant {
    /// Multiplier on the effective scale/brightness amplitude applied
    /// downstream. The intensity curve's shape is unchanged.
    pub fn amplitude(self) -> f32 {
        match self {
            BreathVariant::Normal | BreathVariant::CatchBreath => 1.0,
            BreathVariant::Shallow => SHALLOW_AMPLITUDE,
            BreathVariant::Recovery => RECOVERY_AMPLITUDE,
            BreathVariant::Skip => SKIP_AMPLITUDE,
        }
    }

    pub fn duration_mul(self) -> f32 {
        match self {
            BreathVariant::Skip => SKIP_DURATION_MUL,
            _ => 1.0,
        }
    }
}

/// Variant-machine state carried across cycles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariantState {
    pub variant: BreathVariant,
    /// Further shallow cycles still owed in the current run.
    pub shallow_remaining: u8,
    /// A recovery cycle is forced once the shallow run ends.
    pub pending_recovery: bool,
    /// Extra pause seconds granted by a skip cycle.
    pub pause_extension: f32,
}

impl Default for VariantState {
    fn default() -> Self {
        Self {
            variant: BreathVariant::Normal,
            shallow_remaining: 0,
            pending_recovery: false,
            pause_extension: 0.0,
        }
    }
}

/// Pure transition function rolled at each cycle wraparound.
///
/// `roll` selects the variant band, `run_roll` the shallow run length;
/// both are uniform in \[0, 1).
pub fn next_variant(state: &VariantState, irregularity: f32, roll: f32, run_roll: f32) -> VariantState {
    if state.shallow_remaining > 0 {
        return VariantState {
            variant: BreathVariant::Shallow,
            shallow_remaining: state.shallow_remaining - 1,
            pending_recovery: true,
            pause_extension: 0.0,
        };
    }
    if state.pending_recovery {
        return VariantState {
            variant: BreathVariant::Recovery,
            shallow_remaining: 0,
            pending_recovery: false,
            pause_extension: 0.0,
        };
    }
    let irr = clamp01(irregularity);
    if roll < irr * SKIP_BAND {
        VariantState {
            variant: BreathVariant::Skip,
            shallow_remaining: 0,
            pending_recovery: false,
            pause_extension: SKIP_PAUSE_EXTENSION_SECS,
        }
    } else if roll < irr * SHALLOW_BAND {
        VariantState {
            variant: BreathVariant::Shallow,
            shallow_remaining: if run_roll < 0.5 { 1 } else { 2 },
            pending_recovery: true,
            pause_extension: 0.0,
        }
    } else if roll < irr * CATCH_BAND {
        VariantState {
            variant: BreathVariant::CatchBreath,
            shallow_remaining: 0,
            pending_recovery: false,
            pause_extension: 0.0,
        }
    } else {
        VariantState::default()
    }
}

/// One frame of oscillator output.
#[derive(Clone, Copy, Debug)]
pub struct BreathSample {
    pub intensity: f32,
    pub segment: BreathSegment,
    /// Variant amplitude multiplier for downstream scale/brightness.
    pub amplitude: f32,
    pub variant: BreathVariant,
}

pub struct BreathOscillator {
    params: Transition<BreathTargets>,
    cycle_progress: f32,
    state: VariantState,
    rng: StdRng,
}

impl BreathOscillator {
    pub fn new(adherence: f32, seed: u64) -> Self {
        Self {
            params: Transition::fixed(BreathTargets::at(adherence), Easing::QuadInOut),
            cycle_progress: 0.0,
            state: VariantState::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Ease parameters toward the targets for `adherence` over `duration`
    /// seconds, independent of the breath cycle's own phase.
    pub fn retarget(&mut self, adherence: f32, duration: f32) {
        self.params.retarget(BreathTargets::at(adherence), duration);
    }

    /// Currently applied (possibly mid-transition) parameters.
    pub fn current(&self) -> BreathTargets {
        self.params.value()
    }

    pub fn variant_state(&self) -> VariantState {
        self.state
    }

    /// Advance by `dt` seconds and sample intensity and segment.
    pub fn advance(&mut self, dt: f32) -> BreathSample {
        self.params.advance(dt);
        let p = self.params.value();

        let cycle = (p.cycle_duration * self.state.variant.duration_mul()).max(0.1);
        let pause = (p.pause_duration + self.state.pause_extension).max(0.0);
        let total = cycle + pause;

        self.cycle_progress += dt.max(0.0) / total;
        while self.cycle_progress >= 1.0 {
            self.cycle_progress -= 1.0;
            let roll = self.rng.gen::<f32>();
            let run_roll = self.rng.gen::<f32>();
            self.state = next_variant(&self.state, p.irregularity, roll, run_roll);
        }

        // Recompute with the (possibly new) variant's timing.
        let cycle = (p.cycle_duration * self.state.variant.duration_mul()).max(0.1);
        let pause = (p.pause_duration + self.state.pause_extension).max(0.0);
        let total = cycle + pause;
        let t = self.cycle_progress * total;
        let inhale_len = cycle * INHALE_FRACTION;
        let exhale_len = cycle - inhale_len;

        let (intensity, segment) = if t < inhale_len {
            let mut u = t / inhale_len;
            if self.state.variant == BreathVariant::CatchBreath {
                u = catch_stutter(u);
            }
            (ease_in_out_sine(u), BreathSegment::Inhale)
        } else if t < cycle {
            let u = (t - inhale_len) / exhale_len.max(1e-4);
            (1.0 - ease_in_out_sine(u), BreathSegment::Exhale)
        } else {
            (0.0, BreathSegment::Pause)
        };

        BreathSample {
            intensity: clamp01(intensity),
            segment,
            amplitude: self.state.variant.amplitude(),
            variant: self.state.variant,
        }
    }
}

/// Remap the inhale ramp so a catch-breath holds flat mid-inhale and
/// still reaches 1.0 at the top. Continuous at both band edges.
fn catch_stutter(u: f32) -> f32 {
    if u < CATCH_PLATEAU_START {
        u
    } else if u < CATCH_PLATEAU_END {
        CATCH_PLATEAU_START
    } else {
        CATCH_PLATEAU_START
            + (u - CATCH_PLATEAU_END) * (1.0 - CATCH_PLATEAU_START) / (1.0 - CATCH_PLATEAU_END)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_stays_in_unit_range() {
        for seed in [1_u64, 7, 42] {
            for adherence in [0.0_f32, 0.3, 0.8, 1.0] {
                let mut osc = BreathOscillator::new(adherence, seed);
                for _ in 0..5000 {
                    let s = osc.advance(1.0 / 60.0);
                    assert!((0.0..=1.0).contains(&s.intensity), "{}", s.intensity);
                }
            }
        }
    }

    #[test]
    fn segments_never_skip_exhale() {
        let mut osc = BreathOscillator::new(0.2, 9);
        let mut prev = osc.advance(1.0 / 60.0).segment;
        for _ in 0..20_000 {
            let cur = osc.advance(1.0 / 60.0).segment;
            if cur != prev {
                let legal = matches!(
                    (prev, cur),
                    (BreathSegment::Inhale, BreathSegment::Exhale)
                        | (BreathSegment::Exhale, BreathSegment::Pause)
                        | (BreathSegment::Exhale, BreathSegment::Inhale)
                        | (BreathSegment::Pause, BreathSegment::Inhale)
                );
                assert!(legal, "illegal segment change {prev:?} -> {cur:?}");
                prev = cur;
            }
        }
    }

    #[test]
    fn zero_irregularity_always_rolls_normal() {
        let state = VariantState::default();
        for i in 0..100 {
            let roll = i as f32 / 100.0;
            let next = next_variant(&state, 0.0, roll, 0.5);
            assert_eq!(next.variant, BreathVariant::Normal);
        }
    }

    #[test]
    fn variant_bands_partition_by_roll() {
        let state = VariantState::default();
        // full irregularity: bands sit at 0.05 / 0.08 / 0.17
        assert_eq!(next_variant(&state, 1.0, 0.01, 0.0).variant, BreathVariant::Skip);
        assert_eq!(next_variant(&state, 1.0, 0.06, 0.0).variant, BreathVariant::Shallow);
        assert_eq!(next_variant(&state, 1.0, 0.10, 0.0).variant, BreathVariant::CatchBreath);
        assert_eq!(next_variant(&state, 1.0, 0.20, 0.0).variant, BreathVariant::Normal);
    }

    #[test]
    fn shallow_run_forces_single_recovery() {
        let mut state = next_variant(&VariantState::default(), 1.0, 0.06, 0.9);
        assert_eq!(state.variant, BreathVariant::Shallow);
        assert_eq!(state.shallow_remaining, 2);
        // Run down the shallow cycles; rolls should be ignored until done.
        state = next_variant(&state, 1.0, 0.99, 0.0);
        assert_eq!(state.variant, BreathVariant::Shallow);
        state = next_variant(&state, 1.0, 0.99, 0.0);
        assert_eq!(state.variant, BreathVariant::Shallow);
        assert_eq!(state.shallow_remaining, 0);
        state = next_variant(&state, 1.0, 0.99, 0.0);
        assert_eq!(state.variant, BreathVariant::Recovery);
        assert!(!state.pending_recovery);
        state = next_variant(&state, 1.0, 0.99, 0.0);
        assert_eq!(state.variant, BreathVariant::Normal);
    }

    #[test]
    fn skip_extends_the_following_pause() {
        let state = next_variant(&VariantState::default(), 1.0, 0.0, 0.0);
        assert_eq!(state.variant, BreathVariant::Skip);
        assert!(state.pause_extension > 0.0);
        assert!(state.variant.amplitude() < 1.0);
        assert!(state.variant.duration_mul() < 1.0);
    }

    #[test]
    fn retarget_reaches_targets_exactly() {
        let mut osc = BreathOscillator::new(0.1, 3);
        osc.retarget(0.95, 2.0);
        for _ in 0..150 {
            osc.advance(1.0 / 60.0);
        }
        let want = BreathTargets::at(0.95);
        let got = osc.current();
        assert_eq!(got.cycle_duration, want.cycle_duration);
        assert_eq!(got.pause_duration, want.pause_duration);
        assert_eq!(got.irregularity, want.irregularity);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let mut a = BreathOscillator::new(0.4, 1234);
        let mut b = BreathOscillator::new(0.4, 1234);
        for _ in 0..3000 {
            let sa = a.advance(1.0 / 60.0);
            let sb = b.advance(1.0 / 60.0);
            assert_eq!(sa.intensity, sb.intensity);
            assert_eq!(sa.segment, sb.segment);
            assert_eq!(sa.variant, sb.variant);
        }
    }

    #[test]
    fn catch_stutter_is_continuous_and_complete() {
        assert_eq!(catch_stutter(0.0), 0.0);
        assert!((catch_stutter(1.0) - 1.0).abs() < 1e-6);
        let before = catch_stutter(CATCH_PLATEAU_START - 1e-4);
        let during = catch_stutter(CATCH_PLATEAU_START + 0.05);
        let after = catch_stutter(CATCH_PLATEAU_END + 1e-4);
        assert!((before - during).abs() < 1e-3);
        assert!((after - during).abs() < 1e-3);
    }
}
