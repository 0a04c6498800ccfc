//! Layered visual state: steady-state colors/sizes eased per adherence,
//! breath-modulated brightness and scale, slow drift and convection,
//! a traveling energy wave, and short one-shot effects (flash, scale
//! pop, striation pulse, ring burst) layered transiently on top.

use crate::breath::BreathSample;
use crate::constants::{
    APEX_FLARE_ALPHA, APEX_FLARE_SECS, CONVECTION_ALPHA_MAX, CONVECTION_SPIN_MAX, DRIFT_AMP_BASE,
    DRIFT_AMP_SPAN, DRIFT_RATE_HZ, FLASH_SECS, RING_BURST_SECS, RING_EXPANSION, SCALE_POP_SECS,
    STRIATION_PULSE_SECS, WAVE_OPACITY_BASE, WAVE_OPACITY_SPAN, WAVE_PULSE_GAIN, WAVE_PULSE_SECS,
    WAVE_SPEED_BASE, WAVE_SPEED_SPAN,
};
use crate::ease::{clamp01, ease_in_out_quad, ease_out_cubic, Easing};
use crate::frame::{LayerStack, LayerVisual, RingInstance};
use crate::params::{BreathTargets, LayerColorTargets};
use crate::transition::Transition;
use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::{PI, TAU};

/// One-shot visual effect kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OneShotKind {
    Flash,
    ScalePop,
    StriationPulse,
    RingBurst,
}

impl OneShotKind {
    fn duration(self) -> f32 {
        match self {
            OneShotKind::Flash => FLASH_SECS,
            OneShotKind::ScalePop => SCALE_POP_SECS,
            OneShotKind::StriationPulse => STRIATION_PULSE_SECS,
            OneShotKind::RingBurst => RING_BURST_SECS,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct OneShot {
    kind: OneShotKind,
    start: f32,
    strength: f32,
}

pub struct VisualRenderer {
    colors: Transition<LayerColorTargets>,
    /// Eased copy of the adherence fraction; ambient intensities (drift
    /// amplitude, convection, wave opacity) read this so an animated
    /// update never steps them.
    adherence: Transition<f32>,
    drift_phase: f32,
    /// Accumulated sweep phase in [0, 1); advanced per frame.
    wave_phase: f32,
    /// Accumulated convection rotation in radians; advanced per frame.
    convection_angle: f32,
    one_shots: SmallVec<[OneShot; 8]>,
    wave_pulse_start: Option<f32>,
    flare_start: Option<f32>,
}

impl VisualRenderer {
    pub fn new(adherence: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            colors: Transition::fixed(LayerColorTargets::at(adherence), Easing::QuadInOut),
            adherence: Transition::fixed(clamp01(adherence), Easing::QuadInOut),
            drift_phase: rng.gen::<f32>() * TAU,
            wave_phase: rng.gen::<f32>(),
            convection_angle: 0.0,
            one_shots: SmallVec::new(),
            wave_pulse_start: None,
            flare_start: None,
        }
    }

    /// Ease layer colors, radii, and ambient intensities toward the
    /// targets for `adherence`.
    pub fn retarget(&mut self, adherence: f32, duration: f32) {
        self.colors.retarget(LayerColorTargets::at(adherence), duration);
        self.adherence.retarget(clamp01(adherence), duration);
    }

    pub fn current(&self) -> LayerColorTargets {
        self.colors.value()
    }

    /// Start a one-shot effect at `start` (which may lie slightly in the
    /// future, for staggered ring trains).
    pub fn trigger(&mut self, kind: OneShotKind, strength: f32, start: f32) {
        self.one_shots.push(OneShot {
            kind,
            start,
            strength: clamp01(strength),
        });
    }

    /// Inhale-peak response: striation pulse, wave pulse, and -- while
    /// boosted -- the apex flare envelope.
    pub fn on_inhale_peak(&mut self, time: f32, apex_boost: f32) {
        self.trigger(OneShotKind::StriationPulse, 0.6, time);
        self.wave_pulse_start = Some(time);
        if apex_boost > 0.0 {
            self.flare_start = Some(time);
        }
    }

    /// Compose the full layer stack for this frame.
    pub fn compose(
        &mut self,
        time: f32,
        dt: f32,
        breath: &BreathSample,
        breath_params: &BreathTargets,
        apex_boost: f32,
    ) -> LayerStack {
        self.colors.advance(dt);
        self.adherence.advance(dt);
        let c = self.colors.value();
        let a = self.adherence.value();
        let dt = dt.max(0.0);

        // Accumulated phases: a rate change alters speed, never
        // position, so retargeting cannot snap the wave or convection.
        self.wave_phase = (self.wave_phase + (WAVE_SPEED_BASE + WAVE_SPEED_SPAN * a) * dt).fract();
        self.convection_angle += CONVECTION_SPIN_MAX * a * dt;

        self.one_shots
            .retain(|s| time - s.start <= s.kind.duration());

        let mut flash = 0.0;
        let mut pop = 0.0;
        let mut striation_pulse = 0.0;
        let mut rings: SmallVec<[RingInstance; 4]> = SmallVec::new();
        for s in &self.one_shots {
            let u = (time - s.start) / s.kind.duration();
            if !(0.0..=1.0).contains(&u) {
                continue; // staggered effect not yet started
            }
            let env = (PI * u).sin();
            match s.kind {
                OneShotKind::Flash => flash += env * s.strength * 0.6,
                OneShotKind::ScalePop => pop += env * s.strength * 0.15,
                OneShotKind::StriationPulse => striation_pulse += env * s.strength * 0.5,
                OneShotKind::RingBurst => rings.push(RingInstance {
                    radius: c.halo_radius * 0.3 + RING_EXPANSION * ease_out_cubic(u),
                    alpha: (1.0 - u) * 0.7 * s.strength,
                }),
            }
        }

        // Breath-driven global brightness and scale.
        let swell = breath.intensity * breath.amplitude;
        let brightness = 1.0 + swell * breath_params.brightness_range + flash;
        let scale = 1.0 + swell * breath_params.scale_range + pop;

        // Slow positional drift of the inner glow; amplitude grows with
        // adherence.
        let drift_amp = DRIFT_AMP_BASE + DRIFT_AMP_SPAN * a;
        let w = TAU * DRIFT_RATE_HZ;
        let drift = Vec2::new(
            (time * w + self.drift_phase).sin(),
            (time * w * 0.8 + self.drift_phase * 1.7).cos(),
        ) * drift_amp;

        // Traveling energy wave, pulsing at each inhale peak.
        let wave_pulse = self
            .wave_pulse_start
            .map(|t0| {
                let u = (time - t0) / WAVE_PULSE_SECS;
                if (0.0..=1.0).contains(&u) {
                    (PI * u).sin() * WAVE_PULSE_GAIN
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0);

        // Apex flare: fully suppressed at zero boost, a brief sine flash
        // at each inhale peak when boosted.
        let flare_alpha = if apex_boost <= 0.0 {
            0.0
        } else {
            self.flare_start
                .map(|t0| {
                    let u = (time - t0) / APEX_FLARE_SECS;
                    if (0.0..=1.0).contains(&u) {
                        (PI * u).sin() * APEX_FLARE_ALPHA * clamp01(apex_boost)
                    } else {
                        0.0
                    }
                })
                .unwrap_or(0.0)
        };

        LayerStack {
            inner_core: LayerVisual {
                color: c.core,
                alpha: clamp01(0.85 * brightness),
                scale,
                offset: drift,
                rotation: 0.0,
            },
            glow: LayerVisual {
                color: c.glow,
                alpha: clamp01(0.6 * brightness),
                scale: 1.0 + swell * breath_params.scale_range * 1.4,
                offset: drift * 0.5,
                rotation: 0.0,
            },
            surface: LayerVisual {
                color: c.surface,
                alpha: clamp01(0.9 + flash * 0.3),
                scale: 1.0 + swell * breath_params.scale_range * 0.6,
                offset: Vec2::ZERO,
                rotation: 0.0,
            },
            striation: LayerVisual {
                color: c.striation,
                alpha: clamp01(0.2 + 0.3 * a + striation_pulse),
                scale,
                offset: Vec2::ZERO,
                rotation: 0.0,
            },
            convection: LayerVisual {
                color: c.glow,
                alpha: CONVECTION_ALPHA_MAX * ease_in_out_quad(a),
                scale: 1.0,
                offset: Vec2::ZERO,
                rotation: self.convection_angle,
            },
            energy_wave: LayerVisual {
                color: c.striation,
                alpha: clamp01(WAVE_OPACITY_BASE + WAVE_OPACITY_SPAN * a + wave_pulse),
                scale: 1.0,
                offset: Vec2::ZERO,
                rotation: self.wave_phase,
            },
            apex_flare: LayerVisual {
                color: [1.0, 0.95, 0.75],
                alpha: clamp01(flare_alpha),
                scale,
                offset: Vec2::ZERO,
                rotation: 0.0,
            },
            glow_radius: c.glow_radius,
            halo_radius: c.halo_radius,
            rings,
        }
    }

    #[cfg(test)]
    fn active_one_shots(&self) -> usize {
        self.one_shots.len()
    }
}
