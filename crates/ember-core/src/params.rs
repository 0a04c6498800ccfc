//! Adherence-driven parameter tables.
//!
//! Each table maps the continuous adherence fraction onto the target
//! values of one parameter group. Tables are pure and total: endpoints
//! are exact at adherence 0 and 1, every ramp is monotonic in its
//! documented direction, and inputs are clamped before use. Simulation
//! math always consumes the continuous value; [`Tier`] is display-only.

use crate::ease::{clamp01, ease_in_quad, ease_in_out_quad, ease_out_quad, inv_lerp, lerp};
use crate::transition::Lerp;
use glam::Vec2;

/// Display tier derived from adherence. Not used by simulation math.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Radiant,
    Bright,
    Steady,
    Dim,
    Faint,
}

impl Tier {
    /// Bin adherence at 0.9 / 0.7 / 0.5 / 0.3. Out-of-domain inputs are
    /// clamped first, so 1.03 reads as `Radiant` rather than falling
    /// through to the lowest bin.
    pub fn from_adherence(adherence: f32) -> Self {
        let a = clamp01(adherence);
        if a >= 0.9 {
            Tier::Radiant
        } else if a >= 0.7 {
            Tier::Bright
        } else if a >= 0.5 {
            Tier::Steady
        } else if a >= 0.3 {
            Tier::Dim
        } else {
            Tier::Faint
        }
    }
}

// ---------------------------------------------------------------------------
// Breath

// Cycle timing: fast shallow breathing when starved, long slow cycles at
// full radiance.
pub const CYCLE_DURATION_BASE: f32 = 4.0; // seconds at adherence 0
pub const CYCLE_DURATION_SPAN: f32 = 10.0;
pub const SCALE_RANGE_BASE: f32 = 0.03;
pub const SCALE_RANGE_SPAN: f32 = 0.09;
pub const BRIGHTNESS_RANGE_BASE: f32 = 0.10;
pub const BRIGHTNESS_RANGE_SPAN: f32 = 0.35;
// The trailing pause is a luxury only the well-fed core can afford.
pub const PAUSE_BASE: f32 = 0.0;
pub const PAUSE_SPAN: f32 = 3.5;
pub const IRREGULARITY_BASE: f32 = 0.85;
pub const IRREGULARITY_SPAN: f32 = -0.80; // falls toward 0.05 at adherence 1

/// Target breathing parameters for one adherence level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathTargets {
    pub cycle_duration: f32,
    pub scale_range: f32,
    pub brightness_range: f32,
    pub pause_duration: f32,
    pub irregularity: f32,
}

impl BreathTargets {
    pub fn at(adherence: f32) -> Self {
        let a = clamp01(adherence);
        Self {
            cycle_duration: CYCLE_DURATION_BASE + CYCLE_DURATION_SPAN * ease_in_out_quad(a),
            scale_range: SCALE_RANGE_BASE + SCALE_RANGE_SPAN * a,
            brightness_range: BRIGHTNESS_RANGE_BASE + BRIGHTNESS_RANGE_SPAN * a,
            // quad ease-in: the pause only really opens up near the top
            pause_duration: PAUSE_BASE + PAUSE_SPAN * ease_in_quad(a),
            irregularity: IRREGULARITY_BASE + IRREGULARITY_SPAN * ease_out_quad(a),
        }
    }
}

impl Lerp for BreathTargets {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            cycle_duration: lerp(a.cycle_duration, b.cycle_duration, t),
            scale_range: lerp(a.scale_range, b.scale_range, t),
            brightness_range: lerp(a.brightness_range, b.brightness_range, t),
            pause_duration: lerp(a.pause_duration, b.pause_duration, t),
            irregularity: lerp(a.irregularity, b.irregularity, t),
        }
    }
}

// ---------------------------------------------------------------------------
// Physics

// Buoyant extreme at adherence 1, heavy extreme at adherence 0.
pub const GRAVITY_MUL_BASE: f32 = 1.0;
pub const GRAVITY_MUL_SPAN: f32 = -0.75;
pub const RESTITUTION_BASE: f32 = 0.18;
pub const RESTITUTION_SPAN: f32 = 0.44;
pub const LINEAR_DAMPING_BASE: f32 = 3.2; // 1/s exponential velocity decay
pub const LINEAR_DAMPING_SPAN: f32 = -2.1;
pub const FRICTION_BASE: f32 = 0.35; // tangential speed lost per bounce
pub const FRICTION_SPAN: f32 = -0.27;
pub const RESPONSE_SPEED_BASE: f32 = 0.45;
pub const RESPONSE_SPEED_SPAN: f32 = 0.55;
// Wander target placement, as fractions of the surface extent
pub const WANDER_HEIGHT_BASE: f32 = 0.18;
pub const WANDER_HEIGHT_SPAN: f32 = 0.37;
pub const WANDER_AMPLITUDE_BASE: f32 = 0.05;
pub const WANDER_AMPLITUDE_SPAN: f32 = 0.17;

/// Target physics coefficients for one adherence level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsTargets {
    pub gravity_mul: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    pub friction: f32,
    pub response_speed: f32,
    pub wander_height: f32,
    pub wander_amplitude: f32,
}

impl PhysicsTargets {
    pub fn at(adherence: f32) -> Self {
        let a = clamp01(adherence);
        Self {
            gravity_mul: GRAVITY_MUL_BASE + GRAVITY_MUL_SPAN * a,
            restitution: RESTITUTION_BASE + RESTITUTION_SPAN * a,
            linear_damping: LINEAR_DAMPING_BASE + LINEAR_DAMPING_SPAN * a,
            friction: FRICTION_BASE + FRICTION_SPAN * a,
            response_speed: RESPONSE_SPEED_BASE + RESPONSE_SPEED_SPAN * a,
            wander_height: WANDER_HEIGHT_BASE + WANDER_HEIGHT_SPAN * a,
            wander_amplitude: WANDER_AMPLITUDE_BASE + WANDER_AMPLITUDE_SPAN * a,
        }
    }
}

impl Lerp for PhysicsTargets {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            gravity_mul: lerp(a.gravity_mul, b.gravity_mul, t),
            restitution: lerp(a.restitution, b.restitution, t),
            linear_damping: lerp(a.linear_damping, b.linear_damping, t),
            friction: lerp(a.friction, b.friction, t),
            response_speed: lerp(a.response_speed, b.response_speed, t),
            wander_height: lerp(a.wander_height, b.wander_height, t),
            wander_amplitude: lerp(a.wander_amplitude, b.wander_amplitude, t),
        }
    }
}

// ---------------------------------------------------------------------------
// Emitters

/// Continuous emitter kinds, one pool each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmitterKind {
    Spark,
    Streak,
    Ember,
    Smoke,
    Ash,
}

impl EmitterKind {
    pub const ALL: [EmitterKind; 5] = [
        EmitterKind::Spark,
        EmitterKind::Streak,
        EmitterKind::Ember,
        EmitterKind::Smoke,
        EmitterKind::Ash,
    ];
}

// Activation thresholds for the high-adherence emitters and fade-out
// points for the failure emitters.
pub const STREAK_THRESHOLD: f32 = 0.75;
pub const EMBER_THRESHOLD: f32 = 0.85;
pub const SMOKE_FADE_END: f32 = 0.6;
pub const ASH_FADE_END: f32 = 0.35;

pub const SPARK_RATE_BASE: f32 = 2.0; // particles per second
pub const SPARK_RATE_SPAN: f32 = 24.0;
pub const STREAK_RATE_MAX: f32 = 8.0;
pub const EMBER_RATE_MAX: f32 = 5.0;
pub const SMOKE_RATE_MAX: f32 = 12.0;
pub const ASH_RATE_MAX: f32 = 8.0;

/// Target configuration for one continuous emitter at one adherence level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmitterTargets {
    pub birth_rate: f32,
    pub speed: f32,
    pub lifetime: f32,
    pub accel: Vec2,
    pub color: [f32; 4],
    pub size: f32,
}

impl EmitterTargets {
    pub fn at(kind: EmitterKind, adherence: f32) -> Self {
        let a = clamp01(adherence);
        match kind {
            EmitterKind::Spark => Self {
                birth_rate: SPARK_RATE_BASE + SPARK_RATE_SPAN * ease_in_quad(a),
                speed: lerp(30.0, 85.0, a),
                lifetime: lerp(0.9, 1.4, a),
                accel: Vec2::new(0.0, lerp(-40.0, -95.0, a)),
                color: [1.0, lerp(0.55, 0.8, a), lerp(0.15, 0.35, a), lerp(0.6, 0.95, a)],
                size: lerp(2.0, 3.2, a),
            },
            EmitterKind::Streak => Self {
                birth_rate: STREAK_RATE_MAX * inv_lerp(STREAK_THRESHOLD, 1.0, a),
                speed: lerp(120.0, 180.0, a),
                lifetime: 0.5,
                accel: Vec2::new(0.0, -30.0),
                color: [1.0, 0.9, 0.6, 0.8],
                size: 1.6,
            },
            EmitterKind::Ember => Self {
                birth_rate: EMBER_RATE_MAX * inv_lerp(EMBER_THRESHOLD, 1.0, a),
                speed: lerp(20.0, 40.0, a),
                lifetime: 2.2,
                accel: Vec2::new(0.0, -18.0),
                color: [1.0, 0.65, 0.2, 0.9],
                size: 2.6,
            },
            EmitterKind::Smoke => Self {
                birth_rate: SMOKE_RATE_MAX * (1.0 - inv_lerp(0.0, SMOKE_FADE_END, a)),
                speed: 18.0,
                lifetime: 2.8,
                accel: Vec2::new(0.0, -12.0),
                color: [0.45, 0.42, 0.40, lerp(0.5, 0.25, a)],
                size: lerp(7.0, 4.5, a),
            },
            EmitterKind::Ash => Self {
                birth_rate: ASH_RATE_MAX * (1.0 - inv_lerp(0.0, ASH_FADE_END, a)),
                speed: 26.0,
                lifetime: 2.0,
                accel: Vec2::new(0.0, 22.0), // ash falls
                color: [0.30, 0.28, 0.26, 0.6],
                size: 1.8,
            },
        }
    }

    /// Upper bound on the standing population this emitter can ever need,
    /// from its worst-case birth rate and lifetime.
    pub fn pool_cap(kind: EmitterKind) -> usize {
        let (max_rate, max_lifetime) = match kind {
            EmitterKind::Spark => (SPARK_RATE_BASE + SPARK_RATE_SPAN, 1.4),
            EmitterKind::Streak => (STREAK_RATE_MAX, 0.5),
            EmitterKind::Ember => (EMBER_RATE_MAX, 2.2),
            EmitterKind::Smoke => (SMOKE_RATE_MAX, 2.8),
            EmitterKind::Ash => (ASH_RATE_MAX, 2.0),
        };
        (max_rate * max_lifetime).ceil() as usize + 8
    }
}

impl Lerp for EmitterTargets {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            birth_rate: lerp(a.birth_rate, b.birth_rate, t),
            speed: lerp(a.speed, b.speed, t),
            lifetime: lerp(a.lifetime, b.lifetime, t),
            accel: Vec2::lerp(a.accel, b.accel, t),
            color: <[f32; 4] as Lerp>::lerp(a.color, b.color, t),
            size: lerp(a.size, b.size, t),
        }
    }
}

// ---------------------------------------------------------------------------
// Visual layer colors

// Dim -> radiant color ramp per layer
pub const CORE_DIM: [f32; 3] = [0.45, 0.18, 0.08];
pub const CORE_RADIANT: [f32; 3] = [1.0, 0.85, 0.45];
pub const GLOW_DIM: [f32; 3] = [0.35, 0.12, 0.04];
pub const GLOW_RADIANT: [f32; 3] = [1.0, 0.55, 0.15];
pub const SURFACE_DIM: [f32; 3] = [0.30, 0.10, 0.05];
pub const SURFACE_RADIANT: [f32; 3] = [0.95, 0.45, 0.12];
pub const STRIATION_DIM: [f32; 3] = [0.50, 0.20, 0.10];
pub const STRIATION_RADIANT: [f32; 3] = [1.0, 0.75, 0.35];

pub const GLOW_RADIUS_BASE: f32 = 40.0;
pub const GLOW_RADIUS_SPAN: f32 = 55.0;
pub const HALO_RADIUS_BASE: f32 = 70.0;
pub const HALO_RADIUS_SPAN: f32 = 80.0;

/// Target layer colors and radii for one adherence level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerColorTargets {
    pub core: [f32; 3],
    pub glow: [f32; 3],
    pub surface: [f32; 3],
    pub striation: [f32; 3],
    pub glow_radius: f32,
    pub halo_radius: f32,
}

impl LayerColorTargets {
    pub fn at(adherence: f32) -> Self {
        let a = clamp01(adherence);
        Self {
            core: <[f32; 3] as Lerp>::lerp(CORE_DIM, CORE_RADIANT, a),
            glow: <[f32; 3] as Lerp>::lerp(GLOW_DIM, GLOW_RADIANT, a),
            surface: <[f32; 3] as Lerp>::lerp(SURFACE_DIM, SURFACE_RADIANT, a),
            striation: <[f32; 3] as Lerp>::lerp(STRIATION_DIM, STRIATION_RADIANT, a),
            glow_radius: GLOW_RADIUS_BASE + GLOW_RADIUS_SPAN * a,
            halo_radius: HALO_RADIUS_BASE + HALO_RADIUS_SPAN * a,
        }
    }
}

impl Lerp for LayerColorTargets {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self {
            core: <[f32; 3] as Lerp>::lerp(a.core, b.core, t),
            glow: <[f32; 3] as Lerp>::lerp(a.glow, b.glow, t),
            surface: <[f32; 3] as Lerp>::lerp(a.surface, b.surface, t),
            striation: <[f32; 3] as Lerp>::lerp(a.striation, b.striation, t),
            glow_radius: lerp(a.glow_radius, b.glow_radius, t),
            halo_radius: lerp(a.halo_radius, b.halo_radius, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_bins_and_clamps() {
        assert_eq!(Tier::from_adherence(1.0), Tier::Radiant);
        assert_eq!(Tier::from_adherence(0.9), Tier::Radiant);
        assert_eq!(Tier::from_adherence(0.89), Tier::Bright);
        assert_eq!(Tier::from_adherence(0.7), Tier::Bright);
        assert_eq!(Tier::from_adherence(0.5), Tier::Steady);
        assert_eq!(Tier::from_adherence(0.3), Tier::Dim);
        assert_eq!(Tier::from_adherence(0.29), Tier::Faint);
        // Out-of-domain values clamp rather than falling through.
        assert_eq!(Tier::from_adherence(1.2), Tier::Radiant);
        assert_eq!(Tier::from_adherence(-0.5), Tier::Faint);
    }

    #[test]
    fn breath_endpoints_are_exact() {
        let low = BreathTargets::at(0.0);
        let high = BreathTargets::at(1.0);
        assert_eq!(low.cycle_duration, CYCLE_DURATION_BASE);
        assert_eq!(high.cycle_duration, CYCLE_DURATION_BASE + CYCLE_DURATION_SPAN);
        assert_eq!(low.pause_duration, PAUSE_BASE);
        assert!((high.pause_duration - (PAUSE_BASE + PAUSE_SPAN)).abs() < 1e-5);
        assert_eq!(low.irregularity, IRREGULARITY_BASE);
        assert!((high.irregularity - (IRREGULARITY_BASE + IRREGULARITY_SPAN)).abs() < 1e-5);
    }

    #[test]
    fn breath_ramps_are_monotonic() {
        let mut prev = BreathTargets::at(0.0);
        for i in 1..=100 {
            let cur = BreathTargets::at(i as f32 / 100.0);
            assert!(cur.cycle_duration >= prev.cycle_duration);
            assert!(cur.scale_range >= prev.scale_range);
            assert!(cur.brightness_range >= prev.brightness_range);
            assert!(cur.pause_duration >= prev.pause_duration);
            assert!(cur.irregularity <= prev.irregularity);
            prev = cur;
        }
    }

    #[test]
    fn physics_buoyant_versus_heavy_extremes() {
        let heavy = PhysicsTargets::at(0.0);
        let buoyant = PhysicsTargets::at(1.0);
        assert!(buoyant.gravity_mul < heavy.gravity_mul);
        assert!(buoyant.restitution > heavy.restitution);
        assert!(buoyant.linear_damping < heavy.linear_damping);
        assert!(buoyant.friction < heavy.friction);
        assert!(buoyant.response_speed > heavy.response_speed);
        assert!(buoyant.wander_height > heavy.wander_height);
        assert_eq!(heavy.gravity_mul, GRAVITY_MUL_BASE);
        assert_eq!(buoyant.gravity_mul, GRAVITY_MUL_BASE + GRAVITY_MUL_SPAN);
    }

    #[test]
    fn physics_ramps_are_monotonic() {
        let mut prev = PhysicsTargets::at(0.0);
        for i in 1..=100 {
            let cur = PhysicsTargets::at(i as f32 / 100.0);
            assert!(cur.gravity_mul <= prev.gravity_mul);
            assert!(cur.restitution >= prev.restitution);
            assert!(cur.linear_damping <= prev.linear_damping);
            assert!(cur.response_speed >= prev.response_speed);
            prev = cur;
        }
    }

    #[test]
    fn spark_rate_rises_smoke_falls() {
        let mut prev_spark = EmitterTargets::at(EmitterKind::Spark, 0.0).birth_rate;
        let mut prev_smoke = EmitterTargets::at(EmitterKind::Smoke, 0.0).birth_rate;
        for i in 1..=100 {
            let a = i as f32 / 100.0;
            let spark = EmitterTargets::at(EmitterKind::Spark, a).birth_rate;
            let smoke = EmitterTargets::at(EmitterKind::Smoke, a).birth_rate;
            assert!(spark >= prev_spark);
            assert!(smoke <= prev_smoke);
            prev_spark = spark;
            prev_smoke = smoke;
        }
        assert_eq!(prev_spark, SPARK_RATE_BASE + SPARK_RATE_SPAN);
        assert_eq!(prev_smoke, 0.0);
    }

    #[test]
    fn high_adherence_emitters_gate_on_thresholds() {
        assert_eq!(EmitterTargets::at(EmitterKind::Streak, 0.74).birth_rate, 0.0);
        assert!(EmitterTargets::at(EmitterKind::Streak, 0.9).birth_rate > 0.0);
        assert_eq!(EmitterTargets::at(EmitterKind::Ember, 0.8).birth_rate, 0.0);
        assert!(EmitterTargets::at(EmitterKind::Ember, 0.95).birth_rate > 0.0);
        assert_eq!(EmitterTargets::at(EmitterKind::Ash, 0.5).birth_rate, 0.0);
        assert!(EmitterTargets::at(EmitterKind::Ash, 0.1).birth_rate > 0.0);
    }

    #[test]
    fn smoke_gone_above_fade_end() {
        for i in 60..=100 {
            let a = i as f32 / 100.0;
            assert_eq!(EmitterTargets::at(EmitterKind::Smoke, a).birth_rate, 0.0);
        }
    }

    #[test]
    fn pool_caps_cover_worst_case_population() {
        for kind in EmitterKind::ALL {
            let cap = EmitterTargets::pool_cap(kind);
            let worst = EmitterTargets::at(kind, 0.0)
                .birth_rate
                .max(EmitterTargets::at(kind, 1.0).birth_rate);
            let life = EmitterTargets::at(kind, 0.0)
                .lifetime
                .max(EmitterTargets::at(kind, 1.0).lifetime);
            assert!(cap as f32 >= worst * life);
        }
    }

    #[test]
    fn layer_colors_brighten_with_adherence() {
        let dim = LayerColorTargets::at(0.0);
        let radiant = LayerColorTargets::at(1.0);
        assert_eq!(dim.core, CORE_DIM);
        assert_eq!(radiant.core, CORE_RADIANT);
        for c in 0..3 {
            assert!(radiant.core[c] >= dim.core[c]);
            assert!(radiant.glow[c] >= dim.glow[c]);
        }
        assert!(radiant.glow_radius > dim.glow_radius);
        assert!(radiant.halo_radius > dim.halo_radius);
    }
}
