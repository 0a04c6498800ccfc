//! Engine-wide behavior and timing constants.
//!
//! These express intended behavior (time constants, clamp limits) and
//! keep magic numbers out of the per-frame code. Adherence-driven ramp
//! endpoints live next to their tables in `params`.

// Direction-dependent retarget durations (seconds): gains register faster
// than losses.
pub const KINDLING_SECS: f32 = 2.5;
pub const BANKING_SECS: f32 = 3.5;

// Apex eligibility boost ease window
pub const APEX_BOOST_SECS: f32 = 0.45;
// Breath micro-bursts route to the apex variant above this boost level
pub const APEX_ROUTE_THRESHOLD: f32 = 0.5;

// Touch gesture classification
pub const HOLD_THRESHOLD_SECS: f32 = 0.3;
pub const DRAG_MAX_SPEED: f32 = 1400.0; // surface units per second
pub const TAP_IMPULSE: f32 = 220.0;
// Velocity retained when hold attraction first engages
pub const HOLD_ENGAGE_VELOCITY_KEEP: f32 = 0.2;
pub const HOLD_ATTRACT_OMEGA: f32 = 3.2; // natural frequency of pointer spring
pub const HOLD_ATTRACT_DAMPING_RATIO: f32 = 0.85;

// Ambient wander spring
pub const WANDER_OMEGA: f32 = 0.9;
pub const WANDER_DAMPING_RATIO: f32 = 0.8;
pub const WANDER_REPICK_MIN_SECS: f32 = 2.5;
pub const WANDER_REPICK_MAX_SECS: f32 = 4.5;

// Gravity baseline scaled by the state-interpolated gravity multiplier
pub const GRAVITY_BASE: f32 = 320.0; // surface units / s^2, +y is down

// Collision effect gating
pub const COLLISION_SPEED_NORM: f32 = 900.0; // impact speed mapped to intensity 1.0
pub const COLLISION_EFFECT_THRESHOLD: f32 = 0.1;
pub const COLLISION_MIN_ADHERENCE: f32 = 0.25;

// Breath cycle shape
pub const INHALE_FRACTION: f32 = 0.4; // of the non-pause portion
// Catch-breath stutter band within the inhale ramp
pub const CATCH_PLATEAU_START: f32 = 0.55;
pub const CATCH_PLATEAU_END: f32 = 0.70;

// Variant amplitude multipliers
pub const SHALLOW_AMPLITUDE: f32 = 0.58;
pub const RECOVERY_AMPLITUDE: f32 = 1.18;
pub const SKIP_AMPLITUDE: f32 = 0.40;
pub const SKIP_DURATION_MUL: f32 = 0.55;
pub const SKIP_PAUSE_EXTENSION_SECS: f32 = 1.2;

// Variant roll bands, each scaled by irregularity
pub const SKIP_BAND: f32 = 0.05;
pub const SHALLOW_BAND: f32 = 0.08;
pub const CATCH_BAND: f32 = 0.17;

// Inner-core drift
pub const DRIFT_RATE_HZ: f32 = 0.11;
pub const DRIFT_AMP_BASE: f32 = 1.5; // surface units at adherence 0
pub const DRIFT_AMP_SPAN: f32 = 6.5;

// Energy wave sweep
pub const WAVE_SPEED_BASE: f32 = 0.06; // sweeps per second
pub const WAVE_SPEED_SPAN: f32 = 0.22;
pub const WAVE_OPACITY_BASE: f32 = 0.04;
pub const WAVE_OPACITY_SPAN: f32 = 0.30;
pub const WAVE_PULSE_SECS: f32 = 0.6;
pub const WAVE_PULSE_GAIN: f32 = 0.25;

// Convection layer
pub const CONVECTION_ALPHA_MAX: f32 = 0.5;
pub const CONVECTION_SPIN_MAX: f32 = 0.35; // radians per second

// Apex flare envelope at each inhale peak
pub const APEX_FLARE_SECS: f32 = 0.8;
pub const APEX_FLARE_ALPHA: f32 = 0.85;

// Most recent VFX event ids retained for dedup; older ids are evicted
// so the set stays bounded over a long-lived engine.
pub const VFX_DEDUP_WINDOW: usize = 256;

// One-shot visual effect windows (seconds)
pub const FLASH_SECS: f32 = 0.35;
pub const SCALE_POP_SECS: f32 = 0.45;
pub const STRIATION_PULSE_SECS: f32 = 0.5;
pub const RING_BURST_SECS: f32 = 0.8;
pub const RING_EXPANSION: f32 = 140.0; // ring radius growth over its lifetime
pub const APEX_RING_COUNT: u32 = 3;
pub const APEX_RING_STAGGER_SECS: f32 = 0.12;
