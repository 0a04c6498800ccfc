//! 2D point-mass body simulation.
//!
//! Gravity, damping, restitution and response speed are themselves
//! state-interpolated between a buoyant extreme (adherence 1) and a
//! heavy extreme (adherence 0). When untouched, a softly damped spring
//! pulls the body toward a slowly wandering target; the spring is
//! suspended entirely while a pointer is down. Touch semantics: a quick
//! release is a tap impulse, a long hold engages a gentle attraction
//! toward the pointer, and releasing after a hold sets velocity from
//! displacement over duration, clamped to a max speed.

use crate::constants::{
    COLLISION_SPEED_NORM, DRAG_MAX_SPEED, GRAVITY_BASE, HOLD_ATTRACT_DAMPING_RATIO,
    HOLD_ATTRACT_OMEGA, HOLD_ENGAGE_VELOCITY_KEEP, HOLD_THRESHOLD_SECS, TAP_IMPULSE,
    WANDER_DAMPING_RATIO, WANDER_OMEGA, WANDER_REPICK_MAX_SECS, WANDER_REPICK_MIN_SECS,
};
use crate::ease::{clamp01, Easing};
use crate::params::PhysicsTargets;
use crate::transition::Transition;
use glam::Vec2;
use rand::prelude::*;

/// Fixed rectangular boundary the body collides against.
#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec2 {
        self.max - self.min
    }
}

/// A boundary impact worth reporting upstream.
#[derive(Clone, Copy, Debug)]
pub struct CollisionInfo {
    pub point: Vec2,
    pub normal: Vec2,
    /// Impact speed normalized against [`COLLISION_SPEED_NORM`], clamped
    /// to \[0, 1\]. Gates whether a visual/particle effect fires.
    pub intensity: f32,
}

/// Host-tunable gesture thresholds. Defaults come from the engine-wide
/// constants; the orchestrator validates overrides at construction.
#[derive(Clone, Copy, Debug)]
pub struct BodyTuning {
    pub hold_threshold: f32,
    pub drag_max_speed: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            hold_threshold: HOLD_THRESHOLD_SECS,
            drag_max_speed: DRAG_MAX_SPEED,
        }
    }
}

/// Outcome of a pointer release, classified against the hold threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    Tap { position: Vec2 },
    Swipe { velocity: Vec2 },
}

#[derive(Clone, Copy, Debug)]
struct TouchSession {
    start_time: f32,
    start_position: Vec2,
    last_position: Vec2,
    hold_engaged: bool,
}

pub struct BodySimulator {
    position: Vec2,
    velocity: Vec2,
    params: Transition<PhysicsTargets>,
    force_accum: Vec2,
    bounds: Bounds,
    wander_target: Vec2,
    wander_timer: f32,
    touch: Option<TouchSession>,
    tuning: BodyTuning,
    rng: StdRng,
}

impl BodySimulator {
    pub fn new(bounds: Bounds, adherence: f32, seed: u64) -> Self {
        let targets = PhysicsTargets::at(adherence);
        let mut rng = StdRng::seed_from_u64(seed);
        let wander_target = pick_wander_target(&bounds, &targets, &mut rng);
        Self {
            position: bounds.center(),
            velocity: Vec2::ZERO,
            params: Transition::fixed(targets, Easing::QuadInOut),
            force_accum: Vec2::ZERO,
            bounds,
            wander_target,
            wander_timer: 0.0,
            touch: None,
            tuning: BodyTuning::default(),
            rng,
        }
    }

    pub fn set_tuning(&mut self, tuning: BodyTuning) {
        self.tuning = tuning;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn current(&self) -> PhysicsTargets {
        self.params.value()
    }

    pub fn is_touched(&self) -> bool {
        self.touch.is_some()
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
        self.position = self.position.clamp(bounds.min, bounds.max);
    }

    /// Ease physics coefficients toward the targets for `adherence`.
    pub fn retarget(&mut self, adherence: f32, duration: f32) {
        self.params.retarget(PhysicsTargets::at(adherence), duration);
    }

    pub fn apply_impulse(&mut self, direction: Vec2, strength: f32) {
        self.velocity += direction.normalize_or_zero() * strength;
    }

    /// Accumulate a force for the next `integrate` call.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force_accum += force;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity.clamp_length_max(self.tuning.drag_max_speed);
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.force_accum = Vec2::ZERO;
    }

    // --- touch state machine -------------------------------------------------

    pub fn pointer_press(&mut self, time: f32, position: Vec2) {
        self.touch = Some(TouchSession {
            start_time: time,
            start_position: position,
            last_position: position,
            hold_engaged: false,
        });
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        if let Some(t) = &mut self.touch {
            t.last_position = position;
        }
    }

    /// Classify the release: before the hold threshold it is a tap
    /// (impulse toward the tap point, scaled by response speed); after it,
    /// a swipe whose velocity comes purely from displacement over
    /// duration, clamped to the max speed.
    pub fn pointer_release(&mut self, time: f32, position: Vec2) -> Option<GestureOutcome> {
        let session = self.touch.take()?;
        let held = (time - session.start_time).max(0.0);
        if held < self.tuning.hold_threshold {
            let dir = (position - self.position).normalize_or_zero();
            let strength = TAP_IMPULSE * self.params.value().response_speed;
            self.velocity += dir * strength;
            Some(GestureOutcome::Tap { position })
        } else {
            let velocity =
                ((position - session.start_position) / held.max(1e-3)).clamp_length_max(self.tuning.drag_max_speed);
            self.velocity = velocity;
            Some(GestureOutcome::Swipe { velocity })
        }
    }

    pub fn pointer_cancel(&mut self) {
        self.touch = None;
    }

    /// Continuous attraction toward the pointer, engaged only once the
    /// hold threshold has elapsed. Existing velocity is suppressed once
    /// at engagement so the pull starts gentle.
    pub fn service_hold(&mut self, time: f32) {
        let Some(session) = &mut self.touch else {
            return;
        };
        if time - session.start_time < self.tuning.hold_threshold {
            return;
        }
        if !session.hold_engaged {
            session.hold_engaged = true;
            self.velocity *= HOLD_ENGAGE_VELOCITY_KEEP;
        }
        let target = session.last_position;
        let omega = HOLD_ATTRACT_OMEGA * self.params.value().response_speed;
        let k = omega * omega;
        let c = 2.0 * omega * HOLD_ATTRACT_DAMPING_RATIO;
        self.force_accum += (target - self.position) * k - self.velocity * c;
    }

    // --- per-frame integration ----------------------------------------------

    /// Advance one frame. Ambient wander runs only while untouched.
    /// Returns the strongest boundary impact of the step, if any.
    pub fn integrate(&mut self, dt: f32) -> Option<CollisionInfo> {
        let dt = dt.max(0.0);
        self.params.advance(dt);
        let p = self.params.value();

        if self.touch.is_none() {
            self.advance_wander(dt, &p);
            self.apply_wander_spring(&p);
        }

        // Gravity plus accumulated external/hold/wander forces.
        let mut accel = Vec2::new(0.0, GRAVITY_BASE * p.gravity_mul);
        accel += self.force_accum;
        self.force_accum = Vec2::ZERO;

        self.velocity += accel * dt;
        self.velocity *= (-p.linear_damping * dt).exp();
        self.position += self.velocity * dt;

        self.collide(&p)
    }

    fn advance_wander(&mut self, dt: f32, p: &PhysicsTargets) {
        self.wander_timer -= dt;
        if self.wander_timer <= 0.0 {
            self.wander_timer = self
                .rng
                .gen_range(WANDER_REPICK_MIN_SECS..WANDER_REPICK_MAX_SECS);
            self.wander_target = pick_wander_target(&self.bounds, p, &mut self.rng);
        }
    }

    fn apply_wander_spring(&mut self, p: &PhysicsTargets) {
        let omega = WANDER_OMEGA * p.response_speed;
        let k = omega * omega;
        let c = 2.0 * omega * WANDER_DAMPING_RATIO;
        self.force_accum += (self.wander_target - self.position) * k - self.velocity * c;
    }

    fn collide(&mut self, p: &PhysicsTargets) -> Option<CollisionInfo> {
        let mut best: Option<CollisionInfo> = None;
        let mut register = |point: Vec2, normal: Vec2, speed: f32| {
            let intensity = clamp01(speed / COLLISION_SPEED_NORM);
            let stronger = best.map(|b| intensity > b.intensity).unwrap_or(true);
            if stronger {
                best = Some(CollisionInfo {
                    point,
                    normal,
                    intensity,
                });
            }
        };

        if self.position.x < self.bounds.min.x {
            self.position.x = self.bounds.min.x;
            let speed = self.velocity.x.abs();
            self.velocity.x = -self.velocity.x * p.restitution;
            self.velocity.y *= 1.0 - p.friction;
            register(self.position, Vec2::X, speed);
        } else if self.position.x > self.bounds.max.x {
            self.position.x = self.bounds.max.x;
            let speed = self.velocity.x.abs();
            self.velocity.x = -self.velocity.x * p.restitution;
            self.velocity.y *= 1.0 - p.friction;
            register(self.position, -Vec2::X, speed);
        }
        if self.position.y < self.bounds.min.y {
            self.position.y = self.bounds.min.y;
            let speed = self.velocity.y.abs();
            self.velocity.y = -self.velocity.y * p.restitution;
            self.velocity.x *= 1.0 - p.friction;
            register(self.position, Vec2::Y, speed);
        } else if self.position.y > self.bounds.max.y {
            self.position.y = self.bounds.max.y;
            let speed = self.velocity.y.abs();
            self.velocity.y = -self.velocity.y * p.restitution;
            self.velocity.x *= 1.0 - p.friction;
            register(self.position, -Vec2::Y, speed);
        }
        best
    }
}

fn pick_wander_target(bounds: &Bounds, p: &PhysicsTargets, rng: &mut StdRng) -> Vec2 {
    let extent = bounds.extent();
    let center_x = bounds.center().x;
    let spread = p.wander_amplitude * extent.x;
    let x = (center_x + (rng.gen::<f32>() - 0.5) * 2.0 * spread)
        .clamp(bounds.min.x, bounds.max.x);
    // Higher adherence floats higher; +y is down.
    let y = bounds.max.y - p.wander_height * extent.y;
    Vec2::new(x, y)
}
