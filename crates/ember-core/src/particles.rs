//! Continuous particle emitters and one-shot burst effects.
//!
//! Each emitter kind owns a bounded pool of live particles; configs ease
//! toward the targets for the current adherence whenever the engine
//! retargets. Bursts are transient emitters: they spawn a precomputed,
//! bounded particle count and self-remove once everything has decayed.

use crate::constants::{APEX_ROUTE_THRESHOLD, COLLISION_MIN_ADHERENCE};
use crate::ease::{clamp01, lerp, Easing};
use crate::frame::ParticleInstance;
use crate::params::{EmitterKind, EmitterTargets};
use crate::transition::Transition;
use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;

/// A single live particle.
#[derive(Clone, Copy, Debug)]
struct Particle {
    position: Vec2,
    velocity: Vec2,
    age: f32,
    lifetime: f32,
    size: f32,
    color: [f32; 4],
    accel: Vec2,
}

impl Particle {
    /// Advance physics. Returns false once expired.
    fn tick(&mut self, dt: f32) -> bool {
        self.age += dt;
        if self.age >= self.lifetime {
            return false;
        }
        self.velocity += self.accel * dt;
        self.position += self.velocity * dt;
        true
    }

    fn instance(&self) -> ParticleInstance {
        let age_frac = clamp01(self.age / self.lifetime.max(1e-4));
        ParticleInstance {
            position: self.position.to_array(),
            size: self.size,
            age_frac,
            color: self.color,
        }
    }
}

/// One continuously running emitter.
struct ContinuousEmitter {
    kind: EmitterKind,
    config: Transition<EmitterTargets>,
    pool: Vec<Particle>,
    cap: usize,
    spawn_accum: f32,
}

impl ContinuousEmitter {
    fn new(kind: EmitterKind, adherence: f32) -> Self {
        Self {
            kind,
            config: Transition::fixed(EmitterTargets::at(kind, adherence), Easing::QuadInOut),
            pool: Vec::new(),
            cap: EmitterTargets::pool_cap(kind),
            spawn_accum: 0.0,
        }
    }

    fn retarget(&mut self, adherence: f32, duration: f32) {
        self.config
            .retarget(EmitterTargets::at(self.kind, adherence), duration);
    }

    fn update(&mut self, origin: Vec2, dt: f32, rng: &mut StdRng) {
        self.config.advance(dt);
        let cfg = self.config.value();

        self.pool.retain_mut(|p| p.tick(dt));

        self.spawn_accum += cfg.birth_rate * dt;
        while self.spawn_accum >= 1.0 {
            self.spawn_accum -= 1.0;
            if self.pool.len() >= self.cap {
                continue;
            }
            self.pool.push(spawn_particle(&cfg, origin, rng));
        }
    }
}

fn spawn_particle(cfg: &EmitterTargets, origin: Vec2, rng: &mut StdRng) -> Particle {
    // Jittered spawn around the origin with a mostly-vertical launch cone.
    let offset = Vec2::new((rng.gen::<f32>() - 0.5) * 24.0, (rng.gen::<f32>() - 0.5) * 10.0);
    let angle = (rng.gen::<f32>() - 0.5) * 0.9;
    let speed = cfg.speed * lerp(0.7, 1.3, rng.gen::<f32>());
    let up = Vec2::new(angle.sin(), -angle.cos());
    Particle {
        position: origin + offset,
        velocity: up * speed,
        age: 0.0,
        lifetime: cfg.lifetime * lerp(0.8, 1.2, rng.gen::<f32>()),
        size: cfg.size * lerp(0.8, 1.25, rng.gen::<f32>()),
        color: cfg.color,
        accel: cfg.accel,
    }
}

/// One-shot burst kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BurstKind {
    Tap,
    Collision,
    BreathMicro,
    MealOnTrack,
    MealOffTrack,
    ApexIgnition,
}

/// Precomputed shape of a burst: bounded count plus launch parameters.
#[derive(Clone, Copy, Debug)]
struct BurstSpec {
    count: usize,
    speed: f32,
    lifetime: f32,
    size: f32,
    color: [f32; 4],
    /// Upward bias of the launch fan; 0 is a full circle.
    rise: f32,
}

/// Burst intensity and count are functions of current adherence, the
/// caller-supplied intensity, and (for apex-linked bursts) the boost.
/// Collision bursts are suppressed in dim states so failure never reads
/// as punishment.
fn burst_spec(kind: BurstKind, adherence: f32, intensity: f32, apex_boost: f32) -> BurstSpec {
    let a = clamp01(adherence);
    let i = clamp01(intensity);
    let boost = clamp01(apex_boost);
    match kind {
        BurstKind::Tap => BurstSpec {
            count: (6.0 + 10.0 * a * i) as usize,
            speed: lerp(60.0, 140.0, a) * lerp(0.6, 1.0, i),
            lifetime: 0.6,
            size: 2.4,
            color: [1.0, lerp(0.5, 0.8, a), 0.25, 0.9],
            rise: 0.4,
        },
        BurstKind::Collision => BurstSpec {
            count: if a < COLLISION_MIN_ADHERENCE {
                0
            } else {
                (4.0 + 12.0 * a * i) as usize
            },
            speed: lerp(50.0, 120.0, i),
            lifetime: 0.5,
            size: 2.0,
            color: [1.0, 0.6, 0.3, 0.8],
            rise: 0.2,
        },
        BurstKind::BreathMicro => BurstSpec {
            count: (2.0 + 4.0 * a + 6.0 * boost) as usize,
            speed: lerp(25.0, 55.0, a) * (1.0 + 0.8 * boost),
            lifetime: 0.8,
            size: 1.8,
            color: [1.0, 0.8, 0.4, lerp(0.4, 0.8, a)],
            rise: 0.8,
        },
        BurstKind::MealOnTrack => BurstSpec {
            count: (18.0 + 14.0 * a) as usize,
            speed: lerp(90.0, 160.0, a),
            lifetime: 1.1,
            size: 2.8,
            color: [1.0, 0.85, 0.4, 0.95],
            rise: 0.5,
        },
        BurstKind::MealOffTrack => BurstSpec {
            // restrained puff: fewer, slower, dimmer than the celebration
            count: (6.0 + 4.0 * a) as usize,
            speed: 40.0,
            lifetime: 0.9,
            size: 4.0,
            color: [0.55, 0.5, 0.45, 0.45],
            rise: 0.6,
        },
        BurstKind::ApexIgnition => BurstSpec {
            count: (30.0 + 18.0 * boost) as usize,
            speed: lerp(140.0, 220.0, boost),
            lifetime: 1.3,
            size: 3.0,
            color: [1.0, 0.9, 0.55, 1.0],
            rise: 0.3,
        },
    }
}

/// Hard upper bound on any single burst's particle count.
const BURST_COUNT_MAX: usize = 64;

struct Burst {
    particles: Vec<Particle>,
}

impl Burst {
    fn spawn(spec: &BurstSpec, position: Vec2, rng: &mut StdRng) -> Self {
        let count = spec.count.min(BURST_COUNT_MAX);
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            let mut dir = Vec2::new(angle.cos(), angle.sin());
            dir.y -= spec.rise; // bias upward (+y is down)
            let dir = dir.normalize_or_zero();
            particles.push(Particle {
                position,
                velocity: dir * spec.speed * lerp(0.6, 1.3, rng.gen::<f32>()),
                age: 0.0,
                lifetime: spec.lifetime * lerp(0.7, 1.2, rng.gen::<f32>()),
                size: spec.size * lerp(0.8, 1.3, rng.gen::<f32>()),
                color: spec.color,
                accel: Vec2::new(0.0, -20.0),
            });
        }
        Self { particles }
    }

    fn update(&mut self, dt: f32) -> bool {
        self.particles.retain_mut(|p| p.tick(dt));
        !self.particles.is_empty()
    }
}

pub struct ParticleSystem {
    emitters: Vec<ContinuousEmitter>,
    bursts: SmallVec<[Burst; 8]>,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(adherence: f32, seed: u64) -> Self {
        Self {
            emitters: EmitterKind::ALL
                .iter()
                .map(|&k| ContinuousEmitter::new(k, adherence))
                .collect(),
            bursts: SmallVec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Ease every emitter's config toward the targets for `adherence`.
    pub fn retarget(&mut self, adherence: f32, duration: f32) {
        for e in &mut self.emitters {
            e.retarget(adherence, duration);
        }
    }

    /// Advance all emitters and bursts; `origin` is the body position
    /// continuous emitters spawn around.
    pub fn advance(&mut self, origin: Vec2, dt: f32) {
        for e in &mut self.emitters {
            e.update(origin, dt, &mut self.rng);
        }
        self.bursts.retain(|b| b.update(dt));
    }

    /// Fire a one-shot burst at `position`. Empty specs (e.g. collision
    /// bursts in dim states) spawn nothing.
    pub fn spawn_burst(
        &mut self,
        kind: BurstKind,
        position: Vec2,
        adherence: f32,
        intensity: f32,
        apex_boost: f32,
    ) {
        let spec = burst_spec(kind, adherence, intensity, apex_boost);
        if spec.count == 0 {
            return;
        }
        self.bursts.push(Burst::spawn(&spec, position, &mut self.rng));
    }

    /// Route a breath-linked micro-burst, amplified toward the apex
    /// variant once the boost is engaged.
    pub fn breath_micro_burst(&mut self, position: Vec2, adherence: f32, apex_boost: f32) {
        let intensity = if apex_boost >= APEX_ROUTE_THRESHOLD { 1.0 } else { 0.6 };
        self.spawn_burst(BurstKind::BreathMicro, position, adherence, intensity, apex_boost);
    }

    /// Currently applied config for one emitter kind.
    pub fn emitter_config(&self, kind: EmitterKind) -> EmitterTargets {
        self.emitters
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.config.value())
            .unwrap_or_else(|| EmitterTargets::at(kind, 0.0))
    }

    pub fn live_continuous(&self) -> usize {
        self.emitters.iter().map(|e| e.pool.len()).sum()
    }

    pub fn live_burst(&self) -> usize {
        self.bursts.iter().map(|b| b.particles.len()).sum()
    }

    pub fn active_bursts(&self) -> usize {
        self.bursts.len()
    }

    /// Append all live particles as render instances.
    pub fn collect_instances(&self, out: &mut Vec<ParticleInstance>) {
        for e in &self.emitters {
            out.extend(e.pool.iter().map(Particle::instance));
        }
        for b in &self.bursts {
            out.extend(b.particles.iter().map(Particle::instance));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_population_is_bounded() {
        let mut sys = ParticleSystem::new(1.0, 11);
        for _ in 0..6000 {
            sys.advance(Vec2::new(200.0, 300.0), 1.0 / 60.0);
        }
        let cap: usize = EmitterKind::ALL.iter().map(|&k| EmitterTargets::pool_cap(k)).sum();
        assert!(sys.live_continuous() <= cap);
        assert!(sys.live_continuous() > 0);
    }

    #[test]
    fn bursts_self_remove_after_decay() {
        let mut sys = ParticleSystem::new(0.8, 3);
        sys.spawn_burst(BurstKind::Tap, Vec2::ZERO, 0.8, 1.0, 0.0);
        assert_eq!(sys.active_bursts(), 1);
        assert!(sys.live_burst() > 0);
        for _ in 0..180 {
            sys.advance(Vec2::ZERO, 1.0 / 60.0);
        }
        assert_eq!(sys.active_bursts(), 0);
        assert_eq!(sys.live_burst(), 0);
    }

    #[test]
    fn collision_bursts_suppressed_when_dim() {
        let mut sys = ParticleSystem::new(0.1, 5);
        sys.spawn_burst(BurstKind::Collision, Vec2::ZERO, 0.1, 1.0, 0.0);
        assert_eq!(sys.active_bursts(), 0);
        sys.spawn_burst(BurstKind::Collision, Vec2::ZERO, 0.6, 1.0, 0.0);
        assert_eq!(sys.active_bursts(), 1);
    }

    #[test]
    fn off_track_puff_is_smaller_and_dimmer_than_celebration() {
        let on = burst_spec(BurstKind::MealOnTrack, 0.8, 1.0, 0.0);
        let off = burst_spec(BurstKind::MealOffTrack, 0.8, 1.0, 0.0);
        assert!(off.count < on.count);
        assert!(off.color[3] < on.color[3]);
        assert!(off.speed < on.speed);
    }

    #[test]
    fn apex_boost_amplifies_breath_micro_bursts() {
        let plain = burst_spec(BurstKind::BreathMicro, 1.0, 0.6, 0.0);
        let apex = burst_spec(BurstKind::BreathMicro, 1.0, 1.0, 1.0);
        assert!(apex.count > plain.count);
        assert!(apex.speed > plain.speed);
    }

    #[test]
    fn burst_counts_are_capped() {
        for kind in [
            BurstKind::Tap,
            BurstKind::Collision,
            BurstKind::BreathMicro,
            BurstKind::MealOnTrack,
            BurstKind::MealOffTrack,
            BurstKind::ApexIgnition,
        ] {
            let spec = burst_spec(kind, 1.0, 1.0, 1.0);
            assert!(spec.count.min(BURST_COUNT_MAX) <= BURST_COUNT_MAX);
            let mut rng = StdRng::seed_from_u64(1);
            let b = Burst::spawn(&spec, Vec2::ZERO, &mut rng);
            assert!(b.particles.len() <= BURST_COUNT_MAX);
        }
    }

    #[test]
    fn retarget_moves_configs_to_targets() {
        let mut sys = ParticleSystem::new(0.2, 2);
        sys.retarget(0.95, 2.5);
        for _ in 0..200 {
            sys.advance(Vec2::ZERO, 1.0 / 60.0);
        }
        let spark = sys.emitter_config(EmitterKind::Spark);
        let smoke = sys.emitter_config(EmitterKind::Smoke);
        assert_eq!(spark.birth_rate, EmitterTargets::at(EmitterKind::Spark, 0.95).birth_rate);
        assert_eq!(smoke.birth_rate, 0.0);
    }
}
