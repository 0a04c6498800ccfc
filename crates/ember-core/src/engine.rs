//! Orchestrator: owns the four subsystems, runs the per-frame pipeline,
//! routes pointer input into the body simulator, and layers one-shot
//! event responses on top of the steady-state animation.
//!
//! External inputs land in a mailbox and are applied atomically at the
//! start of the next tick, so a single frame always sees one consistent
//! snapshot of targets. Core construction is deferred until the host
//! delivers a surface with nonzero area; VFX events arriving earlier are
//! queued and replayed once, after construction.

use crate::body::{BodySimulator, BodyTuning, Bounds, GestureOutcome};
use crate::breath::{BreathOscillator, BreathSegment};
use crate::constants::{
    APEX_BOOST_SECS, APEX_RING_COUNT, APEX_RING_STAGGER_SECS, BANKING_SECS,
    COLLISION_EFFECT_THRESHOLD, DRAG_MAX_SPEED, HOLD_THRESHOLD_SECS, KINDLING_SECS,
    VFX_DEDUP_WINDOW,
};
use crate::ease::{clamp01, Easing};
use crate::error::ConfigError;
use crate::events::{InputMsg, PointerPhase, VfxEvent, VfxKind};
use crate::frame::RenderFrame;
use crate::params::Tier;
use crate::particles::{BurstKind, ParticleSystem};
use crate::transition::Transition;
use crate::visual::{OneShotKind, VisualRenderer};
use fnv::FnvHashSet;
use glam::Vec2;
use std::collections::VecDeque;

/// Host-supplied engine configuration, validated once at construction.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub seed: u64,
    pub hold_threshold: f32,
    pub drag_max_speed: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0x454D_4245_52,
            hold_threshold: HOLD_THRESHOLD_SECS,
            drag_max_speed: DRAG_MAX_SPEED,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hold_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveHoldThreshold(self.hold_threshold));
        }
        if self.drag_max_speed <= 0.0 {
            return Err(ConfigError::NonPositiveDragMaxSpeed(self.drag_max_speed));
        }
        Ok(())
    }
}

/// Engine lifecycle. `Running` requires a surface with nonzero area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Sized,
    Running,
}

struct EngineCore {
    breath: BreathOscillator,
    body: BodySimulator,
    particles: ParticleSystem,
    visual: VisualRenderer,
}

pub struct EmberEngine {
    config: EngineConfig,
    lifecycle: Lifecycle,
    surface: Vec2,
    adherence: f32,
    apex_eligible: bool,
    apex_boost: Transition<f32>,
    mailbox: Vec<InputMsg>,
    queued_vfx: Vec<VfxEvent>,
    seen_vfx: FnvHashSet<u64>,
    seen_order: VecDeque<u64>,
    core: Option<EngineCore>,
    prev_segment: BreathSegment,
    construction_count: u32,
}

impl EmberEngine {
    pub fn new() -> Self {
        // Default config is always valid.
        Self::with_config(EngineConfig::default()).expect("default config validates")
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            lifecycle: Lifecycle::Uninitialized,
            surface: Vec2::ZERO,
            adherence: 0.5,
            apex_eligible: false,
            apex_boost: Transition::fixed(0.0, Easing::QuadOut),
            mailbox: Vec::new(),
            queued_vfx: Vec::new(),
            seen_vfx: FnvHashSet::default(),
            seen_order: VecDeque::with_capacity(VFX_DEDUP_WINDOW),
            core: None,
            prev_segment: BreathSegment::Pause,
            construction_count: 0,
        })
    }

    // --- external interface --------------------------------------------------

    /// Deliver the render surface size. A zero-area surface only records
    /// the sizing; core construction waits for a real one and happens
    /// exactly once.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface = Vec2::new(width.max(0.0), height.max(0.0));
        if self.surface.x <= 0.0 || self.surface.y <= 0.0 {
            if self.lifecycle == Lifecycle::Uninitialized {
                self.lifecycle = Lifecycle::Sized;
            }
            return;
        }
        let bounds = Bounds::new(self.surface.x, self.surface.y);
        match &mut self.core {
            Some(core) => core.body.set_bounds(bounds),
            None => {
                self.construct_core(bounds);
                self.lifecycle = Lifecycle::Running;
            }
        }
    }

    pub fn set_adherence(&mut self, value: f32, animated: bool) {
        self.mailbox.push(InputMsg::Adherence { value, animated });
    }

    pub fn set_apex_eligible(&mut self, eligible: bool, animated: bool) {
        self.mailbox.push(InputMsg::ApexEligible { eligible, animated });
    }

    pub fn post_vfx_event(&mut self, event: VfxEvent) {
        self.mailbox.push(InputMsg::Vfx(event));
    }

    pub fn pointer_press(&mut self, position: Vec2) {
        self.mailbox.push(InputMsg::Pointer {
            phase: PointerPhase::Press,
            position,
        });
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        self.mailbox.push(InputMsg::Pointer {
            phase: PointerPhase::Move,
            position,
        });
    }

    pub fn pointer_release(&mut self, position: Vec2) {
        self.mailbox.push(InputMsg::Pointer {
            phase: PointerPhase::Release,
            position,
        });
    }

    pub fn pointer_cancel(&mut self) {
        self.mailbox.push(InputMsg::Pointer {
            phase: PointerPhase::Cancel,
            position: Vec2::ZERO,
        });
    }

    // --- introspection -------------------------------------------------------

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn adherence(&self) -> f32 {
        self.adherence
    }

    pub fn tier(&self) -> Tier {
        Tier::from_adherence(self.adherence)
    }

    pub fn apex_boost(&self) -> f32 {
        self.apex_boost.value()
    }

    pub fn construction_count(&self) -> u32 {
        self.construction_count
    }

    pub fn body_position(&self) -> Option<Vec2> {
        self.core.as_ref().map(|c| c.body.position())
    }

    pub fn is_touched(&self) -> bool {
        self.core.as_ref().map(|c| c.body.is_touched()).unwrap_or(false)
    }

    /// Currently applied (possibly mid-transition) breath parameters.
    pub fn breath_params(&self) -> Option<crate::params::BreathTargets> {
        self.core.as_ref().map(|c| c.breath.current())
    }

    /// Currently applied physics coefficients.
    pub fn physics_params(&self) -> Option<crate::params::PhysicsTargets> {
        self.core.as_ref().map(|c| c.body.current())
    }

    /// Currently applied config for one continuous emitter.
    pub fn emitter_config(&self, kind: crate::params::EmitterKind) -> Option<crate::params::EmitterTargets> {
        self.core.as_ref().map(|c| c.particles.emitter_config(kind))
    }

    /// Currently applied layer colors and radii.
    pub fn layer_colors(&self) -> Option<crate::params::LayerColorTargets> {
        self.core.as_ref().map(|c| c.visual.current())
    }

    /// (live continuous particles, active bursts, live burst particles).
    pub fn particle_counts(&self) -> Option<(usize, usize, usize)> {
        self.core.as_ref().map(|c| {
            (
                c.particles.live_continuous(),
                c.particles.active_bursts(),
                c.particles.live_burst(),
            )
        })
    }

    // --- per-frame pipeline --------------------------------------------------

    /// Advance one frame. Returns `None` until the core is constructed;
    /// queued inputs are still applied so state is current when it is.
    pub fn tick(&mut self, time: f32, dt: f32) -> Option<RenderFrame> {
        let inputs = std::mem::take(&mut self.mailbox);
        for msg in inputs {
            self.apply(msg, time);
        }

        self.core.as_ref()?;
        if !self.queued_vfx.is_empty() {
            let queued = std::mem::take(&mut self.queued_vfx);
            log::info!("[engine] replaying {} queued vfx event(s)", queued.len());
            for event in queued {
                self.dispatch_vfx(event, time);
            }
        }

        self.apex_boost.advance(dt);
        let boost = self.apex_boost.value();
        let adherence = self.adherence;

        let core = self.core.as_mut()?;
        let sample = core.breath.advance(dt);

        // Inhale-peak crossing: striation pulse plus a breath-linked
        // micro-burst, routed to the apex variant while boosted.
        if self.prev_segment == BreathSegment::Inhale && sample.segment == BreathSegment::Exhale {
            core.visual.on_inhale_peak(time, boost);
            core.particles
                .breath_micro_burst(core.body.position(), adherence, boost);
        }
        self.prev_segment = sample.segment;

        core.body.service_hold(time);
        if let Some(hit) = core.body.integrate(dt) {
            if hit.intensity >= COLLISION_EFFECT_THRESHOLD {
                core.particles
                    .spawn_burst(BurstKind::Collision, hit.point, adherence, hit.intensity, boost);
                core.visual
                    .trigger(OneShotKind::Flash, hit.intensity * 0.4, time);
            }
        }

        core.particles.advance(core.body.position(), dt);

        let breath_params = core.breath.current();
        let layers = core
            .visual
            .compose(time, dt, &sample, &breath_params, boost);

        let mut particles = Vec::new();
        core.particles.collect_instances(&mut particles);

        Some(RenderFrame {
            layers,
            particles,
            body_position: core.body.position(),
            body_velocity: core.body.velocity(),
            tier: Tier::from_adherence(adherence),
            breath_segment: sample.segment,
            breath_intensity: sample.intensity,
        })
    }

    // --- internals -----------------------------------------------------------

    fn construct_core(&mut self, bounds: Bounds) {
        let seed = |i: u64| self.config.seed ^ i.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut body = BodySimulator::new(bounds, self.adherence, seed(2));
        body.set_tuning(BodyTuning {
            hold_threshold: self.config.hold_threshold,
            drag_max_speed: self.config.drag_max_speed,
        });
        self.core = Some(EngineCore {
            breath: BreathOscillator::new(self.adherence, seed(1)),
            body,
            particles: ParticleSystem::new(self.adherence, seed(3)),
            visual: VisualRenderer::new(self.adherence, seed(4)),
        });
        self.construction_count += 1;
        log::info!(
            "[engine] core constructed at {:.0}x{:.0} (adherence {:.2})",
            bounds.extent().x,
            bounds.extent().y,
            self.adherence
        );
    }

    fn apply(&mut self, msg: InputMsg, time: f32) {
        match msg {
            InputMsg::Adherence { value, animated } => {
                let value = clamp01(value);
                // Kindling (improvement) registers faster than banking
                // (decline).
                let duration = if !animated {
                    0.0
                } else if value > self.adherence {
                    KINDLING_SECS
                } else {
                    BANKING_SECS
                };
                self.adherence = value;
                if let Some(core) = &mut self.core {
                    core.breath.retarget(value, duration);
                    core.body.retarget(value, duration);
                    core.particles.retarget(value, duration);
                    core.visual.retarget(value, duration);
                }
                log::info!(
                    "[engine] adherence -> {:.2} over {:.1}s",
                    value,
                    duration
                );
            }
            InputMsg::ApexEligible { eligible, animated } => {
                self.apex_eligible = eligible;
                let target = if eligible { 1.0 } else { 0.0 };
                let duration = if animated { APEX_BOOST_SECS } else { 0.0 };
                self.apex_boost.retarget(target, duration);
                log::info!("[engine] apex eligible = {eligible}");
            }
            InputMsg::Vfx(event) => {
                if !self.seen_vfx.insert(event.id) {
                    log::debug!("[engine] duplicate vfx event {} ignored", event.id);
                    return;
                }
                // Bounded dedup window: evict the oldest id once full.
                self.seen_order.push_back(event.id);
                if self.seen_order.len() > VFX_DEDUP_WINDOW {
                    if let Some(oldest) = self.seen_order.pop_front() {
                        self.seen_vfx.remove(&oldest);
                    }
                }
                if self.core.is_some() {
                    self.dispatch_vfx(event, time);
                } else {
                    self.queued_vfx.push(event);
                }
            }
            InputMsg::Pointer { phase, position } => self.apply_pointer(phase, position, time),
        }
    }

    fn apply_pointer(&mut self, phase: PointerPhase, position: Vec2, time: f32) {
        let boost = self.apex_boost.value();
        let adherence = self.adherence;
        let Some(core) = &mut self.core else {
            return;
        };
        match phase {
            PointerPhase::Press => core.body.pointer_press(time, position),
            PointerPhase::Move => core.body.pointer_move(position),
            PointerPhase::Release => match core.body.pointer_release(time, position) {
                Some(GestureOutcome::Tap { position }) => {
                    log::debug!("[input] tap at {:.0},{:.0}", position.x, position.y);
                    core.visual.trigger(OneShotKind::Flash, 0.35, time);
                    core.visual.trigger(OneShotKind::ScalePop, 0.6, time);
                    core.particles
                        .spawn_burst(BurstKind::Tap, position, adherence, 1.0, boost);
                }
                Some(GestureOutcome::Swipe { velocity }) => {
                    log::debug!("[input] swipe at {:.0} u/s", velocity.length());
                }
                None => {}
            },
            PointerPhase::Cancel => core.body.pointer_cancel(),
        }
    }

    fn dispatch_vfx(&mut self, event: VfxEvent, time: f32) {
        let boost = self.apex_boost.value();
        let adherence = self.adherence;
        let Some(core) = &mut self.core else {
            return;
        };
        let position = core.body.position();
        log::info!("[engine] vfx {:?} ({})", event.kind, event.id);
        match event.kind {
            VfxKind::MealOnTrack => {
                core.visual.trigger(OneShotKind::Flash, 0.8, time);
                core.visual.trigger(OneShotKind::ScalePop, 0.8, time);
                core.visual.trigger(OneShotKind::RingBurst, 0.9, time);
                core.particles
                    .spawn_burst(BurstKind::MealOnTrack, position, adherence, 1.0, boost);
            }
            VfxKind::MealOffTrack => {
                // Restrained: a dim flash and a soft puff, no rings.
                core.visual.trigger(OneShotKind::Flash, 0.25, time);
                core.particles
                    .spawn_burst(BurstKind::MealOffTrack, position, adherence, 0.6, boost);
            }
            VfxKind::ApexIgnition => {
                core.visual.trigger(OneShotKind::Flash, 1.0, time);
                core.visual.trigger(OneShotKind::ScalePop, 1.0, time);
                for i in 0..APEX_RING_COUNT {
                    core.visual.trigger(
                        OneShotKind::RingBurst,
                        1.0,
                        time + i as f32 * APEX_RING_STAGGER_SECS,
                    );
                }
                core.particles
                    .spawn_burst(BurstKind::ApexIgnition, position, adherence, 1.0, boost);
            }
        }
    }
}

impl Default for EmberEngine {
    fn default() -> Self {
        Self::new()
    }
}
