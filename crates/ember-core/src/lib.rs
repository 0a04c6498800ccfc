//! Living-ember simulation engine.
//!
//! A single animated entity whose look, motion, and particle behavior
//! continuously reflect one external scalar: a 0..1 adherence fraction
//! supplied by the surrounding application. The engine is a pure,
//! frame-stepped simulation: hosts push adherence updates, apex
//! eligibility, one-shot VFX events, and pointer gestures, call
//! `tick(time, dt)` once per rendered frame, and draw the returned
//! [`frame::RenderFrame`] however they like. No I/O, no GPU, no
//! callbacks out.

pub mod body;
pub mod breath;
pub mod constants;
pub mod ease;
pub mod engine;
pub mod error;
pub mod events;
pub mod frame;
pub mod params;
pub mod particles;
pub mod transition;
pub mod visual;

pub use body::{BodySimulator, BodyTuning, Bounds, CollisionInfo, GestureOutcome};
pub use breath::{BreathOscillator, BreathSample, BreathSegment, BreathVariant, VariantState};
pub use ease::Easing;
pub use engine::{EmberEngine, EngineConfig, Lifecycle};
pub use error::ConfigError;
pub use events::{PointerPhase, VfxEvent, VfxKind};
pub use frame::{LayerStack, LayerVisual, ParticleInstance, RenderFrame, RingInstance};
pub use params::{
    BreathTargets, EmitterKind, EmitterTargets, LayerColorTargets, PhysicsTargets, Tier,
};
pub use particles::{BurstKind, ParticleSystem};
pub use transition::{Lerp, Transition};
pub use visual::{OneShotKind, VisualRenderer};
