//! Outbound render surface.
//!
//! The engine produces plain data a host maps onto whatever renderer it
//! has; nothing here touches a GPU. [`ParticleInstance`] is `Pod` so a
//! host can upload the slice directly as an instance buffer.

use crate::breath::BreathSegment;
use crate::params::Tier;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use smallvec::SmallVec;

/// Per-particle instance data, laid out for direct upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2],
    pub size: f32,
    /// Age as a fraction of lifetime, for host-side fade curves.
    pub age_frac: f32,
    pub color: [f32; 4],
}

/// One blended visual layer's current draw state.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayerVisual {
    pub color: [f32; 3],
    pub alpha: f32,
    pub scale: f32,
    pub offset: Vec2,
    pub rotation: f32,
}

/// An expanding ring from a ring-burst one-shot.
#[derive(Clone, Copy, Debug)]
pub struct RingInstance {
    pub radius: f32,
    pub alpha: f32,
}

/// The stack of steady-state layers plus transient ring instances.
#[derive(Clone, Debug, Default)]
pub struct LayerStack {
    pub inner_core: LayerVisual,
    pub glow: LayerVisual,
    pub surface: LayerVisual,
    pub striation: LayerVisual,
    pub convection: LayerVisual,
    /// Traveling energy-wave band: `rotation` carries the sweep phase.
    pub energy_wave: LayerVisual,
    pub apex_flare: LayerVisual,
    pub glow_radius: f32,
    pub halo_radius: f32,
    pub rings: SmallVec<[RingInstance; 4]>,
}

/// One rendered frame: everything the host needs, nothing it owns.
#[derive(Clone, Debug)]
pub struct RenderFrame {
    pub layers: LayerStack,
    pub particles: Vec<ParticleInstance>,
    pub body_position: Vec2,
    pub body_velocity: Vec2,
    pub tier: Tier,
    pub breath_segment: BreathSegment,
    pub breath_intensity: f32,
}
