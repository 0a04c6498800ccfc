//! External event and input types consumed by the orchestrator.

use glam::Vec2;

/// One-shot visual event kinds posted by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VfxKind {
    MealOnTrack,
    MealOffTrack,
    ApexIgnition,
}

/// A one-shot visual event. Immutable; the engine deduplicates by `id`,
/// so re-delivery (host-side re-render) is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VfxEvent {
    pub id: u64,
    pub kind: VfxKind,
}

impl VfxEvent {
    pub fn new(id: u64, kind: VfxKind) -> Self {
        Self { id, kind }
    }
}

/// Pointer gesture phases delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
    Cancel,
}

/// Inputs queued into the orchestrator's mailbox and applied atomically
/// at the start of the next tick.
#[derive(Clone, Copy, Debug)]
pub(crate) enum InputMsg {
    Adherence { value: f32, animated: bool },
    ApexEligible { eligible: bool, animated: bool },
    Vfx(VfxEvent),
    Pointer { phase: PointerPhase, position: Vec2 },
}
