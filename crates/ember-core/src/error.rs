//! Configuration validation errors.
//!
//! The per-frame simulation itself is infallible: bad runtime inputs are
//! clamped or ignored rather than surfaced. The one rejectable seam is
//! host-supplied engine configuration, validated once at construction.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("hold threshold must be positive, got {0}")]
    NonPositiveHoldThreshold(f32),
    #[error("drag max speed must be positive, got {0}")]
    NonPositiveDragMaxSpeed(f32),
}
