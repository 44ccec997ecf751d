//! Configuration errors.
//!
//! A tick never fails; every degenerate vector resolves to "no steering".
//! The only fault a caller can see is a parameter set that would make the
//! simulation misbehave, and it is rejected before it reaches a tick.

use thiserror::Error;

/// Which perception radius a [`ConfigError::NegativeRadius`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Alignment,
    Cohesion,
    Separation,
}

impl core::fmt::Display for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Rule::Alignment => "alignment",
            Rule::Cohesion => "cohesion",
            Rule::Separation => "separation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("parameter `{0}` must be a finite number")]
    NonFinite(&'static str),

    #[error("max speed must be positive, got {0}")]
    NonPositiveMaxSpeed(f32),

    #[error("max force must not be negative, got {0}")]
    NegativeMaxForce(f32),

    #[error("{rule} radius must not be negative, got {value}")]
    NegativeRadius { rule: Rule, value: f32 },

    #[error("boundary margin must not be negative, got {0}")]
    NegativeMargin(f32),

    #[error("boundary {width}x{height} leaves no room inside a margin of {margin}")]
    BoundaryTooSmall { width: f32, height: f32, margin: f32 },

    #[error("population of {requested} exceeds flock capacity of {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },
}

pub type Result<T> = core::result::Result<T, ConfigError>;
