//! Error types for backdrop configuration.
//!
//! The animation pipeline itself never fails; only a hand-edited
//! [`crate::config::FieldConfig`] can be rejected.

use thiserror::Error;

/// Reasons a [`crate::config::FieldConfig`] fails validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{name}` must be finite")]
    NonFinite { name: &'static str },

    #[error("`{name}` range is inverted: [{min}, {max}]")]
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("`{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("`{name}` must lie in [0, 1], got {value}")]
    OpacityOutOfRange { name: &'static str, value: f32 },

    #[error("pulse leaves [0, 1]: floor {floor}, amplitude {amplitude}")]
    PulseOutOfRange { floor: f32, amplitude: f32 },
}
