// SPDX-License-Identifier: MIT
//
// Error types for configuration commands and rendering.

use thiserror::Error;

/// A command or config-script line that could not be applied.
///
/// The configuration is left untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid color '{0}'")]
    InvalidColorSpec(String),

    #[error("invalid number '{value}' for {field}")]
    InvalidNumericField { field: String, value: String },

    #[error("{0} must be greater than 0")]
    RatioDegenerate(String),

    #[error("invalid {field} '{value}'")]
    InvalidValue { field: String, value: String },

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("{0} expects a value")]
    MissingValue(String),
}

/// Why a frame could not be composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("viewport {cols}x{rows} is too small for the clock face")]
    ViewportTooSmall { cols: u16, rows: u16 },

    #[error("ratio {x}:{y} has a zero component")]
    RatioDegenerate { x: u16, y: u16 },
}

// ─── Tests ───────────────────────────────────────────────────────────────────
