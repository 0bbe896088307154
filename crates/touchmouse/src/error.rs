#![forbid(unsafe_code)]

//! touchmouse error model and graceful degradation.
//!
//! # Design Principles
//!
//! 1. **Errors surface at load time only.** Once an adapter is attached,
//!    nothing it does returns an error; region failures and stale probes are
//!    absorbed and logged.
//! 2. **Graceful degradation.** Every variant maps to a [`DegradationAction`],
//!    and every action keeps the host usable as a plain mouse.

use std::fmt;

use touchmouse_core::ConfigError;

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for touchmouse.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be read, parsed, or validated.
    Config(ConfigError),
}

/// Standard result type for touchmouse APIs.
pub type Result<T> = std::result::Result<T, Error>;

// ── Graceful Degradation ────────────────────────────────────────────────

/// What the host should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationAction {
    /// Keep running with default thresholds and an empty region catalog.
    UseDefaults,
    /// Keep the previous configuration; the new one is rejected.
    KeepPrevious,
}

impl Error {
    /// Determine the graceful degradation action for this error.
    #[must_use]
    pub fn degradation(&self) -> DegradationAction {
        match self {
            Self::Config(ConfigError::Io(_)) => DegradationAction::UseDefaults,
            // Parse and validation failures.
            Self::Config(_) => DegradationAction::KeepPrevious,
        }
    }

    /// Error type label for metrics and tracing.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(ConfigError::Io(_)) => "config_io",
            Self::Config(ConfigError::Validation(_)) => "config_validation",
            Self::Config(_) => "config_parse",
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config: {err}"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
