#![forbid(unsafe_code)]

//! Structured logging.
//!
//! All crates log through `tracing` with dotted targets:
//!
//! | Target | Emitted by |
//! |--------|------------|
//! | `touchmouse.hit` | region hit tests (trace) |
//! | `touchmouse.classifier` | gesture transitions (debug), per-move detail (trace) |
//! | `touchmouse.probe` | probe evaluation and stale results (debug) |
//! | `touchmouse.deferred` | deferred queue activity (debug), overflow (warn) |
//! | `touchmouse.adapter` | attach/detach and dispatch (debug) |
//!
//! With the `tracing-json` feature, [`init_json_subscriber`] installs a JSON
//! formatter filtered by the `TOUCHMOUSE_LOG` environment variable (same
//! syntax as `RUST_LOG`).

pub use tracing::{debug, error, info, trace, warn};

/// Environment variable read by [`init_json_subscriber`].
pub const LOG_ENV_VAR: &str = "TOUCHMOUSE_LOG";

/// Filter used when `TOUCHMOUSE_LOG` is unset.
pub const DEFAULT_FILTER: &str = "touchmouse=info";

/// Install a global JSON subscriber.
///
/// Returns an error if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(Into::into)
}
