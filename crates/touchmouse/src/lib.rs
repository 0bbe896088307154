#![forbid(unsafe_code)]

//! touchmouse public facade crate.
//!
//! Re-exports the types a host needs to turn touchscreen input into mouse
//! gestures, plus [`TouchProfile`] for going from a validated
//! [`TouchConfig`] to a running [`TouchInputAdapter`].
//!
//! ```rust,ignore
//! use touchmouse::prelude::*;
//!
//! let profile = TouchProfile::from_config(TouchConfig::from_toml_file("touchmouse.toml")?)?;
//! let adapter = profile.adapter(bindings_without_thresholds);
//! adapter.attach(&input, &frames);
//! // Later, after the user edits the file:
//! profile.reload(&TouchConfig::from_toml_file("touchmouse.toml")?)?;
//! ```

pub mod error;

use std::sync::Arc;

pub use error::{DegradationAction, Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use touchmouse_core::{
    ChildKind, ConfigError, GestureSettings, HitMode, HitTester, ItemTag, Modifiers, Point,
    PointerButton, PointerEvent, PointerEventKind, Rect, Region, RegionAccessError,
    RegionCatalog, RegionId, RegionSet, RegionSource, SharedThresholds, ThresholdSource,
    Thresholds, TouchConfig, Traversal,
};

// --- Runtime re-exports ----------------------------------------------------

pub use touchmouse_runtime::{
    AuthoritativeExecutor, AuthoritativeTask, DispatchTarget, FrameHook, FrameScheduler,
    GestureState, HostBindings, HostStatus, InputSource, PointerListener, PointerSampler,
    TouchInputAdapter,
};

pub use touchmouse_core as core;
pub use touchmouse_runtime as runtime;

// --- Profile ---------------------------------------------------------------

/// A validated configuration, ready to drive adapters.
///
/// Thresholds are published through [`SharedThresholds`], so
/// [`reload`](Self::reload) retunes every adapter built from this profile;
/// sessions already open keep the values they started with. The region
/// catalog is fixed per adapter.
#[derive(Debug, Clone)]
pub struct TouchProfile {
    thresholds: Arc<SharedThresholds>,
    catalog: RegionCatalog,
}

impl Default for TouchProfile {
    fn default() -> Self {
        Self {
            thresholds: Arc::new(SharedThresholds::default()),
            catalog: RegionCatalog::default(),
        }
    }
}

impl TouchProfile {
    /// Validate `config` and build a profile from it.
    pub fn from_config(config: TouchConfig) -> Result<Self> {
        let config = config.validated()?;
        Ok(Self {
            thresholds: Arc::new(SharedThresholds::new(config.to_thresholds())),
            catalog: config.regions,
        })
    }

    /// Publish new thresholds from `config`.
    ///
    /// On error the previous thresholds stay in effect. Region sets are not
    /// reloaded; build a new profile to change them.
    pub fn reload(&self, config: &TouchConfig) -> Result<()> {
        let errors = config.validate();
        if !errors.is_empty() {
            tracing::warn!(
                target: "touchmouse.adapter",
                errors = errors.len(),
                "rejected threshold reload"
            );
            return Err(ConfigError::Validation(errors).into());
        }
        self.thresholds.store(config.to_thresholds());
        tracing::info!(target: "touchmouse.adapter", "thresholds reloaded");
        Ok(())
    }

    /// The live threshold source.
    #[must_use]
    pub fn thresholds(&self) -> Arc<SharedThresholds> {
        Arc::clone(&self.thresholds)
    }

    /// The region catalog.
    #[must_use]
    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    /// Build an adapter over `host`, replacing its threshold source with
    /// this profile's.
    #[must_use]
    pub fn adapter(&self, mut host: HostBindings) -> Arc<TouchInputAdapter> {
        host.thresholds = Arc::clone(&self.thresholds) as Arc<dyn ThresholdSource>;
        Arc::new(TouchInputAdapter::new(host, self.catalog.clone()))
    }
}

// --- Prelude ---------------------------------------------------------------

/// Everything a host integration usually needs.
pub mod prelude {
    pub use crate::{
        DegradationAction, Error, GestureState, HostBindings, Point, PointerButton, PointerEvent,
        PointerEventKind, RegionCatalog, RegionId, RegionSet, Result, Thresholds, TouchConfig,
        TouchInputAdapter, TouchProfile,
    };

    pub use crate::{core, runtime};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_uses_default_thresholds() {
        let profile = TouchProfile::default();
        assert_eq!(profile.thresholds().thresholds(), Thresholds::default());
        assert!(profile.catalog().minimap.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = TouchConfig::default();
        config.gesture.scroll_distance_per_tick = 0;
        let err = TouchProfile::from_config(config).expect_err("zero tick distance");
        assert_eq!(err.degradation(), DegradationAction::KeepPrevious);
    }

    #[test]
    fn reload_keeps_previous_on_error() {
        let mut config = TouchConfig::default();
        config.gesture.rotate_distance = 50;
        let profile = TouchProfile::from_config(config.clone()).expect("valid");
        assert_eq!(profile.thresholds().thresholds().rotate_distance, 50);

        config.gesture.rotate_distance = -1;
        assert!(profile.reload(&config).is_err());
        assert_eq!(profile.thresholds().thresholds().rotate_distance, 50);

        config.gesture.rotate_distance = 20;
        profile.reload(&config).expect("valid reload");
        assert_eq!(profile.thresholds().thresholds().rotate_distance, 20);
    }
}
