#![forbid(unsafe_code)]

//! Core: pointer events, region hit testing, and gesture thresholds.
//!
//! # Role in touchmouse
//! `touchmouse-core` is the vocabulary layer. It owns the pointer event model
//! that flows between the host and the gesture runtime, the region tree
//! abstraction the host exposes for hit testing, and the threshold snapshot
//! every gesture session is classified against.
//!
//! # Primary responsibilities
//! - **PointerEvent**: canonical single-pointer events (down, move, up, wheel).
//! - **Region / RegionSource**: read-only view of the host's control tree.
//! - **HitTester**: quick and authoritative point-in-region queries.
//! - **Thresholds / TouchConfig**: per-session tunables and their loading.
//!
//! # How it fits in the system
//! The runtime (`touchmouse-runtime`) consumes these types to classify touches
//! and synthesize mouse events. Nothing in this crate holds mutable gesture
//! state, so it can be shared freely between the input context and the
//! host's authoritative context.

pub mod config;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod region;
pub mod thresholds;

pub use config::{ConfigError, GestureSettings, TouchConfig};
pub use event::{Modifiers, PointerButton, PointerEvent, PointerEventKind};
pub use geometry::{Point, Rect};
pub use hit_test::{HitMode, HitTester};
pub use region::{
    ChildKind, ItemTag, Region, RegionAccessError, RegionCatalog, RegionId, RegionSet,
    RegionSource, Traversal,
};
pub use thresholds::{SharedThresholds, ThresholdSource, Thresholds};
