#![forbid(unsafe_code)]

//! Deterministic test harness for touchmouse.
//!
//! Provides an in-memory region tree, a scripted host that implements every
//! runtime host trait, a manual clock, and a [`TouchRig`] that drives
//! gestures end to end.
//!
//! # Role in touchmouse
//! `touchmouse-harness` is the verification layer. Integration tests,
//! property tests and benchmarks script touches through it and assert on the
//! exact events the application would have observed.
//!
//! # Example
//!
//! ```rust,ignore
//! use touchmouse_core::{Rect, RegionCatalog, RegionId};
//! use touchmouse_harness::{RegionSpec, RegionTree, TouchRig};
//!
//! let tree = RegionTree::build([(RegionId(1), RegionSpec::new(Rect::new(0, 0, 50, 50)))]);
//! let rig = TouchRig::new(tree, RegionCatalog::default());
//! rig.tap((200, 200));
//! assert_eq!(rig.synthetic().len(), 3);
//! ```

pub mod clock;
pub mod host;
pub mod regions;
pub mod rig;

pub use clock::ManualClock;
pub use host::{Observed, Origin, ScriptedHost};
pub use regions::{RegionNode, RegionSpec, RegionTree};
pub use rig::TouchRig;
