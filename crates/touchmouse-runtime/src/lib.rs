#![forbid(unsafe_code)]

//! Runtime: gesture classification and synthetic mouse event dispatch.
//!
//! # Key Components
//!
//! - [`TouchInputAdapter`] - The listener the host registers; commits decisions
//! - [`GestureClassifier`] - Single-touch state machine
//! - [`EventSynthesizer`] - Builds synthetic events; owns the deferred queue
//! - [`ProbeRequest`] - Authoritative region probe shipped across contexts
//! - [`host`] - Traits the host implements
//!
//! # Role in touchmouse
//! `touchmouse-runtime` is the orchestrator. It takes raw pointer events
//! from the host, classifies each touch as a tap, a camera rotation, a
//! scroll, or a pass-through to an on-screen control, and feeds the host the
//! mouse events that gesture means.
//!
//! # How it fits in the system
//! Types come from `touchmouse-core`. The host supplies region access,
//! thresholds, dispatch, and scheduling through [`host`] traits; the
//! `touchmouse-harness` crate provides deterministic implementations of
//! those traits for tests.

pub mod adapter;
pub mod classifier;
pub mod deferred;
pub mod host;
pub mod probe;
pub mod session;
pub mod synthesizer;

pub use adapter::{HostBindings, TouchInputAdapter};
pub use classifier::{Decision, Disposition, GestureClassifier, InputContext};
pub use deferred::{DeferredAction, DeferredEntry, DeferredQueue};
pub use host::{
    AuthoritativeExecutor, AuthoritativeTask, DispatchTarget, FrameHook, FrameScheduler,
    HostStatus, InputSource, PointerListener, PointerSampler,
};
pub use probe::{PassThroughReason, ProbeRequest, ProbeResponse, ProbeVerdict};
pub use session::{GestureSession, GestureState, ScrollAxis, SessionId};
pub use synthesizer::{EventSynthesizer, PositionPolicy, SyntheticEvent};
