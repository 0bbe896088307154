#![forbid(unsafe_code)]

//! The public listener that sits between the host's input and its game loop.
//!
//! [`TouchInputAdapter`] is registered with the host's [`InputSource`] as a
//! [`PointerListener`] and with its [`FrameScheduler`] as a [`FrameHook`].
//! For every raw event it runs the classifier, ships probes to the
//! authoritative context, dispatches synthetic events, and returns the raw
//! event with the classifier's disposition applied.
//!
//! # Concurrency
//!
//! - Classifier and synthesizer state live behind one `Mutex`. The lock is
//!   released before anything is dispatched to the host.
//! - Probe results come back over an `mpsc` channel and are drained at the
//!   start of every callback, every frame, and on [`TouchInputAdapter::poll_probes`].
//! - While synthetic events are being dispatched the adapter passes every
//!   callback through untouched, so a host that routes synthetic events back
//!   through its listeners cannot re-enter the classifier.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use web_time::Instant;

use touchmouse_core::{PointerEvent, RegionCatalog, RegionSource, ThresholdSource};

use crate::classifier::{GestureClassifier, InputContext};
use crate::host::{
    AuthoritativeExecutor, DispatchTarget, FrameHook, FrameScheduler, HostStatus, InputSource,
    PointerListener, PointerSampler,
};
use crate::probe::{ProbeRequest, ProbeResponse};
use crate::session::GestureState;
use crate::synthesizer::{EventSynthesizer, SyntheticEvent};

/// Everything the adapter needs from the host.
#[derive(Clone)]
pub struct HostBindings {
    /// Region tree, read on the input context for quick checks.
    pub regions: Arc<dyn RegionSource + Send + Sync>,
    /// Threshold source.
    pub thresholds: Arc<dyn ThresholdSource>,
    /// Interactive flag and menu bounds.
    pub status: Arc<dyn HostStatus>,
    /// Live pointer position.
    pub sampler: Arc<dyn PointerSampler>,
    /// Sink for synthetic events.
    pub dispatch: Arc<dyn DispatchTarget>,
    /// Runs probes on the authoritative context.
    pub executor: Arc<dyn AuthoritativeExecutor>,
}

impl std::fmt::Debug for HostBindings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBindings").finish_non_exhaustive()
    }
}

struct AdapterState {
    classifier: GestureClassifier,
    synthesizer: EventSynthesizer,
    probe_rx: Receiver<ProbeResponse>,
}

impl AdapterState {
    fn drain_probes(&mut self) {
        while let Ok(response) = self.probe_rx.try_recv() {
            self.classifier
                .on_probe_response(response, &mut self.synthesizer);
        }
    }

    fn reset(&mut self) {
        self.drain_probes();
        self.classifier.reset();
        self.synthesizer.clear();
    }
}

/// Sets the in-flight flag for the lifetime of the guard, restoring the
/// previous value on drop.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    previous: bool,
}

impl<'a> InFlightGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        let previous = flag.swap(true, Ordering::AcqRel);
        Self { flag, previous }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(self.previous, Ordering::Release);
    }
}

/// Translates touch input into mouse semantics for one host surface.
pub struct TouchInputAdapter {
    host: HostBindings,
    catalog: Arc<RegionCatalog>,
    state: Mutex<AdapterState>,
    synthetic_in_flight: AtomicBool,
    probe_tx: Sender<ProbeResponse>,
}

impl std::fmt::Debug for TouchInputAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TouchInputAdapter")
            .field("state", &self.gesture_state())
            .field(
                "synthetic_in_flight",
                &self.synthetic_in_flight.load(Ordering::Acquire),
            )
            .finish_non_exhaustive()
    }
}

impl TouchInputAdapter {
    /// Create an adapter. Nothing is registered until [`attach`](Self::attach).
    #[must_use]
    pub fn new(host: HostBindings, catalog: RegionCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let (probe_tx, probe_rx) = mpsc::channel();
        Self {
            host,
            state: Mutex::new(AdapterState {
                classifier: GestureClassifier::new(Arc::clone(&catalog)),
                synthesizer: EventSynthesizer::new(),
                probe_rx,
            }),
            catalog,
            synthetic_in_flight: AtomicBool::new(false),
            probe_tx,
        }
    }

    /// Register with the host's input source and frame scheduler.
    ///
    /// Gesture state is reset first. Safe to call repeatedly when the host's
    /// registration is idempotent.
    pub fn attach(self: &Arc<Self>, input: &dyn InputSource, frames: &dyn FrameScheduler) {
        self.lock_state().reset();
        input.register(Arc::clone(self) as Arc<dyn PointerListener>);
        frames.register(Arc::clone(self) as Arc<dyn FrameHook>);
        tracing::debug!(target: "touchmouse.adapter", "attached");
    }

    /// Unregister from the host and drop gesture state.
    pub fn detach(self: &Arc<Self>, input: &dyn InputSource, frames: &dyn FrameScheduler) {
        input.unregister(&(Arc::clone(self) as Arc<dyn PointerListener>));
        frames.unregister(&(Arc::clone(self) as Arc<dyn FrameHook>));
        self.lock_state().reset();
        tracing::debug!(target: "touchmouse.adapter", "detached");
    }

    /// Apply any probe results that have arrived and dispatch what they
    /// produce.
    pub fn poll_probes(&self) {
        if self.synthetic_in_flight.load(Ordering::Acquire) {
            return;
        }
        let outbox = {
            let mut state = self.lock_state();
            state.drain_probes();
            state.synthesizer.take_outbox()
        };
        self.dispatch_all(outbox);
    }

    /// Current gesture state.
    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.lock_state().classifier.state()
    }

    /// Number of deferred actions waiting for a frame.
    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.lock_state().synthesizer.pending_len()
    }

    /// Classify one raw event and return what the host should continue with.
    fn route(&self, event: PointerEvent) -> PointerEvent {
        if self.synthetic_in_flight.load(Ordering::Acquire) {
            return event;
        }

        let (decision, outbox) = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            state.drain_probes();
            let ctx = InputContext {
                interactive: self.host.status.is_interactive(),
                regions: &*self.host.regions,
                thresholds: &*self.host.thresholds,
                menu: self.host.status.open_menu_bounds(),
            };
            let decision = state
                .classifier
                .classify(&event, &ctx, &mut state.synthesizer);
            (decision, state.synthesizer.take_outbox())
        };

        if let Some(request) = decision.probe {
            self.submit_probe(request);
        }
        self.dispatch_all(outbox);
        decision.disposition.apply(event)
    }

    fn submit_probe(&self, request: ProbeRequest) {
        let tx = self.probe_tx.clone();
        let catalog = Arc::clone(&self.catalog);
        tracing::debug!(
            target: "touchmouse.probe",
            session = request.session.0,
            "probe submitted"
        );
        self.host.executor.invoke_later(Box::new(move |regions| {
            let response = request.evaluate(regions, &catalog);
            if tx.send(response).is_err() {
                tracing::debug!(target: "touchmouse.probe", "adapter gone, probe result dropped");
            }
        }));
    }

    fn dispatch_all(&self, events: Vec<SyntheticEvent>) {
        if events.is_empty() {
            return;
        }
        let _in_flight = InFlightGuard::enter(&self.synthetic_in_flight);
        for synthetic in events {
            let event = synthetic.materialize(&*self.host.sampler);
            tracing::trace!(
                target: "touchmouse.adapter",
                kind = ?event.kind,
                button = ?event.button,
                x = event.position.x,
                y = event.position.y,
                "dispatch"
            );
            self.host.dispatch.dispatch(event);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, AdapterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PointerListener for TouchInputAdapter {
    fn pointer_pressed(&self, event: PointerEvent) -> PointerEvent {
        self.route(event)
    }

    fn pointer_moved(&self, event: PointerEvent) -> PointerEvent {
        self.route(event)
    }

    fn pointer_released(&self, event: PointerEvent) -> PointerEvent {
        self.route(event)
    }

    fn wheel_moved(&self, event: PointerEvent) -> PointerEvent {
        self.route(event)
    }
}

impl FrameHook for TouchInputAdapter {
    fn on_frame(&self, now: Instant) {
        if self.synthetic_in_flight.load(Ordering::Acquire) {
            return;
        }
        let outbox = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            state.drain_probes();
            let mut outbox = state.synthesizer.take_outbox();
            if let Some(entry) = state.synthesizer.next_due(now) {
                tracing::debug!(
                    target: "touchmouse.deferred",
                    action = ?entry.action,
                    "running deferred action"
                );
                outbox.extend(EventSynthesizer::expand(&entry));
                if let Some(id) = entry.completes {
                    state.classifier.on_deferred_complete(id);
                }
            }
            outbox
        };
        self.dispatch_all(outbox);
    }
}
