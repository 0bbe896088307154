#![forbid(unsafe_code)]

//! A scripted host.
//!
//! [`ScriptedHost`] implements every host trait the runtime needs and
//! records what the application behind it would observe. Nothing runs on its
//! own: authoritative tasks wait for [`ScriptedHost::run_authoritative`] and
//! frame hooks wait for [`ScriptedHost::tick`], so a test decides exactly
//! when a probe resolves relative to the touch.
//!
//! # What is recorded
//!
//! Every event that reaches the application is appended to one ordered log
//! as an [`Observed`] entry: raw events that survive the listener chain
//! unconsumed, and synthetic events dispatched by the adapter.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use web_time::Instant;

use touchmouse_core::{Point, PointerButton, PointerEvent, PointerEventKind, Rect, ThresholdSource};
use touchmouse_runtime::HostBindings;
use touchmouse_runtime::host::{
    AuthoritativeExecutor, AuthoritativeTask, DispatchTarget, FrameHook, FrameScheduler,
    HostStatus, InputSource, PointerListener, PointerSampler, deliver, same_hook, same_listener,
};

use crate::regions::RegionTree;

/// Where an observed event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A raw event the listeners let through.
    Raw,
    /// An event dispatched by the adapter.
    Synthetic,
}

/// An event as the application saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observed {
    /// Raw or synthetic.
    pub origin: Origin,
    /// The event.
    pub event: PointerEvent,
}

impl Observed {
    /// Kind, button and position, for compact assertions.
    #[must_use]
    pub fn summary(&self) -> (PointerEventKind, PointerButton, Point) {
        (self.event.kind, self.event.button, self.event.position)
    }

    /// Whether the adapter produced this event.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.origin == Origin::Synthetic
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deterministic host double.
pub struct ScriptedHost {
    tree: Arc<RegionTree>,
    interactive: AtomicBool,
    echo_synthetic: AtomicBool,
    menu: Mutex<Option<Rect>>,
    pointer: Mutex<Option<Point>>,
    tasks: Mutex<VecDeque<AuthoritativeTask>>,
    listeners: Mutex<Vec<Arc<dyn PointerListener>>>,
    hooks: Mutex<Vec<Arc<dyn FrameHook>>>,
    observed: Mutex<Vec<Observed>>,
}

impl std::fmt::Debug for ScriptedHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedHost")
            .field("interactive", &self.interactive.load(Ordering::Acquire))
            .field("listeners", &self.listener_count())
            .field("hooks", &self.hook_count())
            .field("pending_tasks", &self.pending_tasks())
            .finish_non_exhaustive()
    }
}

impl ScriptedHost {
    /// An interactive host over `tree`.
    #[must_use]
    pub fn new(tree: RegionTree) -> Self {
        Self {
            tree: Arc::new(tree),
            interactive: AtomicBool::new(true),
            echo_synthetic: AtomicBool::new(false),
            menu: Mutex::new(None),
            pointer: Mutex::new(None),
            tasks: Mutex::new(VecDeque::new()),
            listeners: Mutex::new(Vec::new()),
            hooks: Mutex::new(Vec::new()),
            observed: Mutex::new(Vec::new()),
        }
    }

    /// Bindings for a [`TouchInputAdapter`](touchmouse_runtime::TouchInputAdapter)
    /// backed by this host.
    #[must_use]
    pub fn bindings(self: &Arc<Self>, thresholds: Arc<dyn ThresholdSource>) -> HostBindings {
        HostBindings {
            regions: Arc::clone(&self.tree) as Arc<dyn touchmouse_core::RegionSource + Send + Sync>,
            thresholds,
            status: Arc::clone(self) as Arc<dyn HostStatus>,
            sampler: Arc::clone(self) as Arc<dyn PointerSampler>,
            dispatch: Arc::clone(self) as Arc<dyn DispatchTarget>,
            executor: Arc::clone(self) as Arc<dyn AuthoritativeExecutor>,
        }
    }

    /// The region tree.
    #[must_use]
    pub fn tree(&self) -> &RegionTree {
        &self.tree
    }

    /// Toggle whether touches should be translated.
    pub fn set_interactive(&self, interactive: bool) {
        self.interactive.store(interactive, Ordering::Release);
    }

    /// Route dispatched synthetic events back through the listeners, as
    /// hosts that treat them like real input do.
    pub fn set_echo_synthetic(&self, echo: bool) {
        self.echo_synthetic.store(echo, Ordering::Release);
    }

    /// Open or close the context menu.
    pub fn set_menu(&self, bounds: Option<Rect>) {
        *lock(&self.menu) = bounds;
    }

    /// Move the live pointer, or take it off the surface.
    pub fn set_pointer(&self, position: Option<Point>) {
        *lock(&self.pointer) = position;
    }

    /// Deliver a raw event through every listener.
    ///
    /// The pointer follows the event (it leaves the surface on `Exit`). The
    /// returned event is what the application received; it is also logged
    /// unless consumed.
    pub fn inject(&self, event: PointerEvent) -> PointerEvent {
        let pointer = match event.kind {
            PointerEventKind::Exit => None,
            _ => Some(event.position),
        };
        self.set_pointer(pointer);
        let out = self.run_listeners(event);
        if !out.is_consumed() {
            self.record(Origin::Raw, out);
        }
        out
    }

    /// Run every queued authoritative task. Returns how many ran.
    pub fn run_authoritative(&self) -> usize {
        let tasks: Vec<_> = lock(&self.tasks).drain(..).collect();
        let ran = tasks.len();
        for task in tasks {
            task(&*self.tree);
        }
        ran
    }

    /// Drop every queued authoritative task without running it.
    pub fn discard_authoritative(&self) -> usize {
        let mut tasks = lock(&self.tasks);
        let n = tasks.len();
        tasks.clear();
        n
    }

    /// Call every frame hook once.
    pub fn tick(&self, now: Instant) {
        let hooks = lock(&self.hooks).clone();
        for hook in hooks {
            hook.on_frame(now);
        }
    }

    /// Everything the application has observed so far.
    #[must_use]
    pub fn observed(&self) -> Vec<Observed> {
        lock(&self.observed).clone()
    }

    /// Take and clear the observation log.
    pub fn take_observed(&self) -> Vec<Observed> {
        std::mem::take(&mut *lock(&self.observed))
    }

    /// Registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Registered frame hooks.
    #[must_use]
    pub fn hook_count(&self) -> usize {
        lock(&self.hooks).len()
    }

    /// Authoritative tasks waiting to run.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        lock(&self.tasks).len()
    }

    fn run_listeners(&self, event: PointerEvent) -> PointerEvent {
        // Listeners may call back into the host, so never hold the lock.
        let listeners = lock(&self.listeners).clone();
        listeners
            .iter()
            .fold(event, |ev, listener| deliver(&**listener, ev))
    }

    fn record(&self, origin: Origin, event: PointerEvent) {
        tracing::trace!(
            target: "touchmouse.harness",
            ?origin,
            kind = ?event.kind,
            button = ?event.button,
            x = event.position.x,
            y = event.position.y,
            "observed"
        );
        lock(&self.observed).push(Observed { origin, event });
    }
}

impl HostStatus for ScriptedHost {
    fn is_interactive(&self) -> bool {
        self.interactive.load(Ordering::Acquire)
    }

    fn open_menu_bounds(&self) -> Option<Rect> {
        *lock(&self.menu)
    }
}

impl PointerSampler for ScriptedHost {
    fn pointer_position(&self) -> Option<Point> {
        *lock(&self.pointer)
    }
}

impl DispatchTarget for ScriptedHost {
    fn dispatch(&self, event: PointerEvent) {
        let out = if self.echo_synthetic.load(Ordering::Acquire) {
            self.run_listeners(event)
        } else {
            event
        };
        if !out.is_consumed() {
            self.record(Origin::Synthetic, out);
        }
    }
}

impl AuthoritativeExecutor for ScriptedHost {
    fn invoke_later(&self, task: AuthoritativeTask) {
        lock(&self.tasks).push_back(task);
    }
}

impl InputSource for ScriptedHost {
    fn register(&self, listener: Arc<dyn PointerListener>) {
        let mut listeners = lock(&self.listeners);
        if !listeners.iter().any(|l| same_listener(l, &listener)) {
            listeners.push(listener);
        }
    }

    fn unregister(&self, listener: &Arc<dyn PointerListener>) {
        lock(&self.listeners).retain(|l| !same_listener(l, listener));
    }
}

impl FrameScheduler for ScriptedHost {
    fn register(&self, hook: Arc<dyn FrameHook>) {
        let mut hooks = lock(&self.hooks);
        if !hooks.iter().any(|h| same_hook(h, &hook)) {
            hooks.push(hook);
        }
    }

    fn unregister(&self, hook: &Arc<dyn FrameHook>) {
        lock(&self.hooks).retain(|h| !same_hook(h, hook));
    }
}
