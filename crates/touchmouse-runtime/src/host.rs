#![forbid(unsafe_code)]

//! Collaborators supplied by the host application.
//!
//! The runtime never talks to a windowing system directly. Everything it
//! needs from the host arrives through these traits:
//!
//! | Trait | Provides |
//! |-------|----------|
//! | [`InputSource`] | raw pointer events, via a registered [`PointerListener`] |
//! | [`FrameScheduler`] | a per-render-tick callback, via a registered [`FrameHook`] |
//! | [`AuthoritativeExecutor`] | deferred execution on the context that owns the region tree |
//! | [`PointerSampler`] | the live pointer position |
//! | [`HostStatus`] | whether input should be processed, open menu bounds |
//! | [`DispatchTarget`] | the sink for synthetic events |
//!
//! Region and threshold access use the core crate's
//! [`RegionSource`] and [`ThresholdSource`](touchmouse_core::ThresholdSource).

use std::sync::Arc;

use web_time::Instant;

use touchmouse_core::{Point, PointerEvent, PointerEventKind, Rect, RegionSource};

/// Reads the live pointer position.
pub trait PointerSampler: Send + Sync {
    /// Current pointer position, or `None` while it is outside the surface.
    fn pointer_position(&self) -> Option<Point>;
}

/// Accepts synthesized events.
pub trait DispatchTarget: Send + Sync {
    /// Deliver `event` into the host's input pipeline.
    ///
    /// The host may route the event back through registered listeners.
    fn dispatch(&self, event: PointerEvent);
}

/// Host-wide status flags.
pub trait HostStatus: Send + Sync {
    /// Whether the host is in a state where touches should be translated.
    fn is_interactive(&self) -> bool;

    /// Bounds of the currently open context menu, if any.
    fn open_menu_bounds(&self) -> Option<Rect> {
        None
    }
}

/// Work to run on the authoritative context, with the region tree in hand.
pub type AuthoritativeTask = Box<dyn FnOnce(&dyn RegionSource) + Send>;

/// Runs tasks on the host's authoritative context.
///
/// No ordering or completion guarantee: a task may run after the gesture it
/// was submitted for has ended, or not at all.
pub trait AuthoritativeExecutor: Send + Sync {
    /// Run `task` soon.
    fn invoke_later(&self, task: AuthoritativeTask);
}

/// Called once per render tick.
pub trait FrameHook: Send + Sync {
    /// The host is about to render a frame.
    fn on_frame(&self, now: Instant);
}

/// Registers per-frame hooks. Registration is idempotent.
pub trait FrameScheduler: Send + Sync {
    /// Start calling `hook` every frame.
    fn register(&self, hook: Arc<dyn FrameHook>);
    /// Stop calling `hook`.
    fn unregister(&self, hook: &Arc<dyn FrameHook>);
}

/// Observes, and may rewrite, raw pointer events.
///
/// Each callback returns the event the host should continue with: the
/// original, the original marked consumed, or a replacement.
pub trait PointerListener: Send + Sync {
    /// A button was pressed.
    fn pointer_pressed(&self, event: PointerEvent) -> PointerEvent;
    /// The pointer moved, with or without a button held.
    fn pointer_moved(&self, event: PointerEvent) -> PointerEvent;
    /// A button was released.
    fn pointer_released(&self, event: PointerEvent) -> PointerEvent;
    /// The pointer entered the surface.
    fn pointer_entered(&self, event: PointerEvent) -> PointerEvent {
        event
    }
    /// The pointer left the surface.
    fn pointer_exited(&self, event: PointerEvent) -> PointerEvent {
        event
    }
    /// The host's own click notification.
    fn pointer_clicked(&self, event: PointerEvent) -> PointerEvent {
        event
    }
    /// The wheel rotated.
    fn wheel_moved(&self, event: PointerEvent) -> PointerEvent;
}

/// Registers pointer listeners. Registration is idempotent.
pub trait InputSource: Send + Sync {
    /// Start delivering events to `listener`.
    fn register(&self, listener: Arc<dyn PointerListener>);
    /// Stop delivering events to `listener`.
    fn unregister(&self, listener: &Arc<dyn PointerListener>);
}

/// Route `event` to the listener callback for its kind.
pub fn deliver(listener: &dyn PointerListener, event: PointerEvent) -> PointerEvent {
    match event.kind {
        PointerEventKind::Down => listener.pointer_pressed(event),
        PointerEventKind::Move => listener.pointer_moved(event),
        PointerEventKind::Up => listener.pointer_released(event),
        PointerEventKind::Enter => listener.pointer_entered(event),
        PointerEventKind::Exit => listener.pointer_exited(event),
        PointerEventKind::Click => listener.pointer_clicked(event),
        PointerEventKind::WheelTick { .. } => listener.wheel_moved(event),
    }
}

/// Whether two listener handles point at the same listener.
///
/// Compares data addresses only; vtable pointers for one type can differ
/// between codegen units.
#[must_use]
pub fn same_listener(a: &Arc<dyn PointerListener>, b: &Arc<dyn PointerListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Whether two hook handles point at the same hook.
#[must_use]
pub fn same_hook(a: &Arc<dyn FrameHook>, b: &Arc<dyn FrameHook>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use touchmouse_core::PointerButton;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<&'static str>>,
    }

    impl Recorder {
        fn push(&self, name: &'static str, event: PointerEvent) -> PointerEvent {
            self.calls.lock().expect("calls lock").push(name);
            event
        }
    }

    impl PointerListener for Recorder {
        fn pointer_pressed(&self, e: PointerEvent) -> PointerEvent {
            self.push("pressed", e)
        }
        fn pointer_moved(&self, e: PointerEvent) -> PointerEvent {
            self.push("moved", e)
        }
        fn pointer_released(&self, e: PointerEvent) -> PointerEvent {
            self.push("released", e)
        }
        fn wheel_moved(&self, e: PointerEvent) -> PointerEvent {
            self.push("wheel", e)
        }
    }

    fn event(kind: PointerEventKind) -> PointerEvent {
        PointerEvent::new(kind, PointerButton::None, Point::new(0, 0), Instant::now())
    }

    #[test]
    fn deliver_routes_by_kind() {
        let rec = Recorder::default();
        for kind in [
            PointerEventKind::Down,
            PointerEventKind::Move,
            PointerEventKind::Up,
            PointerEventKind::WheelTick { rotation: 1 },
            PointerEventKind::Enter,
            PointerEventKind::Click,
        ] {
            let out = deliver(&rec, event(kind));
            assert_eq!(out.kind, kind);
        }
        assert_eq!(
            *rec.calls.lock().expect("calls lock"),
            vec!["pressed", "moved", "released", "wheel"]
        );
    }

    #[test]
    fn same_listener_compares_identity() {
        let a: Arc<dyn PointerListener> = Arc::new(Recorder::default());
        let b: Arc<dyn PointerListener> = Arc::new(Recorder::default());
        assert!(same_listener(&a, &Arc::clone(&a)));
        assert!(!same_listener(&a, &b));
    }
}
