#![forbid(unsafe_code)]

//! Synthetic event construction and emission.
//!
//! Synthetic events are built from a prototype (usually the raw event that
//! triggered them) and held until the adapter can dispatch them outside the
//! classifier's lock. There are two paths:
//!
//! - [`EventSynthesizer::emit_now`] puts an event in the outbox, flushed
//!   right after the current callback.
//! - [`EventSynthesizer::schedule`] defers an action to the next frame tick
//!   through the [`DeferredQueue`].
//!
//! Positions are resolved at dispatch time by [`PositionPolicy`], so a
//! `Live` event reflects the pointer when the host receives it, not when the
//! classifier decided to send it.

use web_time::Instant;

use touchmouse_core::{Point, PointerButton, PointerEvent, PointerEventKind};

use crate::deferred::{DeferredAction, DeferredEntry, DeferredQueue};
use crate::host::PointerSampler;
use crate::session::SessionId;

/// Where a synthetic event is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionPolicy {
    /// The prototype's position.
    Prototype,
    /// The live pointer position at dispatch, or the prototype's position
    /// while the pointer is outside the surface.
    Live,
    /// A fixed point.
    Fixed(Point),
}

/// A synthetic event awaiting dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticEvent {
    /// The event with its prototype position.
    pub event: PointerEvent,
    /// How to resolve the final position.
    pub position: PositionPolicy,
}

impl SyntheticEvent {
    /// Resolve the position and produce the event to hand to the host.
    #[must_use]
    pub fn materialize(&self, sampler: &dyn PointerSampler) -> PointerEvent {
        match self.position {
            PositionPolicy::Prototype => self.event,
            PositionPolicy::Live => match sampler.pointer_position() {
                Some(live) => self.event.relocated(live),
                None => self.event,
            },
            PositionPolicy::Fixed(point) => self.event.relocated(point),
        }
    }
}

/// Builds synthetic events and owns the outbox and deferred queue.
#[derive(Debug, Default)]
pub struct EventSynthesizer {
    outbox: Vec<SyntheticEvent>,
    deferred: DeferredQueue,
}

impl EventSynthesizer {
    /// Create an empty synthesizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a synthetic event from `prototype`.
    ///
    /// Timestamp and modifiers come from the prototype; the consumed flag is
    /// always clear.
    #[must_use]
    pub fn build(
        prototype: &PointerEvent,
        kind: PointerEventKind,
        button: PointerButton,
        position: PositionPolicy,
    ) -> SyntheticEvent {
        let at = match position {
            PositionPolicy::Fixed(point) => point,
            PositionPolicy::Prototype | PositionPolicy::Live => prototype.position,
        };
        SyntheticEvent {
            event: prototype.rebuild(kind, button, at),
            position,
        }
    }

    /// Queue `event` for dispatch right after the current callback.
    pub fn emit_now(&mut self, event: SyntheticEvent) {
        tracing::trace!(
            target: "touchmouse.adapter",
            kind = ?event.event.kind,
            button = ?event.event.button,
            "emit"
        );
        self.outbox.push(event);
    }

    /// Defer `action` to a frame tick.
    ///
    /// A button-less live move is emitted immediately so the host adopts
    /// the pointer position before the action runs. Returns the entry that
    /// fell out of a full queue, if any.
    pub fn schedule(
        &mut self,
        prototype: &PointerEvent,
        action: DeferredAction,
        not_before: Instant,
        completes: Option<SessionId>,
    ) -> Option<DeferredEntry> {
        self.emit_now(Self::build(
            prototype,
            PointerEventKind::Move,
            PointerButton::None,
            PositionPolicy::Live,
        ));
        self.deferred.schedule(DeferredEntry {
            action,
            prototype: *prototype,
            not_before,
            completes,
        })
    }

    /// Take everything emitted since the last call.
    pub fn take_outbox(&mut self) -> Vec<SyntheticEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// The deferred entry ready at `now`, if any.
    pub fn next_due(&mut self, now: Instant) -> Option<DeferredEntry> {
        self.deferred.take_ready(now)
    }

    /// Whether `action` is waiting in the deferred queue.
    #[must_use]
    pub fn has_pending(&self, action: DeferredAction) -> bool {
        self.deferred.contains(action)
    }

    /// Number of waiting deferred entries.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.deferred.len()
    }

    /// The synthetic events a deferred entry stands for.
    #[must_use]
    pub fn expand(entry: &DeferredEntry) -> Vec<SyntheticEvent> {
        let proto = &entry.prototype;
        let press = |b| Self::build(proto, PointerEventKind::Down, b, PositionPolicy::Live);
        let release = |b| Self::build(proto, PointerEventKind::Up, b, PositionPolicy::Live);
        match entry.action {
            DeferredAction::Click(b) => vec![press(b), release(b)],
            DeferredAction::Press(b) => vec![press(b)],
            DeferredAction::Release(b) => vec![release(b)],
        }
    }

    /// Drop the outbox and every deferred entry.
    pub fn clear(&mut self) {
        self.outbox.clear();
        self.deferred.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchmouse_core::Modifiers;

    struct FixedPointer(Option<Point>);

    impl PointerSampler for FixedPointer {
        fn pointer_position(&self) -> Option<Point> {
            self.0
        }
    }

    fn proto() -> PointerEvent {
        let mut e = PointerEvent::new(
            PointerEventKind::Up,
            PointerButton::Primary,
            Point::new(30, 40),
            Instant::now(),
        )
        .with_modifiers(Modifiers::SHIFT);
        e.consume();
        e
    }

    #[test]
    fn build_overrides_kind_button_and_clears_consumed() {
        let p = proto();
        let s = EventSynthesizer::build(
            &p,
            PointerEventKind::Down,
            PointerButton::Secondary,
            PositionPolicy::Fixed(Point::new(1, 2)),
        );
        assert_eq!(s.event.kind, PointerEventKind::Down);
        assert_eq!(s.event.button, PointerButton::Secondary);
        assert_eq!(s.event.position, Point::new(1, 2));
        assert_eq!(s.event.modifiers, Modifiers::SHIFT);
        assert_eq!(s.event.timestamp, p.timestamp);
        assert!(!s.event.is_consumed());
    }

    #[test]
    fn live_position_resolves_at_materialize() {
        let s = EventSynthesizer::build(
            &proto(),
            PointerEventKind::Down,
            PointerButton::Primary,
            PositionPolicy::Live,
        );
        let live = s.materialize(&FixedPointer(Some(Point::new(99, 98))));
        assert_eq!(live.position, Point::new(99, 98));
        let outside = s.materialize(&FixedPointer(None));
        assert_eq!(outside.position, Point::new(30, 40));
    }

    #[test]
    fn prototype_and_fixed_ignore_pointer() {
        let p = proto();
        let sampler = FixedPointer(Some(Point::new(0, 0)));
        for (policy, expected) in [
            (PositionPolicy::Prototype, Point::new(30, 40)),
            (PositionPolicy::Fixed(Point::new(5, 6)), Point::new(5, 6)),
        ] {
            let s = EventSynthesizer::build(&p, PointerEventKind::Move, PointerButton::None, policy);
            assert_eq!(s.materialize(&sampler).position, expected);
        }
    }

    #[test]
    fn schedule_emits_live_move_first() {
        let p = proto();
        let mut synth = EventSynthesizer::new();
        synth.schedule(&p, DeferredAction::Click(PointerButton::Primary), p.timestamp, Some(SessionId(3)));

        let out = synth.take_outbox();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].event.kind, PointerEventKind::Move);
        assert_eq!(out[0].event.button, PointerButton::None);
        assert_eq!(out[0].position, PositionPolicy::Live);
        assert!(synth.take_outbox().is_empty());

        let entry = synth.next_due(p.timestamp).expect("click due");
        assert_eq!(entry.completes, Some(SessionId(3)));
        let expanded = EventSynthesizer::expand(&entry);
        let kinds: Vec<_> = expanded.iter().map(|s| (s.event.kind, s.event.button)).collect();
        assert_eq!(
            kinds,
            vec![
                (PointerEventKind::Down, PointerButton::Primary),
                (PointerEventKind::Up, PointerButton::Primary),
            ]
        );
        assert!(expanded.iter().all(|s| s.position == PositionPolicy::Live));
    }

    #[test]
    fn press_and_release_expand_to_one_event() {
        let p = proto();
        for (action, kind) in [
            (DeferredAction::Press(PointerButton::Tertiary), PointerEventKind::Down),
            (DeferredAction::Release(PointerButton::Tertiary), PointerEventKind::Up),
        ] {
            let entry = DeferredEntry {
                action,
                prototype: p,
                not_before: p.timestamp,
                completes: None,
            };
            let expanded = EventSynthesizer::expand(&entry);
            assert_eq!(expanded.len(), 1);
            assert_eq!(expanded[0].event.kind, kind);
            assert_eq!(expanded[0].event.button, PointerButton::Tertiary);
        }
    }

    #[test]
    fn clear_drops_everything() {
        let p = proto();
        let mut synth = EventSynthesizer::new();
        synth.schedule(&p, DeferredAction::Press(PointerButton::Tertiary), p.timestamp, None);
        assert!(synth.has_pending(DeferredAction::Press(PointerButton::Tertiary)));
        assert_eq!(synth.pending_len(), 1);
        synth.clear();
        assert!(synth.take_outbox().is_empty());
        assert!(synth.next_due(p.timestamp).is_none());
    }
}
