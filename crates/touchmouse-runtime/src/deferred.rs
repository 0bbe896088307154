#![forbid(unsafe_code)]

//! One-frame deferred dispatch.
//!
//! Some synthetic events must not reach the host in the same callback that
//! produced them: the host samples pointer position at render-loop points,
//! so a click has to wait until the host has seen the pointer move to the
//! click position. The [`DeferredQueue`] holds those actions until the next
//! frame tick.
//!
//! # Invariants
//!
//! 1. At most two entries are held: one due, one queued behind it.
//! 2. A frame tick runs at most one entry.
//! 3. Entries run in scheduling order; a third schedule replaces the
//!    queued entry, never the due one, and hands the replaced entry back.
//! 4. An entry never runs before its `not_before` instant.

use web_time::Instant;

use touchmouse_core::{PointerButton, PointerEvent};

use crate::session::SessionId;

/// A deferred synthetic action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Press then release.
    Click(PointerButton),
    /// Press only.
    Press(PointerButton),
    /// Release only.
    Release(PointerButton),
}

/// A scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredEntry {
    /// What to synthesize.
    pub action: DeferredAction,
    /// Event the synthetic events are built from.
    pub prototype: PointerEvent,
    /// Earliest instant the entry may run.
    pub not_before: Instant,
    /// Session to close once the entry has run.
    pub completes: Option<SessionId>,
}

/// Two-slot FIFO drained by the frame hook.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    due: Option<DeferredEntry>,
    queued: Option<DeferredEntry>,
}

impl DeferredQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry behind whatever is already due.
    ///
    /// Returns the queued entry this one replaced, if the queue was full.
    pub fn schedule(&mut self, entry: DeferredEntry) -> Option<DeferredEntry> {
        if self.due.is_none() {
            tracing::debug!(target: "touchmouse.deferred", action = ?entry.action, "scheduled");
            self.due = Some(entry);
            return None;
        }
        let dropped = self.queued.replace(entry);
        match &dropped {
            Some(old) => tracing::warn!(
                target: "touchmouse.deferred",
                dropped = ?old.action,
                action = ?entry.action,
                completes = old.completes.map(|id| id.0),
                "deferred queue full, replacing queued entry"
            ),
            None => tracing::debug!(target: "touchmouse.deferred", action = ?entry.action, "queued"),
        }
        dropped
    }

    /// Take the due entry if `now` has reached it, promoting the queued one.
    pub fn take_ready(&mut self, now: Instant) -> Option<DeferredEntry> {
        match self.due {
            Some(entry) if now >= entry.not_before => {
                self.due = self.queued.take();
                Some(entry)
            }
            _ => None,
        }
    }

    /// Whether an entry with `action` is waiting.
    #[must_use]
    pub fn contains(&self, action: DeferredAction) -> bool {
        [self.due, self.queued]
            .iter()
            .flatten()
            .any(|entry| entry.action == action)
    }

    /// Number of waiting entries.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.due.is_some()) + usize::from(self.queued.is_some())
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.due.is_none()
    }

    /// Drop every waiting entry.
    pub fn clear(&mut self) {
        self.due = None;
        self.queued = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use touchmouse_core::{Point, PointerEventKind};

    fn entry(action: DeferredAction, not_before: Instant) -> DeferredEntry {
        DeferredEntry {
            action,
            prototype: PointerEvent::new(
                PointerEventKind::Up,
                PointerButton::Primary,
                Point::new(1, 1),
                not_before,
            ),
            not_before,
            completes: None,
        }
    }

    const CLICK: DeferredAction = DeferredAction::Click(PointerButton::Primary);
    const PRESS: DeferredAction = DeferredAction::Press(PointerButton::Tertiary);
    const RELEASE: DeferredAction = DeferredAction::Release(PointerButton::Tertiary);

    #[test]
    fn one_entry_per_tick_in_order() {
        let t = Instant::now();
        let mut q = DeferredQueue::new();
        q.schedule(entry(PRESS, t));
        q.schedule(entry(RELEASE, t));
        assert_eq!(q.len(), 2);

        assert_eq!(q.take_ready(t).map(|e| e.action), Some(PRESS));
        assert_eq!(q.len(), 1);
        assert_eq!(q.take_ready(t).map(|e| e.action), Some(RELEASE));
        assert!(q.take_ready(t).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn third_schedule_replaces_queued_slot() {
        let t = Instant::now();
        let mut q = DeferredQueue::new();
        assert!(q.schedule(entry(PRESS, t)).is_none());
        assert!(q.schedule(entry(RELEASE, t)).is_none());
        let dropped = q.schedule(entry(CLICK, t));
        assert_eq!(dropped.map(|e| e.action), Some(RELEASE));
        assert_eq!(q.len(), 2);
        assert_eq!(q.take_ready(t).map(|e| e.action), Some(PRESS));
        assert_eq!(q.take_ready(t).map(|e| e.action), Some(CLICK));
    }

    #[test]
    fn not_before_holds_entry() {
        let t = Instant::now();
        let later = t + Duration::from_millis(30);
        let mut q = DeferredQueue::new();
        q.schedule(entry(CLICK, later));
        assert!(q.take_ready(t).is_none());
        assert!(q.take_ready(t + Duration::from_millis(29)).is_none());
        assert!(q.take_ready(later).is_some());
    }

    #[test]
    fn contains_checks_both_slots() {
        let t = Instant::now();
        let mut q = DeferredQueue::new();
        assert!(!q.contains(PRESS));
        q.schedule(entry(CLICK, t));
        q.schedule(entry(PRESS, t));
        assert!(q.contains(PRESS));
        assert!(q.contains(CLICK));
        q.clear();
        assert!(!q.contains(CLICK));
        assert_eq!(q.len(), 0);
    }
}
