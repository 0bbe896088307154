#![forbid(unsafe_code)]

//! Gesture driver.
//!
//! [`TouchRig`] wires a [`ScriptedHost`], a [`TouchInputAdapter`] and a
//! [`ManualClock`] together and exposes one method per thing a finger (or a
//! mouse, for context presses) can do. Each driver stamps the event with the
//! scripted clock and injects it through the host, so the adapter sees the
//! same listener chain a real host would build.
//!
//! Probes do not resolve by themselves. Call [`TouchRig::resolve_probes`] to
//! run the queued authoritative work and hand the verdicts to the adapter;
//! skipping it leaves the session in `ProbePending`, which is how tests
//! model a slow authoritative context.

use std::sync::Arc;
use std::time::Duration;

use touchmouse_core::{
    Point, PointerButton, PointerEvent, PointerEventKind, RegionCatalog, SharedThresholds,
    ThresholdSource, Thresholds,
};
use touchmouse_runtime::{GestureState, TouchInputAdapter};

use crate::clock::ManualClock;
use crate::host::{Observed, ScriptedHost};
use crate::regions::RegionTree;

/// One adapter attached to one scripted host.
#[derive(Debug)]
pub struct TouchRig {
    host: Arc<ScriptedHost>,
    adapter: Arc<TouchInputAdapter>,
    clock: ManualClock,
    thresholds: Arc<SharedThresholds>,
}

impl TouchRig {
    /// Attach an adapter with default thresholds.
    #[must_use]
    pub fn new(tree: RegionTree, catalog: RegionCatalog) -> Self {
        Self::with_thresholds(tree, catalog, Thresholds::default())
    }

    /// Attach an adapter with the given thresholds.
    #[must_use]
    pub fn with_thresholds(tree: RegionTree, catalog: RegionCatalog, thresholds: Thresholds) -> Self {
        let host = Arc::new(ScriptedHost::new(tree));
        let thresholds = Arc::new(SharedThresholds::new(thresholds));
        let adapter = Arc::new(TouchInputAdapter::new(
            host.bindings(Arc::clone(&thresholds) as Arc<dyn ThresholdSource>),
            catalog,
        ));
        adapter.attach(&*host, &*host);
        Self {
            host,
            adapter,
            clock: ManualClock::new(),
            thresholds,
        }
    }

    /// The scripted host.
    #[must_use]
    pub fn host(&self) -> &Arc<ScriptedHost> {
        &self.host
    }

    /// The adapter under test.
    #[must_use]
    pub fn adapter(&self) -> &Arc<TouchInputAdapter> {
        &self.adapter
    }

    /// The scripted clock.
    #[must_use]
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Replace the live thresholds. Open sessions keep their snapshot.
    pub fn set_thresholds(&self, thresholds: Thresholds) {
        self.thresholds.store(thresholds);
    }

    /// Current classifier state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.adapter.gesture_state()
    }

    // ------------------------------------------------------------------
    // Drivers
    // ------------------------------------------------------------------

    /// Inject an arbitrary event stamped with the scripted clock.
    pub fn inject(&self, kind: PointerEventKind, button: PointerButton, at: Point) -> PointerEvent {
        self.host
            .inject(PointerEvent::new(kind, button, at, self.clock.now()))
    }

    /// Finger down.
    pub fn down(&self, at: impl Into<Point>) -> PointerEvent {
        self.inject(PointerEventKind::Down, PointerButton::Primary, at.into())
    }

    /// Finger moves while pressed.
    pub fn drag(&self, to: impl Into<Point>) -> PointerEvent {
        self.inject(PointerEventKind::Move, PointerButton::Primary, to.into())
    }

    /// Finger up.
    pub fn up(&self, at: impl Into<Point>) -> PointerEvent {
        self.inject(PointerEventKind::Up, PointerButton::Primary, at.into())
    }

    /// Button-less pointer motion.
    pub fn hover(&self, to: impl Into<Point>) -> PointerEvent {
        self.inject(PointerEventKind::Move, PointerButton::None, to.into())
    }

    /// Wheel notches from a real mouse.
    pub fn wheel(&self, at: impl Into<Point>, rotation: i32) -> PointerEvent {
        self.inject(PointerEventKind::WheelTick { rotation }, PointerButton::None, at.into())
    }

    /// Context-button press (the long-press a touch host reports).
    pub fn context_down(&self, at: impl Into<Point>) -> PointerEvent {
        self.inject(PointerEventKind::Down, PointerButton::Tertiary, at.into())
    }

    /// Context-button release.
    pub fn context_up(&self, at: impl Into<Point>) -> PointerEvent {
        self.inject(PointerEventKind::Up, PointerButton::Tertiary, at.into())
    }

    /// Run queued authoritative probes and deliver their verdicts.
    /// Returns how many probes ran.
    pub fn resolve_probes(&self) -> usize {
        let ran = self.host.run_authoritative();
        self.adapter.poll_probes();
        ran
    }

    /// Run one frame at the current scripted time.
    pub fn frame(&self) {
        self.host.tick(self.clock.now());
    }

    /// Move scripted time forward.
    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Down, resolve, up, then one frame.
    pub fn tap(&self, at: impl Into<Point>) {
        let at = at.into();
        self.down(at);
        self.resolve_probes();
        self.up(at);
        self.frame();
    }

    /// Down at `from`, resolve, then drag through every point in `path`.
    pub fn swipe(&self, from: impl Into<Point>, path: impl IntoIterator<Item = Point>) {
        self.down(from);
        self.resolve_probes();
        for p in path {
            self.drag(p);
        }
    }

    // ------------------------------------------------------------------
    // Observations
    // ------------------------------------------------------------------

    /// Everything the application saw so far.
    #[must_use]
    pub fn observed(&self) -> Vec<Observed> {
        self.host.observed()
    }

    /// Take and clear the observation log.
    pub fn take_observed(&self) -> Vec<Observed> {
        self.host.take_observed()
    }

    /// Only the synthetic events, as `(kind, button, position)`.
    #[must_use]
    pub fn synthetic(&self) -> Vec<(PointerEventKind, PointerButton, Point)> {
        self.observed()
            .iter()
            .filter(|o| o.is_synthetic())
            .map(Observed::summary)
            .collect()
    }

    /// Synthetic events of one kind and button.
    #[must_use]
    pub fn count(&self, kind: PointerEventKind, button: PointerButton) -> usize {
        self.synthetic()
            .iter()
            .filter(|(k, b, _)| *k == kind && *b == button)
            .count()
    }

    /// Detach the adapter from the host.
    pub fn detach(&self) {
        self.adapter.detach(&*self.host, &*self.host);
    }

    /// Attach again (idempotent).
    pub fn attach(&self) {
        self.adapter.attach(&*self.host, &*self.host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchmouse_core::{Rect, RegionId};

    use crate::regions::RegionSpec;

    fn rig() -> TouchRig {
        let tree = RegionTree::build([(RegionId(1), RegionSpec::new(Rect::new(0, 0, 10, 10)))]);
        TouchRig::new(tree, RegionCatalog::default())
    }

    #[test]
    fn attach_registers_once() {
        let rig = rig();
        assert_eq!(rig.host().listener_count(), 1);
        assert_eq!(rig.host().hook_count(), 1);
        rig.attach();
        assert_eq!(rig.host().listener_count(), 1);
        rig.detach();
        assert_eq!(rig.host().listener_count(), 0);
        assert_eq!(rig.host().hook_count(), 0);
    }

    #[test]
    fn probe_waits_for_resolution() {
        let rig = rig();
        assert!(rig.down((300, 300)).is_consumed());
        assert_eq!(rig.state(), GestureState::ProbePending);
        assert_eq!(rig.resolve_probes(), 1);
        assert_eq!(rig.state(), GestureState::RotateArmed);
    }

    #[test]
    fn tap_produces_a_click() {
        let rig = rig();
        rig.tap((300, 300));
        assert_eq!(rig.count(PointerEventKind::Down, PointerButton::Primary), 1);
        assert_eq!(rig.count(PointerEventKind::Up, PointerButton::Primary), 1);
        assert_eq!(rig.state(), GestureState::Idle);
    }
}
