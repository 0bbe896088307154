#![forbid(unsafe_code)]

//! Gesture classification: decides what each raw touch event becomes.
//!
//! [`GestureClassifier`] is a sans-IO state machine. It receives one raw
//! event at a time, updates the single [`GestureSession`], asks the
//! [`EventSynthesizer`] for any synthetic events, and returns a [`Decision`]
//! telling the caller what to do with the raw event. It never touches the
//! host; the adapter carries out decisions.
//!
//! # State Machine
//!
//! A primary press opens a session in `ProbePending` and is consumed. The
//! press point is then probed on the authoritative context (see
//! [`crate::probe`]) and the response moves the session to one of:
//!
//! - **PassThrough**: the press is replayed, as are moves and the release.
//! - **RotateArmed → Rotating**: once the drag passes the rotate distance a
//!   secondary press is synthesized at the drag origin and every later move
//!   is rewritten to the secondary button.
//! - **ScrollArmed → Scrolling**: vertical travel becomes wheel ticks while
//!   the reported position stays pinned. Over the minimap the drag first
//!   commits to a zoom or pan axis.
//!
//! Releasing a session that never rotated, scrolled or passed through is a
//! tap: the release is consumed and a click is deferred to the next frame.
//!
//! # Invariants
//!
//! 1. At most one session is open. A press while one is open passes through.
//! 2. A probe response only applies to the session it was made for, and only
//!    while that session is still `ProbePending`.
//! 3. A gesture produces either a click, a rotation, a scroll, or a replay;
//!    never two of them.
//! 4. While scroll-armed, every outgoing move reports the pinned point.
//!
//! # Failure Modes
//!
//! - A probe that never resolves leaves the session `ProbePending`; the
//!   release still produces a click.
//! - A release the classifier did not see (consumed elsewhere) closes the
//!   session without synthesizing anything.

use std::sync::Arc;

use touchmouse_core::{
    HitMode, HitTester, Point, PointerButton, PointerEvent, PointerEventKind, Rect, RegionCatalog,
    RegionSource, ThresholdSource,
};

use crate::deferred::DeferredAction;
use crate::probe::{ProbeRequest, ProbeResponse, ProbeVerdict};
use crate::session::{GestureSession, GestureState, ScrollAxis, SessionId};
use crate::synthesizer::{EventSynthesizer, PositionPolicy};

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// What happens to the raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Continue with the event unchanged.
    Pass,
    /// Mark the event consumed.
    Consume,
    /// Continue with this event instead.
    Replace(PointerEvent),
}

impl Disposition {
    /// Apply the disposition to `event`.
    #[must_use]
    pub fn apply(self, mut event: PointerEvent) -> PointerEvent {
        match self {
            Self::Pass => event,
            Self::Consume => {
                event.consume();
                event
            }
            Self::Replace(replacement) => replacement,
        }
    }
}

/// The classifier's answer to one raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// What happens to the raw event.
    pub disposition: Disposition,
    /// A probe to run on the authoritative context.
    pub probe: Option<ProbeRequest>,
}

impl Decision {
    const PASS: Self = Self {
        disposition: Disposition::Pass,
        probe: None,
    };

    const CONSUME: Self = Self {
        disposition: Disposition::Consume,
        probe: None,
    };

    const fn replace(event: PointerEvent) -> Self {
        Self {
            disposition: Disposition::Replace(event),
            probe: None,
        }
    }
}

/// Input-context view of the host for one callback.
#[derive(Clone, Copy)]
pub struct InputContext<'a> {
    /// Whether touches should be translated at all.
    pub interactive: bool,
    /// Region tree; only quick checks are valid here.
    pub regions: &'a dyn RegionSource,
    /// Threshold source, read when a session opens.
    pub thresholds: &'a dyn ThresholdSource,
    /// Bounds of the open context menu, if any.
    pub menu: Option<Rect>,
}

impl std::fmt::Debug for InputContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputContext")
            .field("interactive", &self.interactive)
            .field("menu", &self.menu)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// GestureClassifier
// ---------------------------------------------------------------------------

/// Single-touch gesture state machine.
pub struct GestureClassifier {
    catalog: Arc<RegionCatalog>,
    session: Option<GestureSession>,
    next_id: u64,
    // Where the context-menu button went down.
    context_origin: Option<Point>,
}

impl std::fmt::Debug for GestureClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureClassifier")
            .field("state", &self.state())
            .field("session", &self.session.as_ref().map(|s| s.id))
            .finish()
    }
}

impl GestureClassifier {
    /// Create a classifier over `catalog`.
    #[must_use]
    pub fn new(catalog: Arc<RegionCatalog>) -> Self {
        Self {
            catalog,
            session: None,
            next_id: 0,
            context_origin: None,
        }
    }

    /// Classify one raw event.
    pub fn classify(
        &mut self,
        event: &PointerEvent,
        ctx: &InputContext<'_>,
        synth: &mut EventSynthesizer,
    ) -> Decision {
        match event.kind {
            PointerEventKind::Down => self.on_down(event, ctx, synth),
            PointerEventKind::Move => self.on_move(event, synth),
            PointerEventKind::Up => self.on_up(event, ctx, synth),
            PointerEventKind::WheelTick { .. } => self.on_wheel(event),
            PointerEventKind::Enter | PointerEventKind::Exit | PointerEventKind::Click => {
                Decision::PASS
            }
        }
    }

    /// Apply an authoritative probe result.
    ///
    /// Results for a different session, or for a session that already left
    /// `ProbePending`, are dropped.
    pub fn on_probe_response(&mut self, response: ProbeResponse, synth: &mut EventSynthesizer) {
        let fresh = self
            .session
            .as_ref()
            .is_some_and(|s| s.id == response.session && s.state == GestureState::ProbePending);
        if !fresh {
            tracing::debug!(
                target: "touchmouse.probe",
                session = response.session.0,
                current = ?self.session.as_ref().map(|s| (s.id.0, s.state.as_str())),
                "discarding stale probe result"
            );
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.state = match response.verdict {
            ProbeVerdict::PassThrough(_) => {
                synth.emit_now(EventSynthesizer::build(
                    &session.down,
                    PointerEventKind::Down,
                    PointerButton::Primary,
                    PositionPolicy::Live,
                ));
                GestureState::PassThrough
            }
            ProbeVerdict::Scroll { minimap } => {
                session.minimap = minimap;
                GestureState::ScrollArmed
            }
            ProbeVerdict::Rotate => GestureState::RotateArmed,
        };
        tracing::debug!(
            target: "touchmouse.classifier",
            session = session.id.0,
            state = session.state.as_str(),
            verdict = ?response.verdict,
            "probe applied"
        );
    }

    /// A deferred entry that completes `id` has been dispatched.
    pub fn on_deferred_complete(&mut self, id: SessionId) {
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.id == id && s.state == GestureState::ClickPending)
        {
            self.close("click dispatched");
        }
    }

    /// Current classification state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.session
            .as_ref()
            .map_or(GestureState::Idle, |s| s.state)
    }

    /// The open session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Drop all gesture state.
    pub fn reset(&mut self) {
        self.session = None;
        self.context_origin = None;
    }

    fn close(&mut self, reason: &'static str) {
        if let Some(session) = self.session.take() {
            tracing::debug!(
                target: "touchmouse.classifier",
                session = session.id.0,
                state = session.state.as_str(),
                reason,
                "session closed"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Internal event handlers
// ---------------------------------------------------------------------------

impl GestureClassifier {
    fn on_down(
        &mut self,
        event: &PointerEvent,
        ctx: &InputContext<'_>,
        synth: &mut EventSynthesizer,
    ) -> Decision {
        if event.is_consumed() || !ctx.interactive {
            return Decision::PASS;
        }
        match event.button {
            PointerButton::Primary => {}
            PointerButton::Tertiary => return self.on_context_press(event, synth),
            PointerButton::Secondary | PointerButton::None => return Decision::PASS,
        }

        if HitTester::new(ctx.regions).contains(event.position, &self.catalog.quick, HitMode::Quick) {
            tracing::debug!(
                target: "touchmouse.classifier",
                x = event.position.x,
                y = event.position.y,
                "press on quick region, passing through"
            );
            return Decision::PASS;
        }

        if let Some(open) = &self.session {
            tracing::debug!(
                target: "touchmouse.classifier",
                session = open.id.0,
                state = open.state.as_str(),
                "press while a session is open, passing through"
            );
            return Decision::PASS;
        }

        self.next_id += 1;
        let id = SessionId(self.next_id);
        let thresholds = ctx.thresholds.thresholds().sanitized();
        self.session = Some(GestureSession::open(id, *event, thresholds));
        tracing::debug!(
            target: "touchmouse.classifier",
            session = id.0,
            x = event.position.x,
            y = event.position.y,
            "session opened"
        );

        Decision {
            disposition: Disposition::Consume,
            probe: Some(ProbeRequest {
                session: id,
                point: event.position,
            }),
        }
    }

    fn on_move(&mut self, event: &PointerEvent, synth: &mut EventSynthesizer) -> Decision {
        let Some(session) = self.session.as_mut() else {
            return Decision::PASS;
        };

        // Hover moves only matter while the pointer is pinned.
        if event.button == PointerButton::None {
            return if session.state == GestureState::Scrolling {
                Decision::replace(event.relocated(session.pinned))
            } else {
                Decision::PASS
            };
        }
        if event.is_consumed() || event.button != PointerButton::Primary {
            return Decision::PASS;
        }

        if session.state.is_rotate() {
            rotate(session, event, synth)
        } else if session.state.is_scroll() {
            scroll(session, event, synth)
        } else {
            Decision::PASS
        }
    }

    fn on_up(
        &mut self,
        event: &PointerEvent,
        ctx: &InputContext<'_>,
        synth: &mut EventSynthesizer,
    ) -> Decision {
        match event.button {
            PointerButton::Primary => {}
            PointerButton::Tertiary => return self.on_context_release(event, ctx, synth),
            PointerButton::Secondary | PointerButton::None => return Decision::PASS,
        }

        let Some(session) = self.session.as_mut() else {
            tracing::debug!(target: "touchmouse.classifier", "release without session");
            return Decision::PASS;
        };

        if event.is_consumed() || !ctx.interactive {
            self.close("release not ours");
            return Decision::PASS;
        }

        match session.state {
            GestureState::ClickPending => Decision::PASS,
            GestureState::PassThrough => {
                synth.emit_now(EventSynthesizer::build(
                    event,
                    PointerEventKind::Up,
                    PointerButton::Primary,
                    PositionPolicy::Live,
                ));
                self.close("pass-through released");
                Decision::CONSUME
            }
            GestureState::Rotating => {
                synth.emit_now(EventSynthesizer::build(
                    event,
                    PointerEventKind::Up,
                    PointerButton::Secondary,
                    PositionPolicy::Live,
                ));
                self.close("rotation released");
                Decision::CONSUME
            }
            GestureState::Scrolling => {
                self.close("scroll released");
                Decision::CONSUME
            }
            GestureState::Idle
            | GestureState::ProbePending
            | GestureState::RotateArmed
            | GestureState::ScrollArmed => {
                let not_before = event.timestamp + session.thresholds.tap_delay;
                synth.schedule(
                    event,
                    DeferredAction::Click(PointerButton::Primary),
                    not_before,
                    Some(session.id),
                );
                tracing::debug!(
                    target: "touchmouse.classifier",
                    session = session.id.0,
                    from = session.state.as_str(),
                    "tap, click deferred"
                );
                session.state = GestureState::ClickPending;
                Decision::CONSUME
            }
        }
    }

    fn on_wheel(&self, event: &PointerEvent) -> Decision {
        match &self.session {
            Some(s) if s.state == GestureState::Scrolling => {
                Decision::replace(event.relocated(s.pinned))
            }
            _ => Decision::PASS,
        }
    }

    /// Schedule a context action due immediately.
    ///
    /// A full queue drops its queued entry; if that was the pending tap
    /// click, its session ends here since no completion will arrive.
    fn defer(&mut self, synth: &mut EventSynthesizer, event: &PointerEvent, action: DeferredAction) {
        let dropped = synth.schedule(event, action, event.timestamp, None);
        let Some(id) = dropped.and_then(|entry| entry.completes) else {
            return;
        };
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.id == id && s.state == GestureState::ClickPending)
        {
            self.close("click dropped");
        }
    }

    fn on_context_press(&mut self, event: &PointerEvent, synth: &mut EventSynthesizer) -> Decision {
        self.context_origin = Some(event.position);
        self.defer(synth, event, DeferredAction::Press(PointerButton::Tertiary));
        tracing::debug!(target: "touchmouse.classifier", "context press deferred");
        Decision::CONSUME
    }

    fn on_context_release(
        &mut self,
        event: &PointerEvent,
        ctx: &InputContext<'_>,
        synth: &mut EventSynthesizer,
    ) -> Decision {
        let Some(origin) = self.context_origin.take() else {
            return Decision::PASS;
        };
        if event.is_consumed() || !ctx.interactive {
            return Decision::PASS;
        }

        // The deferred press has not reached the host yet; keep the pair
        // ordered.
        let pending_press = DeferredAction::Press(PointerButton::Tertiary);
        if synth.has_pending(pending_press) {
            self.defer(synth, event, DeferredAction::Release(PointerButton::Tertiary));
            return Decision::CONSUME;
        }

        let t = ctx.thresholds.thresholds();
        let dragged = origin.distance(event.position) >= t.right_click_release_distance;
        let over_menu = ctx.menu.is_some_and(|m| m.contains_strict(event.position));
        if t.right_click_release_on_menus && dragged && over_menu {
            self.defer(synth, event, DeferredAction::Click(PointerButton::Primary));
            tracing::debug!(target: "touchmouse.classifier", "context release accepts menu entry");
        }
        Decision::PASS
    }
}

// ---------------------------------------------------------------------------
// Drag handling
// ---------------------------------------------------------------------------

fn rotate(
    session: &mut GestureSession,
    event: &PointerEvent,
    synth: &mut EventSynthesizer,
) -> Decision {
    if session.state == GestureState::RotateArmed {
        let distance = session.origin.distance(event.position);
        if distance < session.thresholds.rotate_distance {
            tracing::trace!(
                target: "touchmouse.classifier",
                session = session.id.0,
                distance,
                "below rotate distance"
            );
            return Decision::CONSUME;
        }
        synth.emit_now(EventSynthesizer::build(
            event,
            PointerEventKind::Down,
            PointerButton::Secondary,
            PositionPolicy::Fixed(session.origin),
        ));
        session.state = GestureState::Rotating;
        tracing::debug!(
            target: "touchmouse.classifier",
            session = session.id.0,
            distance,
            "rotation started"
        );
    }
    Decision::replace(event.rebuild(
        PointerEventKind::Move,
        PointerButton::Secondary,
        event.position,
    ))
}

fn scroll(
    session: &mut GestureSession,
    event: &PointerEvent,
    synth: &mut EventSynthesizer,
) -> Decision {
    let point = event.position;

    if session.minimap && session.axis.is_none() {
        let start = session.thresholds.scroll_distance_per_tick.saturating_mul(2);
        if session.origin.distance(point) >= start {
            let (dx, dy) = point.delta_from(session.origin);
            let axis = if dx.unsigned_abs() <= dy.unsigned_abs() {
                ScrollAxis::Zoom
            } else {
                ScrollAxis::Pan
            };
            session.axis = Some(axis);
            session.pinned = match axis {
                ScrollAxis::Zoom => session.thresholds.zoom_hold_point,
                ScrollAxis::Pan => session.origin,
            };
            session.scroll_reference = point;
            session.state = GestureState::Scrolling;
            tracing::debug!(
                target: "touchmouse.classifier",
                session = session.id.0,
                ?axis,
                "minimap axis committed"
            );
        }
        return Decision::replace(event.relocated(session.pinned));
    }

    let per_tick = session.tick_distance();
    let (dx, dy) = point.delta_from(session.scroll_reference);
    let pan = session.axis == Some(ScrollAxis::Pan);
    let ticks = if pan { dx / per_tick } else { dy / -per_tick };

    if ticks != 0 {
        let rotation = if session.inverted() { -ticks } else { ticks };
        synth.emit_now(EventSynthesizer::build(
            event,
            PointerEventKind::WheelTick { rotation },
            PointerButton::None,
            PositionPolicy::Fixed(session.pinned),
        ));
        // Advance by the distance the ticks account for, not to `point`:
        // k * per_tick of travel yields k ticks however it is split into
        // moves. The remainder carries into the next move.
        let consumed = ticks.saturating_mul(per_tick);
        session.scroll_reference = if pan {
            Point::new(session.scroll_reference.x.saturating_add(consumed), point.y)
        } else {
            Point::new(point.x, session.scroll_reference.y.saturating_sub(consumed))
        };
        session.state = GestureState::Scrolling;
        tracing::trace!(
            target: "touchmouse.classifier",
            session = session.id.0,
            ticks,
            rotation,
            "wheel tick"
        );
    }

    Decision::replace(event.relocated(session.pinned))
}
