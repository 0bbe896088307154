#![forbid(unsafe_code)]

//! Live state of the one active touch.
//!
//! A [`GestureSession`] is created when a primary press opens a gesture and
//! dropped when the gesture finishes. The classifier holds at most one, so
//! "no session" and "idle" are the same thing.

use std::fmt;

use touchmouse_core::{Point, PointerEvent, Thresholds};

/// Identity of a gesture session. Strictly increasing per classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification state of a gesture.
///
/// ```text
/// Idle ─► ProbePending ─┬─► PassThrough ────────────────► Idle
///                       ├─► RotateArmed ─► Rotating ────► Idle
///                       ├─► ScrollArmed ─► Scrolling ───► Idle
///                       └─► (release) ClickPending ─────► Idle
/// ```
///
/// Any state short of `Rotating`, `Scrolling` or `PassThrough` becomes
/// `ClickPending` on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    /// No touch in progress.
    #[default]
    Idle,
    /// Press consumed; waiting for the authoritative region probe.
    ProbePending,
    /// The touch belongs to an on-screen control and is replayed verbatim.
    PassThrough,
    /// Will rotate the camera once the drag passes the rotate distance.
    RotateArmed,
    /// Camera rotation in progress (secondary button held).
    Rotating,
    /// Over scrollable content; drags will produce wheel ticks.
    ScrollArmed,
    /// At least one wheel tick produced (or minimap axis committed).
    Scrolling,
    /// Released as a tap; waiting for the deferred click to dispatch.
    ClickPending,
}

impl GestureState {
    /// Stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ProbePending => "probe_pending",
            Self::PassThrough => "pass_through",
            Self::RotateArmed => "rotate_armed",
            Self::Rotating => "rotating",
            Self::ScrollArmed => "scroll_armed",
            Self::Scrolling => "scrolling",
            Self::ClickPending => "click_pending",
        }
    }

    /// Whether moves in this state scroll.
    #[must_use]
    pub const fn is_scroll(self) -> bool {
        matches!(self, Self::ScrollArmed | Self::Scrolling)
    }

    /// Whether moves in this state rotate.
    #[must_use]
    pub const fn is_rotate(self) -> bool {
        matches!(self, Self::RotateArmed | Self::Rotating)
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis a minimap drag has committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollAxis {
    /// Vertical drag: zoom the minimap.
    Zoom,
    /// Horizontal drag: pan the minimap.
    Pan,
}

/// State for the one active touch.
#[derive(Debug, Clone)]
pub struct GestureSession {
    /// Session identity, used to reject stale probe results.
    pub id: SessionId,
    /// The raw press that opened the session. Prototype for replays.
    pub down: PointerEvent,
    /// Where the press landed. Also the drag origin.
    pub origin: Point,
    /// Classification state.
    pub state: GestureState,
    /// Position reported to the host while scrolling.
    pub pinned: Point,
    /// Point from which scroll distance is measured.
    pub scroll_reference: Point,
    /// Whether the scroll region is the minimap.
    pub minimap: bool,
    /// Committed minimap axis. Always `None` for content scrolling.
    pub axis: Option<ScrollAxis>,
    /// Threshold snapshot taken at press time.
    pub thresholds: Thresholds,
}

impl GestureSession {
    /// Open a session for `down`.
    #[must_use]
    pub fn open(id: SessionId, down: PointerEvent, thresholds: Thresholds) -> Self {
        let origin = down.position;
        Self {
            id,
            down,
            origin,
            state: GestureState::ProbePending,
            pinned: origin,
            scroll_reference: origin,
            minimap: false,
            axis: None,
            thresholds,
        }
    }

    /// Whether the touch is being replayed to a control.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.state == GestureState::PassThrough
    }

    /// Distance per wheel tick for this session's scroll region.
    #[must_use]
    pub fn tick_distance(&self) -> i32 {
        if self.minimap {
            self.thresholds.minimap_scroll_distance_per_tick
        } else {
            self.thresholds.scroll_distance_per_tick
        }
    }

    /// Whether wheel ticks for the current axis are negated.
    #[must_use]
    pub fn inverted(&self) -> bool {
        match (self.minimap, self.axis) {
            (false, _) => self.thresholds.invert_scroll,
            (true, Some(ScrollAxis::Pan)) => self.thresholds.invert_minimap_zoom,
            (true, _) => self.thresholds.invert_zoom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchmouse_core::{PointerButton, PointerEventKind};
    use web_time::Instant;

    fn session(minimap: bool, axis: Option<ScrollAxis>) -> GestureSession {
        let down = PointerEvent::new(
            PointerEventKind::Down,
            PointerButton::Primary,
            Point::new(40, 60),
            Instant::now(),
        );
        let mut s = GestureSession::open(SessionId(1), down, Thresholds::default());
        s.minimap = minimap;
        s.axis = axis;
        s
    }

    #[test]
    fn open_seeds_every_point_from_press() {
        let s = session(false, None);
        assert_eq!(s.state, GestureState::ProbePending);
        assert_eq!(s.origin, Point::new(40, 60));
        assert_eq!(s.pinned, s.origin);
        assert_eq!(s.scroll_reference, s.origin);
        assert!(!s.is_pass_through());
    }

    #[test]
    fn tick_distance_follows_region() {
        assert_eq!(session(false, None).tick_distance(), 8);
        assert_eq!(session(true, Some(ScrollAxis::Zoom)).tick_distance(), 5);
    }

    #[test]
    fn inversion_per_axis() {
        // Defaults: scroll false, zoom true, minimap pan false.
        assert!(!session(false, None).inverted());
        assert!(session(true, Some(ScrollAxis::Zoom)).inverted());
        assert!(!session(true, Some(ScrollAxis::Pan)).inverted());
    }

    #[test]
    fn state_predicates_and_labels() {
        assert!(GestureState::ScrollArmed.is_scroll());
        assert!(GestureState::Scrolling.is_scroll());
        assert!(GestureState::RotateArmed.is_rotate());
        assert!(!GestureState::ClickPending.is_rotate());
        assert_eq!(GestureState::default(), GestureState::Idle);
        assert_eq!(GestureState::ProbePending.to_string(), "probe_pending");
        assert_eq!(SessionId(7).to_string(), "#7");
    }
}
