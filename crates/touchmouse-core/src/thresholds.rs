#![forbid(unsafe_code)]

//! Gesture thresholds and where they come from.
//!
//! A [`Thresholds`] value is snapshotted when a gesture session opens and is
//! never re-read for the rest of that touch. Hosts that let users retune
//! values at runtime publish them through [`SharedThresholds`]; the new
//! values take effect at the next touch.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;

use crate::geometry::Point;

/// Default rotate distance in pixels.
pub const DEFAULT_ROTATE_DISTANCE: i32 = 35;
/// Default content-scroll distance per wheel tick in pixels.
pub const DEFAULT_SCROLL_DISTANCE_PER_TICK: i32 = 8;
/// Default minimap-scroll distance per wheel tick in pixels.
pub const DEFAULT_MINIMAP_SCROLL_DISTANCE_PER_TICK: i32 = 5;
/// Default distance a context-menu drag must travel before its release
/// accepts the menu entry under the finger.
pub const DEFAULT_RIGHT_CLICK_RELEASE_DISTANCE: i32 = 14;
/// Default point the pointer is parked on while zooming the minimap.
pub const DEFAULT_ZOOM_HOLD_POINT: Point = Point::new(12, 12);

/// Immutable per-session tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Displacement from the drag origin at which a plain drag becomes a
    /// camera rotation.
    pub rotate_distance: i32,
    /// Vertical travel per wheel tick over scrollable content.
    pub scroll_distance_per_tick: i32,
    /// Travel per wheel tick over the minimap.
    pub minimap_scroll_distance_per_tick: i32,
    /// Negate content-scroll ticks.
    pub invert_scroll: bool,
    /// Negate minimap zoom ticks.
    pub invert_zoom: bool,
    /// Negate minimap pan ticks.
    pub invert_minimap_zoom: bool,
    /// Minimum age of a tap before its deferred click may fire.
    pub tap_delay: Duration,
    /// Context-menu drag distance that turns a release into an accept.
    pub right_click_release_distance: i32,
    /// Whether releasing a context-menu drag over an open menu accepts the
    /// entry under the finger.
    pub right_click_release_on_menus: bool,
    /// Where the pointer is held while a minimap zoom is in progress.
    pub zoom_hold_point: Point,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rotate_distance: DEFAULT_ROTATE_DISTANCE,
            scroll_distance_per_tick: DEFAULT_SCROLL_DISTANCE_PER_TICK,
            minimap_scroll_distance_per_tick: DEFAULT_MINIMAP_SCROLL_DISTANCE_PER_TICK,
            invert_scroll: false,
            invert_zoom: true,
            invert_minimap_zoom: false,
            tap_delay: Duration::ZERO,
            right_click_release_distance: DEFAULT_RIGHT_CLICK_RELEASE_DISTANCE,
            right_click_release_on_menus: false,
            zoom_hold_point: DEFAULT_ZOOM_HOLD_POINT,
        }
    }
}

impl Thresholds {
    /// Set the rotate distance.
    #[must_use]
    pub fn rotate_distance(mut self, px: i32) -> Self {
        self.rotate_distance = px;
        self
    }

    /// Set the content-scroll distance per tick.
    #[must_use]
    pub fn scroll_distance_per_tick(mut self, px: i32) -> Self {
        self.scroll_distance_per_tick = px;
        self
    }

    /// Set the minimap-scroll distance per tick.
    #[must_use]
    pub fn minimap_scroll_distance_per_tick(mut self, px: i32) -> Self {
        self.minimap_scroll_distance_per_tick = px;
        self
    }

    /// Set the tap delay.
    #[must_use]
    pub fn tap_delay(mut self, delay: Duration) -> Self {
        self.tap_delay = delay;
        self
    }

    /// Problems that would make gestures misbehave.
    ///
    /// Distances must be positive: a zero scroll distance would divide by
    /// zero and a zero rotate distance would turn every touch into a drag.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, value) in [
            ("rotate_distance", self.rotate_distance),
            ("scroll_distance_per_tick", self.scroll_distance_per_tick),
            (
                "minimap_scroll_distance_per_tick",
                self.minimap_scroll_distance_per_tick,
            ),
            (
                "right_click_release_distance",
                self.right_click_release_distance,
            ),
        ] {
            if value <= 0 {
                errors.push(format!("{name} must be > 0, got {value}"));
            }
        }
        errors
    }

    /// Clamp every distance to at least one pixel.
    ///
    /// Used on values the runtime cannot reject (e.g. a host retuning live).
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.rotate_distance = self.rotate_distance.max(1);
        self.scroll_distance_per_tick = self.scroll_distance_per_tick.max(1);
        self.minimap_scroll_distance_per_tick = self.minimap_scroll_distance_per_tick.max(1);
        self.right_click_release_distance = self.right_click_release_distance.max(1);
        self
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Supplies thresholds. Read once per gesture session.
pub trait ThresholdSource: Send + Sync {
    /// Current thresholds.
    fn thresholds(&self) -> Thresholds;
}

impl ThresholdSource for Thresholds {
    fn thresholds(&self) -> Thresholds {
        *self
    }
}

/// Hot-swappable thresholds shared between the host's settings code and the
/// gesture runtime.
#[derive(Debug)]
pub struct SharedThresholds {
    current: ArcSwap<Thresholds>,
}

impl SharedThresholds {
    /// Create a shared cell holding `initial`.
    #[must_use]
    pub fn new(initial: Thresholds) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Publish new thresholds. Sessions already open keep their snapshot.
    pub fn store(&self, thresholds: Thresholds) {
        self.current.store(Arc::new(thresholds));
    }
}

impl Default for SharedThresholds {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl ThresholdSource for SharedThresholds {
    fn thresholds(&self) -> Thresholds {
        **self.current.load()
    }
}
