#![forbid(unsafe_code)]

//! Authoritative region probes.
//!
//! When a touch opens a session the classifier cannot yet tell what is under
//! the finger: the full visibility check is only valid on the host's
//! authoritative context. It therefore emits a [`ProbeRequest`], the adapter
//! ships it across, and the [`ProbeResponse`] comes back over a channel.
//!
//! The request carries everything the evaluation needs, and the response
//! carries the session id it was made for. Nothing is shared between the
//! two contexts, and a response for a session that has moved on is simply
//! dropped by the classifier.

use touchmouse_core::{HitMode, HitTester, ItemTag, Point, RegionCatalog, RegionSource};

use crate::session::SessionId;

/// Why a touch is handed to the control under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThroughReason {
    /// A draggable item sits under the finger.
    Item(ItemTag),
    /// A control that needs ordinary press-and-drag.
    Blocking,
}

/// What a touch should become.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// Replay the touch verbatim.
    PassThrough(PassThroughReason),
    /// Drags produce wheel ticks.
    Scroll {
        /// The region is the minimap.
        minimap: bool,
    },
    /// Drags rotate the camera.
    Rotate,
}

/// A probe to run on the authoritative context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Session the result is for.
    pub session: SessionId,
    /// Where the touch landed.
    pub point: Point,
}

/// The result of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    /// Session the result is for.
    pub session: SessionId,
    /// Classification.
    pub verdict: ProbeVerdict,
}

impl ProbeRequest {
    /// Classify the touch against `catalog`.
    ///
    /// Checks, in priority order: an item under the point, the minimap,
    /// scrollable content, blocking controls. Anything else rotates.
    /// Must run on the authoritative context.
    #[must_use]
    pub fn evaluate(&self, source: &dyn RegionSource, catalog: &RegionCatalog) -> ProbeResponse {
        let tester = HitTester::new(source);
        let point = self.point;

        let verdict = if let Some(tag) = tester.find_item_under(point, &catalog.item_containers) {
            ProbeVerdict::PassThrough(PassThroughReason::Item(tag))
        } else if tester.contains(point, &catalog.minimap, HitMode::Authoritative) {
            ProbeVerdict::Scroll { minimap: true }
        } else if tester.contains(point, &catalog.scrollable, HitMode::Authoritative) {
            ProbeVerdict::Scroll { minimap: false }
        } else if tester.contains(point, &catalog.blocking, HitMode::Authoritative) {
            ProbeVerdict::PassThrough(PassThroughReason::Blocking)
        } else {
            ProbeVerdict::Rotate
        };

        tracing::debug!(
            target: "touchmouse.probe",
            session = self.session.0,
            x = point.x,
            y = point.y,
            ?verdict,
            "probe evaluated"
        );
        ProbeResponse {
            session: self.session,
            verdict,
        }
    }
}
