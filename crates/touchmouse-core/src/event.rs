#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! The host delivers touches as if they came from a mouse: a primary-button
//! press, drags while the finger is down, and a release. The runtime answers
//! with the same event type, either passing the original through, consuming
//! it, or replacing it with a rebuilt copy.
//!
//! # Design Notes
//!
//! - Events are plain `Copy` values. A synthetic event is always built fresh
//!   from a prototype via [`PointerEvent::rebuild`], never mutated after it
//!   has been handed to the host.
//! - The consumed flag is the only mutable part of an in-flight event; it
//!   tells the host that no later listener should act on it.

use bitflags::bitflags;
use web_time::Instant;

use crate::geometry::Point;

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// A button was pressed.
    Down,

    /// The pointer moved. With a button held this is a drag.
    Move,

    /// A button was released.
    Up,

    /// The pointer entered the host surface.
    Enter,

    /// The pointer left the host surface.
    Exit,

    /// The host's own click notification, sent after a press/release pair.
    Click,

    /// Mouse wheel rotated by `rotation` notches. Positive scrolls toward
    /// the user (content moves up), negative away.
    WheelTick {
        /// Signed notch count.
        rotation: i32,
    },
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// No button (hover moves, wheel events).
    #[default]
    None,

    /// The touch / left button.
    Primary,

    /// The button the host binds to camera-rotation drags.
    Secondary,

    /// The host's context-menu button.
    Tertiary,
}

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A single pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// The button this event concerns.
    pub button: PointerButton,

    /// Position on the host surface.
    pub position: Point,

    /// When the host observed the event.
    pub timestamp: Instant,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    consumed: bool,
}

impl PointerEvent {
    /// Create a new, unconsumed event without modifiers.
    #[must_use]
    pub const fn new(
        kind: PointerEventKind,
        button: PointerButton,
        position: Point,
        timestamp: Instant,
    ) -> Self {
        Self {
            kind,
            button,
            position,
            timestamp,
            modifiers: Modifiers::NONE,
            consumed: false,
        }
    }

    /// Create an event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Build a fresh event from this prototype.
    ///
    /// Timestamp and modifiers are copied; kind, button, and position are
    /// overridden. The result is never consumed.
    #[must_use]
    pub const fn rebuild(&self, kind: PointerEventKind, button: PointerButton, position: Point) -> Self {
        Self {
            kind,
            button,
            position,
            timestamp: self.timestamp,
            modifiers: self.modifiers,
            consumed: false,
        }
    }

    /// The same event reported at a different position.
    #[must_use]
    pub const fn relocated(&self, position: Point) -> Self {
        self.rebuild(self.kind, self.button, position)
    }

    /// Mark the event as handled so later listeners and the host ignore it.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Whether some listener has already handled this event.
    #[must_use]
    pub const fn is_consumed(&self) -> bool {
        self.consumed
    }
}
