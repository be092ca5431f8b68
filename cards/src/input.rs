//! Input model: pointer samples, keys, and the per-card gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up. Each active variant carries the snapshot needed to compute the
//! next pose from the current pointer position and to restore anything the
//! gesture changed temporarily.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::{DragAnchor, Point, ResizeAnchor};

/// Browser pointer id.
pub type PointerId = i32;

/// One pointer sample in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Which pointer produced the sample.
    pub pointer_id: PointerId,
    /// Pointer position (client coordinates).
    pub point: Point,
}

impl PointerEvent {
    #[must_use]
    pub fn new(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self { pointer_id, point: Point::new(x, y) }
    }
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this key asks to delete the focused card.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }
}

/// Which gesture a card is in. Dragging and resizing are exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    None,
    Dragging,
    Resizing,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The card follows the pointer.
    Dragging {
        /// Pointer that owns the gesture.
        pointer_id: PointerId,
        /// Card and pointer position at pointer-down.
        anchor: DragAnchor,
        /// Stacking order before the card was raised; restored on release.
        z0: i64,
    },
    /// One corner of the card follows the pointer.
    Resizing {
        /// Pointer that owns the gesture.
        pointer_id: PointerId,
        /// Corner plus starting geometry.
        anchor: ResizeAnchor,
        /// Stacking order before the card was raised; restored on release.
        z0: i64,
    },
}

impl InputState {
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::Idle => Mode::None,
            Self::Dragging { .. } => Mode::Dragging,
            Self::Resizing { .. } => Mode::Resizing,
        }
    }

    /// Pointer that owns the active gesture, if any.
    #[must_use]
    pub fn pointer_id(&self) -> Option<PointerId> {
        match self {
            Self::Idle => None,
            Self::Dragging { pointer_id, .. } | Self::Resizing { pointer_id, .. } => Some(*pointer_id),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
