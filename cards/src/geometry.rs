//! Pure geometry for card gestures: grid snapping, drag and corner-anchored resize.
//!
//! Every function here is a stateless transform from a start snapshot plus the
//! current pointer position to the next [`Pose`]. Nothing in this module holds
//! state or performs I/O, so the whole gesture math is testable with plain
//! numbers.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_W, DIAGONAL_ASSIST, GRID, MAX_W, MIN_W};

/// A point in screen (pointer) or layout space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Position, size and stacking of one card on the wall.
///
/// `rotation_deg` is cosmetic; drag and resize carry it through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Left edge in layout pixels.
    pub x: f64,
    /// Top edge in layout pixels.
    pub y: f64,
    /// Stacking order; higher values draw on top.
    pub z: i64,
    /// Card width in layout pixels.
    pub width: f64,
    /// Cosmetic tilt in degrees.
    pub rotation_deg: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0, width: DEFAULT_W, rotation_deg: 0.0 }
    }
}

impl Pose {
    /// Height implied by the 16:9 media frame, rounded to whole pixels.
    #[must_use]
    pub fn aspect_height(&self) -> f64 {
        (self.width * 9.0 / 16.0).round()
    }

    /// The `W×H` chip shown while resizing.
    #[must_use]
    pub fn size_label(&self) -> String {
        format!("{}×{}", self.width.round(), self.aspect_height())
    }
}

/// Which corner of the card follows the pointer during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Corner {
    /// West corners move the left edge, so `x` must be recomputed.
    #[must_use]
    pub fn is_west(self) -> bool {
        matches!(self, Self::Nw | Self::Sw)
    }

    /// North corners grow when the pointer moves up.
    #[must_use]
    pub fn is_north(self) -> bool {
        matches!(self, Self::Nw | Self::Ne)
    }
}

/// Snapshot taken at drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    /// Card x at pointer-down.
    pub x0: f64,
    /// Card y at pointer-down.
    pub y0: f64,
    /// Pointer x at pointer-down.
    pub mx0: f64,
    /// Pointer y at pointer-down.
    pub my0: f64,
}

/// Snapshot taken at resize start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeAnchor {
    /// Corner being dragged.
    pub corner: Corner,
    /// Pointer x at pointer-down.
    pub mx0: f64,
    /// Pointer y at pointer-down.
    pub my0: f64,
    /// Card x at pointer-down.
    pub x0: f64,
    /// Card y at pointer-down.
    pub y0: f64,
    /// Card width at pointer-down.
    pub w0: f64,
}

/// Round `value` to the nearest multiple of [`GRID`]. Ties round up, toward
/// positive infinity, for negative positions too.
#[must_use]
pub fn snap(value: f64) -> f64 {
    (value / GRID + 0.5).floor() * GRID
}

/// Next `(x, y)` for a drag that started at `anchor` and is now at `pointer`.
#[must_use]
pub fn drag_to(anchor: &DragAnchor, pointer: Point) -> Point {
    let dx = pointer.x - anchor.mx0;
    let dy = pointer.y - anchor.my0;
    Point::new(snap(anchor.x0 + dx), snap(anchor.y0 + dy))
}

/// Next `(x, width)` for a resize that started at `anchor` and is now at `pointer`.
///
/// The width is clamped to `[MIN_W, MAX_W]` before `x` is derived from it, so a
/// west-corner resize that hits a bound keeps the east edge where it was.
#[must_use]
pub fn resize_to(anchor: &ResizeAnchor, pointer: Point) -> (f64, f64) {
    let dx = pointer.x - anchor.mx0;
    let dy = pointer.y - anchor.my0;

    let mut delta = if anchor.corner.is_west() { -dx } else { dx };
    let vertical = if anchor.corner.is_north() { -dy } else { dy };
    delta += vertical * DIAGONAL_ASSIST;

    let width = snap(anchor.w0 + delta).clamp(MIN_W, MAX_W);
    let x = if anchor.corner.is_west() { snap(anchor.x0 + (anchor.w0 - width)) } else { anchor.x0 };
    (x, width)
}

/// Keep the card's top edge at or below `safe_top`.
///
/// Host rendering policy only; the gesture math never applies it.
#[must_use]
pub fn clamp_top(pose: Pose, safe_top: f64) -> Pose {
    Pose { y: pose.y.max(safe_top), ..pose }
}
