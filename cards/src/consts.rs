//! Shared numeric constants for the cards crate.

// ── Grid ────────────────────────────────────────────────────────

/// Snap unit for positions and widths, in layout pixels.
pub const GRID: f64 = 12.0;

// ── Size ────────────────────────────────────────────────────────

/// Narrowest a card may be resized to.
pub const MIN_W: f64 = 160.0;

/// Widest a card may be resized to.
pub const MAX_W: f64 = 640.0;

/// Width used when a record carries no width of its own.
pub const DEFAULT_W: f64 = 260.0;

/// Weight of vertical pointer movement in resize deltas. Horizontal dominates.
pub const DIAGONAL_ASSIST: f64 = 0.15;

// ── Stacking ────────────────────────────────────────────────────

/// Temporary z for a card under the pointer. Never committed.
pub const TOP_Z: i64 = 1_000_000;
