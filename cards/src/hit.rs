//! Hit-zone classification for pointer-down events on a card.
//!
//! The rendering layer tags every interactive element of a card with a role
//! marker. [`HitZone`] is the parsed form of that marker and [`classify`]
//! decides which gesture (if any) a pointer-down on it starts.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::Corner;

/// Role marker value for action controls such as the delete button.
pub const ROLE_ACTION: &str = "action";

/// Role marker value for resize handles; the direction travels separately.
pub const ROLE_RESIZE: &str = "resize";

/// Which part of a card was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    /// An action control; the card ignores the press entirely.
    Action,
    /// One of the eight resize handles.
    ResizeHandle(Direction),
    /// Anything else inside the card.
    Body,
}

/// Compass direction of a resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl Direction {
    /// Parse a lowercase compass marker (`"n"`, `"se"`, ...).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "n" => Some(Self::N),
            "ne" => Some(Self::Ne),
            "e" => Some(Self::E),
            "se" => Some(Self::Se),
            "s" => Some(Self::S),
            "sw" => Some(Self::Sw),
            "w" => Some(Self::W),
            "nw" => Some(Self::Nw),
            _ => None,
        }
    }

    /// The corner whose resize math this handle uses.
    ///
    /// East and west edges behave like their southern corners. North and south
    /// edges have no corner: cards are never resized from the top or bottom.
    #[must_use]
    pub fn corner(self) -> Option<Corner> {
        match self {
            Self::Nw => Some(Corner::Nw),
            Self::Ne => Some(Corner::Ne),
            Self::Sw | Self::W => Some(Corner::Sw),
            Self::Se | Self::E => Some(Corner::Se),
            Self::N | Self::S => None,
        }
    }
}

impl HitZone {
    /// Build a zone from the host's role markers.
    ///
    /// A resize role with a missing or unknown direction, and any unrecognized
    /// role, fall back to [`HitZone::Body`].
    #[must_use]
    pub fn from_role(role: Option<&str>, dir: Option<&str>) -> Self {
        match role {
            Some(ROLE_ACTION) => Self::Action,
            Some(ROLE_RESIZE) => dir.and_then(Direction::parse).map_or(Self::Body, Self::ResizeHandle),
            _ => Self::Body,
        }
    }
}

/// What a pointer-down on a zone should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureStart {
    /// Move the card.
    Drag,
    /// Resize the card from the given corner.
    Resize(Corner),
    /// Press on an action control; no gesture.
    Action,
    /// Press on a handle that does not resize (north/south edge).
    Ignored,
}

/// Decide which gesture a pointer-down on `zone` starts.
#[must_use]
pub fn classify(zone: HitZone) -> GestureStart {
    match zone {
        HitZone::Action => GestureStart::Action,
        HitZone::ResizeHandle(dir) => dir.corner().map_or(GestureStart::Ignored, GestureStart::Resize),
        HitZone::Body => GestureStart::Drag,
    }
}
