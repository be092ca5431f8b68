//! Freeform card manipulation engine for the memory wall.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It turns raw
//! pointer and keyboard events on a single memento card into pose updates:
//! grid-snapped drags, corner-anchored resizes, temporary raising above
//! sibling cards, and a guarded delete flow. The host wall view is responsible
//! only for wiring DOM events to a controller and persisting the resulting
//! [`card::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`card`] | Per-card state controller and the [`card::Action`]s it emits |
//! | [`geometry`] | Pure drag/resize transforms and grid snapping |
//! | [`hit`] | Hit-zone roles and gesture classification |
//! | [`input`] | Pointer samples, keys, and the gesture state machine |
//! | [`dom`] | Binding to a `web_sys::Element` for pointer capture |
//! | [`consts`] | Shared numeric constants (grid, width bounds, top sentinel) |

pub mod card;
pub mod consts;
pub mod dom;
pub mod geometry;
pub mod hit;
pub mod input;
