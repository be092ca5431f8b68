//! Memory wall host: loads a wall's mementos, drives one card controller per
//! memento, and keeps the store in step with what the user sees.
//!
//! Manipulation itself lives in the `cards` crate. This crate routes pointer
//! and key events to it, applies the resulting pose changes, runs optimistic
//! create and delete against a [`store::MementoStore`], and flushes committed
//! layouts in the background.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `WALL_*` environment configuration |
//! | [`state`] | Memento records and the live state of an open wall |
//! | [`store`] | Store contract and the in-memory store |
//! | [`services::wall`] | Event routing, optimistic create and delete |
//! | [`services::persistence`] | Debounced layout flush |
//! | [`services::media`] | Upload keys and content types |
//! | [`services::style`] | Per-card float animation jitter |

pub mod config;
pub mod services;
pub mod state;
pub mod store;
