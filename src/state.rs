//! Wall records and the live state of an open wall.
//!
//! DESIGN
//! ======
//! `WallState` is the host side of the manipulation engine: the visible
//! memento collection in display order, one `CardController` per memento,
//! the lifecycle of optimistic inserts, and the committed layouts waiting
//! for the persistence task. The live pose shown to the user always comes
//! from the controller; committed layouts are snapshots taken on release.

use std::collections::{HashMap, VecDeque};

use cards::card::{Card, CardController, CardKind, CardOptions};
use cards::consts::DEFAULT_W;
use cards::geometry::Pose;
use cards::input::InputState;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

// =============================================================================
// RECORDS
// =============================================================================

/// Background theme of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WallBackground {
    SereneSky,
    WarmCanvas,
    DarkTribute,
}

/// A wall: one board of mementos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: Uuid,
    pub title: String,
    pub background: WallBackground,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One memento as stored. Mirrors the `mementos` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memento {
    pub id: Uuid,
    pub wall_id: Uuid,
    pub kind: CardKind,
    pub title: Option<String>,
    pub body: Option<String>,
    /// Photo or video URL.
    pub media_url: Option<String>,
    /// Poster image for videos.
    pub thumb_url: Option<String>,
    pub x: f64,
    pub y: f64,
    pub z: Option<i64>,
    pub rotation_deg: Option<f64>,
    pub width: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Memento {
    /// Pose with the record's gaps filled in (z 0, rotation 0, width 260).
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose {
            x: self.x,
            y: self.y,
            z: self.z.unwrap_or(0),
            width: self.width.unwrap_or(DEFAULT_W),
            rotation_deg: self.rotation_deg.unwrap_or(0.0),
        }
    }

    pub fn apply_pose(&mut self, pose: Pose) {
        self.x = pose.x;
        self.y = pose.y;
        self.z = Some(pose.z);
        self.width = Some(pose.width);
        self.rotation_deg = Some(pose.rotation_deg);
    }

    #[must_use]
    pub fn card(&self) -> Card {
        Card { id: self.id, kind: self.kind, pose: self.pose() }
    }
}

/// The persisted part of a pose: `{x, y, z, rotation_deg, width}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub x: f64,
    pub y: f64,
    pub z: i64,
    pub rotation_deg: f64,
    pub width: f64,
}

impl Layout {
    /// The layout as a pose; layouts always carry every field.
    #[must_use]
    pub fn pose(self) -> Pose {
        Pose { x: self.x, y: self.y, z: self.z, width: self.width, rotation_deg: self.rotation_deg }
    }
}

impl From<Pose> for Layout {
    fn from(pose: Pose) -> Self {
        Self { x: pose.x, y: pose.y, z: pose.z, rotation_deg: pose.rotation_deg, width: pose.width }
    }
}

/// Rolled-back creates remembered per wall; older ones are evicted.
pub const MAX_ROLLED_BACK: usize = 32;

/// Where an optimistically inserted or removed entity stands with the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Insert or delete outstanding; layouts are held back and further
    /// deletes are ignored.
    Pending,
    /// The store has the entity.
    Confirmed,
    /// The store rejected an insert and the optimistic entry was removed.
    RolledBack,
}

// =============================================================================
// WALL STATE
// =============================================================================

/// Live state of one open wall.
pub struct WallState {
    /// Visible mementos in display order.
    pub mementos: Vec<Memento>,
    /// One controller per visible memento.
    pub cards: HashMap<Uuid, CardController>,
    /// Store status per memento id, including rolled-back ones.
    pub lifecycle: HashMap<Uuid, Lifecycle>,
    /// Committed layouts not yet flushed.
    pub dirty: HashMap<Uuid, Layout>,
    rolled_back: VecDeque<Uuid>,
    options: CardOptions,
}

impl WallState {
    #[must_use]
    pub fn new(options: CardOptions) -> Self {
        Self {
            mementos: Vec::new(),
            cards: HashMap::new(),
            lifecycle: HashMap::new(),
            dirty: HashMap::new(),
            rolled_back: VecDeque::new(),
            options,
        }
    }

    /// Hydrate from the store's listing; every memento starts `Confirmed`.
    pub fn load(&mut self, mementos: Vec<Memento>) {
        self.mementos.clear();
        self.cards.clear();
        self.lifecycle.clear();
        self.dirty.clear();
        self.rolled_back.clear();
        for memento in mementos {
            self.push(memento, Lifecycle::Confirmed);
        }
    }

    /// Append a memento with its own controller.
    pub fn push(&mut self, memento: Memento, lifecycle: Lifecycle) {
        self.cards.insert(memento.id, CardController::new(memento.card(), self.options));
        self.lifecycle.insert(memento.id, lifecycle);
        self.mementos.push(memento);
    }

    /// Put a memento in front of the others, as freshly created ones are shown.
    pub fn push_front(&mut self, memento: Memento, lifecycle: Lifecycle) {
        self.cards.insert(memento.id, CardController::new(memento.card(), self.options));
        self.lifecycle.insert(memento.id, lifecycle);
        self.mementos.insert(0, memento);
    }

    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<&Memento> {
        self.mementos.iter().find(|m| m.id == *id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Memento> {
        self.mementos.iter_mut().find(|m| m.id == *id)
    }

    /// Take a memento out of the visible collection. Its controller stays so
    /// an outstanding delete can still be settled.
    pub fn remove_visible(&mut self, id: &Uuid) -> Option<Memento> {
        let index = self.mementos.iter().position(|m| m.id == *id)?;
        Some(self.mementos.remove(index))
    }

    /// Put a removed memento back and restore `created_at` order.
    pub fn restore(&mut self, memento: Memento) {
        if let Some(card) = self.cards.get_mut(&memento.id) {
            card.sync(memento.pose());
        } else {
            self.cards.insert(memento.id, CardController::new(memento.card(), self.options));
        }
        self.mementos.push(memento);
        self.mementos.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    }

    /// Swap an optimistic entry for the stored row, keeping its display slot.
    /// A layout committed while the insert was outstanding moves to the new id.
    pub fn replace(&mut self, old_id: &Uuid, mut memento: Memento) {
        let pending = self.dirty.remove(old_id);
        self.cards.remove(old_id);
        self.lifecycle.remove(old_id);
        if let Some(layout) = pending {
            memento.apply_pose(layout.pose());
            self.dirty.insert(memento.id, layout);
        }
        self.cards.insert(memento.id, CardController::new(memento.card(), self.options));
        self.lifecycle.insert(memento.id, Lifecycle::Confirmed);
        match self.mementos.iter().position(|m| m.id == *old_id) {
            Some(index) => self.mementos[index] = memento,
            None => self.mementos.insert(0, memento),
        }
    }

    /// Drop every trace of a memento except its lifecycle record.
    pub fn forget(&mut self, id: &Uuid) {
        self.mementos.retain(|m| m.id != *id);
        self.cards.remove(id);
        self.dirty.remove(id);
    }

    /// Drop a memento whose insert failed and remember it as `RolledBack`.
    /// Only the last [`MAX_ROLLED_BACK`] such records are kept.
    pub fn mark_rolled_back(&mut self, id: Uuid) {
        self.forget(&id);
        self.lifecycle.insert(id, Lifecycle::RolledBack);
        self.rolled_back.push_back(id);
        while self.rolled_back.len() > MAX_ROLLED_BACK {
            if let Some(old) = self.rolled_back.pop_front() {
                self.lifecycle.remove(&old);
            }
        }
    }

    /// Next stacking value above every visible memento (1 on an empty wall).
    ///
    /// A card raised for a gesture counts with its resting z, not the sentinel.
    #[must_use]
    pub fn top_z(&self) -> i64 {
        self.mementos.iter().map(|m| self.resting_z(m)).max().unwrap_or(0) + 1
    }

    fn resting_z(&self, memento: &Memento) -> i64 {
        match self.cards.get(&memento.id).map(CardController::input) {
            Some(InputState::Dragging { z0, .. } | InputState::Resizing { z0, .. }) => *z0,
            _ => memento.z.unwrap_or(0),
        }
    }

    /// Mirror a live pose into the visible record.
    pub fn show_pose(&mut self, id: &Uuid, pose: Pose) -> bool {
        let Some(memento) = self.get_mut(id) else {
            return false;
        };
        memento.apply_pose(pose);
        true
    }

    /// Mirror a committed pose and queue it for persistence.
    pub fn commit_pose(&mut self, id: &Uuid, pose: Pose) -> bool {
        if !self.show_pose(id, pose) {
            return false;
        }
        self.dirty.insert(*id, Layout::from(pose));
        true
    }

    /// Remove and return committed layouts for confirmed mementos.
    /// Layouts of pending mementos stay queued until the insert lands.
    pub fn drain_dirty(&mut self) -> Vec<(Uuid, Layout)> {
        let ready: Vec<Uuid> = self
            .dirty
            .keys()
            .filter(|id| self.lifecycle.get(id) == Some(&Lifecycle::Confirmed))
            .copied()
            .collect();
        ready
            .into_iter()
            .filter_map(|id| self.dirty.remove(&id).map(|layout| (id, layout)))
            .collect()
    }

    /// Requeue a layout whose write failed, unless a newer commit replaced it.
    pub fn requeue(&mut self, id: Uuid, layout: Layout) {
        if self.cards.contains_key(&id) {
            self.dirty.entry(id).or_insert(layout);
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
