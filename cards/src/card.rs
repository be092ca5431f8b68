use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::TOP_Z;
use crate::geometry::{DragAnchor, Pose, ResizeAnchor, drag_to, resize_to};
use crate::hit::{GestureStart, HitZone, classify};
use crate::input::{InputState, Key, Mode, PointerEvent, PointerId};

#[cfg(test)]
#[path = "card_test.rs"]
mod card_test;

/// Unique identifier for a card.
pub type CardId = Uuid;

/// What a card shows. Rendering only; the gesture math never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Text,
    Photo,
    Video,
}

/// A card as the manipulation engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub kind: CardKind,
    pub pose: Pose,
}

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Live pose during a gesture. Re-render, do not persist.
    Change { id: CardId, pose: Pose },
    /// Final pose of a completed gesture. Persist.
    Commit { id: CardId, pose: Pose },
    /// Ask the user whether the card should really be deleted.
    ConfirmDelete { id: CardId },
    /// Remove the card. The host must call [`CardController::delete_settled`] when done.
    Delete(Card),
    /// Capture the pointer on the card element.
    CapturePointer(PointerId),
    /// Release a pointer captured by [`Action::CapturePointer`].
    ReleasePointer(PointerId),
}

/// Host-chosen delete behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardOptions {
    /// Ask before deleting.
    pub confirm_delete: bool,
    /// Whether the card offers delete at all.
    pub show_delete: bool,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self { confirm_delete: true, show_delete: true }
    }
}

/// Progress of the delete flow, independent of the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DeletePhase {
    #[default]
    Idle,
    AwaitingConfirmation,
    Deleting,
}

/// Owns one card's authoritative pose and its gesture session.
///
/// Every handler updates the pose synchronously and returns the actions the
/// host must apply, in order. The pose handed out in `Action::Change` is always
/// exactly the value stored here.
#[derive(Debug, Clone)]
pub struct CardController {
    card: Card,
    input: InputState,
    options: CardOptions,
    action_down: bool,
    delete: DeletePhase,
}

impl CardController {
    #[must_use]
    pub fn new(card: Card, options: CardOptions) -> Self {
        Self { card, input: InputState::Idle, options, action_down: false, delete: DeletePhase::Idle }
    }

    // --- Queries ---

    #[must_use]
    pub fn card(&self) -> &Card {
        &self.card
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.card.id
    }

    /// The live pose: the last value emitted, or the last synced one when idle.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.card.pose
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.input.mode()
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// True while a delete is outstanding; the UI disables the action control.
    #[must_use]
    pub fn is_deleting(&self) -> bool {
        self.delete == DeletePhase::Deleting
    }

    #[must_use]
    pub fn is_action_down(&self) -> bool {
        self.action_down
    }

    #[must_use]
    pub fn options(&self) -> CardOptions {
        self.options
    }

    // --- Data inputs ---

    /// Replace the pose with the host's source of truth.
    ///
    /// Ignored while a gesture is active so a re-render cannot yank the card
    /// out from under the pointer. Returns whether the pose was applied.
    pub fn sync(&mut self, pose: Pose) -> bool {
        if self.input.is_active() {
            return false;
        }
        self.card.pose = pose;
        true
    }

    // --- Pointer ---

    /// Start a gesture. Refused while another gesture or a delete is under way.
    pub fn on_pointer_down(&mut self, zone: HitZone, event: PointerEvent) -> Vec<Action> {
        if self.input.is_active() || self.delete != DeletePhase::Idle {
            return Vec::new();
        }

        match classify(zone) {
            GestureStart::Action => {
                self.action_down = true;
                Vec::new()
            }
            GestureStart::Ignored => Vec::new(),
            GestureStart::Drag => {
                self.action_down = false;
                let z0 = self.raise();
                self.input = InputState::Dragging {
                    pointer_id: event.pointer_id,
                    anchor: DragAnchor {
                        x0: self.card.pose.x,
                        y0: self.card.pose.y,
                        mx0: event.point.x,
                        my0: event.point.y,
                    },
                    z0,
                };
                vec![Action::CapturePointer(event.pointer_id), self.change()]
            }
            GestureStart::Resize(corner) => {
                self.action_down = false;
                let z0 = self.raise();
                self.input = InputState::Resizing {
                    pointer_id: event.pointer_id,
                    anchor: ResizeAnchor {
                        corner,
                        mx0: event.point.x,
                        my0: event.point.y,
                        x0: self.card.pose.x,
                        y0: self.card.pose.y,
                        w0: self.card.pose.width,
                    },
                    z0,
                };
                vec![Action::CapturePointer(event.pointer_id), self.change()]
            }
        }
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Vec<Action> {
        if self.input.pointer_id() != Some(event.pointer_id) {
            return Vec::new();
        }

        match self.input {
            InputState::Idle => Vec::new(),
            InputState::Dragging { anchor, .. } => {
                let next = drag_to(&anchor, event.point);
                self.card.pose.x = next.x;
                self.card.pose.y = next.y;
                vec![self.change()]
            }
            InputState::Resizing { anchor, .. } => {
                let (x, width) = resize_to(&anchor, event.point);
                self.card.pose.x = x;
                self.card.pose.width = width;
                vec![self.change()]
            }
        }
    }

    pub fn on_pointer_up(&mut self, event: PointerEvent) -> Vec<Action> {
        if self.action_down {
            self.action_down = false;
            return Vec::new();
        }
        if self.input.pointer_id() != Some(event.pointer_id) {
            return Vec::new();
        }

        if let InputState::Dragging { z0, .. } | InputState::Resizing { z0, .. } = self.input {
            self.card.pose.z = z0;
        }
        self.input = InputState::Idle;
        vec![Action::ReleasePointer(event.pointer_id), Action::Commit { id: self.card.id, pose: self.card.pose }]
    }

    /// The platform took the pointer away. Commits exactly like a release.
    pub fn on_pointer_cancel(&mut self, event: PointerEvent) -> Vec<Action> {
        self.on_pointer_up(event)
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is_delete() {
            return self.request_delete();
        }
        Vec::new()
    }

    // --- Delete ---

    /// Start the delete flow (action click or delete key).
    ///
    /// Does nothing mid-gesture, when delete is hidden, or while an earlier
    /// request is still waiting for confirmation or completion.
    pub fn request_delete(&mut self) -> Vec<Action> {
        if !self.options.show_delete || self.input.is_active() || self.delete != DeletePhase::Idle {
            return Vec::new();
        }

        if self.options.confirm_delete {
            self.delete = DeletePhase::AwaitingConfirmation;
            return vec![Action::ConfirmDelete { id: self.card.id }];
        }

        self.begin_delete()
    }

    /// The user's answer to [`Action::ConfirmDelete`]. A decline changes nothing.
    pub fn confirm_delete(&mut self, accepted: bool) -> Vec<Action> {
        if self.delete != DeletePhase::AwaitingConfirmation {
            return Vec::new();
        }
        if !accepted {
            self.delete = DeletePhase::Idle;
            return Vec::new();
        }
        self.begin_delete()
    }

    /// The host finished an [`Action::Delete`], successfully or not.
    pub fn delete_settled(&mut self) {
        self.delete = DeletePhase::Idle;
    }

    fn begin_delete(&mut self) -> Vec<Action> {
        self.delete = DeletePhase::Deleting;
        vec![Action::Delete(self.card.clone())]
    }

    /// Lift the card above its siblings for a gesture; returns the resting z.
    fn raise(&mut self) -> i64 {
        let z0 = self.card.pose.z;
        self.card.pose.z = TOP_Z;
        z0
    }

    fn change(&self) -> Action {
        Action::Change { id: self.card.id, pose: self.card.pose }
    }
}
