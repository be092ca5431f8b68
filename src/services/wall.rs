//! Wall service — hosts the card controllers of one open wall.
//!
//! DESIGN
//! ======
//! `WallHost` owns the live `WallState` and the store handle. Pointer and
//! key events are routed to a card's controller; the returned actions are
//! applied here. `Change` mirrors the live pose into the visible memento,
//! `Commit` also queues the layout for the persistence task, and delete
//! requests run through confirmation and an optimistic store delete that is
//! rolled back on failure. Pointer capture actions are handed back to the
//! caller, which owns the DOM.
//!
//! The state lock is never held across a store call or a confirmation
//! prompt: each step takes the lock, mutates, and releases before awaiting.

use std::sync::Arc;

use cards::card::{Action, Card, CardController, CardKind};
use cards::consts::DEFAULT_W;
use cards::geometry::{Pose, clamp_top};
use cards::hit::HitZone;
use cards::input::{Key, PointerEvent};
use rand::Rng;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::WallConfig;
use crate::services::media::{self, MediaSlot};
use crate::state::{Layout, Lifecycle, Memento, WallState};
use crate::store::{MementoStore, NewMemento, StoreError};

#[cfg(test)]
#[path = "wall_test.rs"]
mod wall_test;

/// Where new mementos land.
pub const CREATE_X: f64 = 140.0;
pub const CREATE_Y: f64 = 140.0;
/// New mementos get a rotation in `[-MAX_CREATE_TILT_DEG, MAX_CREATE_TILT_DEG)`.
pub const MAX_CREATE_TILT_DEG: f64 = 3.0;

pub const DELETE_PROMPT: &str = "Delete this Memento? This cannot be undone.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WallError {
    #[error("card not found: {0}")]
    CardNotFound(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Asks the user a yes/no question before a destructive step.
#[async_trait::async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt the same way. For headless hosts and tests.
pub struct AutoConfirm(pub bool);

#[async_trait::async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// How a delete request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Nothing started: delete hidden, gesture active, already deleting,
    /// an insert or delete still pending, or not a delete key.
    Ignored,
    /// The user declined the confirmation.
    Declined,
    /// The store deleted the memento.
    Deleted,
    /// The store refused; the memento is back in place.
    RolledBack,
}

/// One file attached to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub bytes: Vec<u8>,
    /// May be empty; the slot's default is used then.
    pub content_type: String,
    /// Local URL to show while the upload runs.
    pub preview_url: Option<String>,
}

/// What the creation dialog hands over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MementoDraft {
    pub kind: CardKind,
    pub title: Option<String>,
    pub text: Option<String>,
    pub photo: Option<Upload>,
    pub video: Option<Upload>,
    pub poster: Option<Upload>,
}

impl MementoDraft {
    #[must_use]
    pub fn text(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: CardKind::Text,
            title: Some(title.into()),
            text: Some(text.into()),
            photo: None,
            video: None,
            poster: None,
        }
    }
}

// =============================================================================
// HOST
// =============================================================================

/// Host of one open wall. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct WallHost {
    wall_id: Uuid,
    user_id: Option<Uuid>,
    config: Arc<WallConfig>,
    state: Arc<RwLock<WallState>>,
    store: Arc<dyn MementoStore>,
    confirm: Arc<dyn Confirm>,
}

impl WallHost {
    /// Load a wall's mementos and build one controller per memento.
    ///
    /// # Errors
    ///
    /// Returns [`WallError::Store`] if the listing fails.
    pub async fn open(
        wall_id: Uuid,
        user_id: Option<Uuid>,
        config: WallConfig,
        store: Arc<dyn MementoStore>,
        confirm: Arc<dyn Confirm>,
    ) -> Result<Self, WallError> {
        let mementos = store.list_mementos(wall_id).await?;
        info!(%wall_id, count = mementos.len(), "wall opened");

        let mut state = WallState::new(config.card_options());
        state.load(mementos);

        Ok(Self {
            wall_id,
            user_id,
            config: Arc::new(config),
            state: Arc::new(RwLock::new(state)),
            store,
            confirm,
        })
    }

    #[must_use]
    pub fn wall_id(&self) -> Uuid {
        self.wall_id
    }

    #[must_use]
    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    pub(crate) fn state(&self) -> &Arc<RwLock<WallState>> {
        &self.state
    }

    pub(crate) fn store(&self) -> &Arc<dyn MementoStore> {
        &self.store
    }

    // --- Queries ---

    /// The visible mementos in display order.
    pub async fn mementos(&self) -> Vec<Memento> {
        self.state.read().await.mementos.clone()
    }

    pub async fn memento(&self, id: Uuid) -> Option<Memento> {
        self.state.read().await.get(&id).cloned()
    }

    pub async fn lifecycle(&self, id: Uuid) -> Option<Lifecycle> {
        self.state.read().await.lifecycle.get(&id).copied()
    }

    pub async fn is_deleting(&self, id: Uuid) -> bool {
        self.state.read().await.cards.get(&id).is_some_and(CardController::is_deleting)
    }

    /// Pose to draw for a visible card, with the safe-top policy applied.
    pub async fn render_pose(&self, id: Uuid) -> Option<Pose> {
        let state = self.state.read().await;
        state.get(&id)?;
        let pose = state.cards.get(&id)?.pose();
        Some(match self.config.safe_top {
            Some(top) => clamp_top(pose, top),
            None => pose,
        })
    }

    // --- Pointer and keyboard ---

    /// Route a pointer-down. Returns the pointer capture actions.
    ///
    /// # Errors
    ///
    /// Returns [`WallError::CardNotFound`] for unknown cards.
    pub async fn pointer_down(&self, id: Uuid, zone: HitZone, event: PointerEvent) -> Result<Vec<Action>, WallError> {
        self.route(id, |card| card.on_pointer_down(zone, event)).await
    }

    /// # Errors
    ///
    /// Returns [`WallError::CardNotFound`] for unknown cards.
    pub async fn pointer_move(&self, id: Uuid, event: PointerEvent) -> Result<Vec<Action>, WallError> {
        self.route(id, |card| card.on_pointer_move(event)).await
    }

    /// # Errors
    ///
    /// Returns [`WallError::CardNotFound`] for unknown cards.
    pub async fn pointer_up(&self, id: Uuid, event: PointerEvent) -> Result<Vec<Action>, WallError> {
        self.route(id, |card| card.on_pointer_up(event)).await
    }

    /// # Errors
    ///
    /// Returns [`WallError::CardNotFound`] for unknown cards.
    pub async fn pointer_cancel(&self, id: Uuid, event: PointerEvent) -> Result<Vec<Action>, WallError> {
        self.route(id, |card| card.on_pointer_cancel(event)).await
    }

    /// Key press on a focused card. Delete and Backspace start the delete flow.
    ///
    /// # Errors
    ///
    /// Returns [`WallError::CardNotFound`] for unknown cards.
    pub async fn key_down(&self, id: Uuid, key: &Key) -> Result<DeleteOutcome, WallError> {
        let actions = self.begin_delete(id, |card| card.on_key_down(key)).await?;
        self.drive_delete(id, actions).await
    }

    /// Delete button clicked.
    ///
    /// # Errors
    ///
    /// Returns [`WallError::CardNotFound`] for unknown cards.
    pub async fn request_delete(&self, id: Uuid) -> Result<DeleteOutcome, WallError> {
        let actions = self.begin_delete(id, CardController::request_delete).await?;
        self.drive_delete(id, actions).await
    }

    async fn route<F>(&self, id: Uuid, handle: F) -> Result<Vec<Action>, WallError>
    where
        F: FnOnce(&mut CardController) -> Vec<Action>,
    {
        let mut state = self.state.write().await;
        let card = state.cards.get_mut(&id).ok_or(WallError::CardNotFound(id))?;
        let actions = handle(card);
        Ok(apply_actions(&mut state, actions))
    }

    async fn begin_delete<F>(&self, id: Uuid, handle: F) -> Result<Vec<Action>, WallError>
    where
        F: FnOnce(&mut CardController) -> Vec<Action>,
    {
        let mut state = self.state.write().await;
        if state.lifecycle.get(&id) == Some(&Lifecycle::Pending) {
            debug!(memento_id = %id, "delete ignored; store write still pending");
            return Ok(Vec::new());
        }
        let card = state.cards.get_mut(&id).ok_or(WallError::CardNotFound(id))?;
        Ok(handle(card))
    }

    async fn drive_delete(&self, id: Uuid, mut actions: Vec<Action>) -> Result<DeleteOutcome, WallError> {
        loop {
            let next = actions
                .into_iter()
                .find(|action| matches!(action, Action::ConfirmDelete { .. } | Action::Delete(_)));
            match next {
                Some(Action::ConfirmDelete { .. }) => {
                    let accepted = self.confirm.confirm(DELETE_PROMPT).await;
                    let mut state = self.state.write().await;
                    let Some(card) = state.cards.get_mut(&id) else {
                        return Ok(DeleteOutcome::Ignored);
                    };
                    actions = card.confirm_delete(accepted);
                    if !accepted {
                        debug!(memento_id = %id, "delete declined");
                        return Ok(DeleteOutcome::Declined);
                    }
                }
                Some(Action::Delete(card)) => return Ok(self.delete_card(card).await),
                _ => return Ok(DeleteOutcome::Ignored),
            }
        }
    }

    async fn delete_card(&self, card: Card) -> DeleteOutcome {
        let id = card.id;
        let removed = {
            let mut state = self.state.write().await;
            let removed = state.remove_visible(&id);
            if removed.is_some() {
                state.lifecycle.insert(id, Lifecycle::Pending);
            }
            removed
        };
        let Some(removed) = removed else {
            self.settle(id).await;
            return DeleteOutcome::Ignored;
        };

        match self.store.delete_memento(id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.forget(&id);
                state.lifecycle.remove(&id);
                info!(memento_id = %id, "memento deleted");
                DeleteOutcome::Deleted
            }
            Err(e) => {
                error!(memento_id = %id, error = %e, "delete failed; restoring memento");
                let mut state = self.state.write().await;
                state.restore(removed);
                state.lifecycle.insert(id, Lifecycle::Confirmed);
                if let Some(card) = state.cards.get_mut(&id) {
                    card.delete_settled();
                }
                DeleteOutcome::RolledBack
            }
        }
    }

    async fn settle(&self, id: Uuid) {
        if let Some(card) = self.state.write().await.cards.get_mut(&id) {
            card.delete_settled();
        }
    }

    // --- Create ---

    /// Show a draft immediately, upload its media, insert it, and swap the
    /// optimistic entry for the stored row. On failure the entry is removed.
    ///
    /// # Errors
    ///
    /// Returns [`WallError::Store`] if an upload or the insert fails.
    pub async fn create_memento(&self, draft: MementoDraft) -> Result<Memento, WallError> {
        let temp_id = Uuid::new_v4();
        let rotation_deg = rand::rng().random_range(-MAX_CREATE_TILT_DEG..MAX_CREATE_TILT_DEG);
        let now = OffsetDateTime::now_utc();

        let layout = {
            let mut state = self.state.write().await;
            let optimistic = Memento {
                id: temp_id,
                wall_id: self.wall_id,
                kind: draft.kind,
                title: draft.title.clone(),
                body: draft.text.clone(),
                media_url: match draft.kind {
                    CardKind::Photo => draft.photo.as_ref().and_then(|p| p.preview_url.clone()),
                    CardKind::Text | CardKind::Video => None,
                },
                thumb_url: match draft.kind {
                    CardKind::Video => draft.poster.as_ref().and_then(|p| p.preview_url.clone()),
                    CardKind::Text | CardKind::Photo => None,
                },
                x: CREATE_X,
                y: CREATE_Y,
                z: Some(state.top_z()),
                rotation_deg: Some(rotation_deg),
                width: Some(DEFAULT_W),
                created_at: now,
                updated_at: Some(now),
            };
            let layout = Layout::from(optimistic.pose());
            state.push_front(optimistic, Lifecycle::Pending);
            layout
        };
        debug!(%temp_id, kind = ?draft.kind, "optimistic memento shown");

        match self.persist_draft(temp_id, draft, layout).await {
            Ok(stored) => {
                let mut state = self.state.write().await;
                state.replace(&temp_id, stored.clone());
                info!(%temp_id, memento_id = %stored.id, "memento created");
                Ok(state.get(&stored.id).cloned().unwrap_or(stored))
            }
            Err(e) => {
                error!(%temp_id, error = %e, "upload/insert failed; rolling back memento");
                let mut state = self.state.write().await;
                state.mark_rolled_back(temp_id);
                Err(e)
            }
        }
    }

    async fn persist_draft(&self, temp_id: Uuid, draft: MementoDraft, layout: Layout) -> Result<Memento, WallError> {
        let MementoDraft { kind, title, text, photo, video, poster } = draft;
        let millis = media::now_millis();
        let mut media_url = None;
        let mut thumb_url = None;

        match kind {
            CardKind::Photo => {
                if let Some(photo) = photo {
                    media_url = Some(self.upload(temp_id, millis, MediaSlot::Photo, photo).await?);
                }
            }
            CardKind::Video => {
                if let Some(video) = video {
                    media_url = Some(self.upload(temp_id, millis, MediaSlot::Video, video).await?);
                }
                if let Some(poster) = poster {
                    thumb_url = Some(self.upload(temp_id, millis, MediaSlot::Poster, poster).await?);
                }
            }
            CardKind::Text => {}
        }

        let new = NewMemento {
            wall_id: self.wall_id,
            user_id: self.user_id,
            kind,
            title,
            body: text,
            media_url,
            thumb_url,
            layout,
        };
        Ok(self.store.insert_memento(new).await?)
    }

    async fn upload(&self, temp_id: Uuid, millis: i128, slot: MediaSlot, upload: Upload) -> Result<String, StoreError> {
        let path = media::upload_path(self.user_id, self.wall_id, temp_id, millis, slot, &upload.content_type);
        let content_type = slot.content_type(&upload.content_type);
        debug!(%path, %content_type, bytes = upload.bytes.len(), "uploading media");
        self.store.upload(&self.config.media_bucket, &path, upload.bytes, &content_type).await
    }
}

/// Apply `Change` and `Commit` to the wall; hand everything else back.
fn apply_actions(state: &mut WallState, actions: Vec<Action>) -> Vec<Action> {
    let mut passthrough = Vec::new();
    for action in actions {
        match action {
            Action::Change { id, pose } => {
                state.show_pose(&id, pose);
            }
            Action::Commit { id, pose } => {
                if !state.commit_pose(&id, pose) {
                    warn!(memento_id = %id, "commit for a memento that is not shown");
                }
            }
            other => passthrough.push(other),
        }
    }
    passthrough
}

// =============================================================================
// TEST HELPERS
// =============================================================================
