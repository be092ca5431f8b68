//! Store contract for mementos and media, plus an in-memory implementation.
//!
//! DESIGN
//! ======
//! The wall host talks to durable storage only through [`MementoStore`]. The
//! trait covers exactly what the wall needs: list a wall, insert a row, write
//! a layout, delete a row, and put/get media blobs by key. `MemoryStore`
//! backs tests and local runs; each operation can be switched to fail so the
//! host's rollback paths can be exercised.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cards::card::CardKind;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::state::{Layout, Memento};

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("memento not found: {0}")]
    NotFound(Uuid),
    #[error("write rejected: {0}")]
    Rejected(String),
    #[error("upload failed for {path}: {reason}")]
    Upload { path: String, reason: String },
    #[error("blob not found: {0}")]
    BlobNotFound(String),
}

/// Row to insert; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMemento {
    pub wall_id: Uuid,
    pub user_id: Option<Uuid>,
    pub kind: CardKind,
    pub title: Option<String>,
    pub body: Option<String>,
    pub media_url: Option<String>,
    pub thumb_url: Option<String>,
    pub layout: Layout,
}

/// A stored media object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Durable storage for one user's mementos. Enables mocking in tests.
#[async_trait::async_trait]
pub trait MementoStore: Send + Sync {
    /// All mementos of a wall, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the listing cannot be read.
    async fn list_mementos(&self, wall_id: Uuid) -> Result<Vec<Memento>, StoreError>;

    /// Insert a memento and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] if the row is refused.
    async fn insert_memento(&self, new: NewMemento) -> Result<Memento, StoreError>;

    /// Overwrite a memento's `{x, y, z, rotation_deg, width}`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown ids.
    async fn update_layout(&self, id: Uuid, layout: Layout) -> Result<(), StoreError>;

    /// Delete a memento.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for unknown ids.
    async fn delete_memento(&self, id: Uuid) -> Result<(), StoreError>;

    /// Store a blob under `bucket/path` and return its public URL.
    /// Existing paths are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Upload`] if the path is taken or the write fails.
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StoreError>;

    /// Fetch a blob by bucket and path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BlobNotFound`] for unknown keys.
    async fn download(&self, bucket: &str, path: &str) -> Result<Blob, StoreError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Which store operation a failure switch applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Insert,
    Update,
    Delete,
    Upload,
}

/// In-memory [`MementoStore`].
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<Uuid, Memento>>,
    blobs: RwLock<HashMap<String, Blob>>,
    fail_insert: AtomicBool,
    fail_update: AtomicBool,
    fail_delete: AtomicBool,
    fail_upload: AtomicBool,
    layout_writes: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows as if they had been inserted earlier.
    pub async fn seed(&self, mementos: Vec<Memento>) {
        let mut rows = self.rows.write().await;
        for m in mementos {
            rows.insert(m.id, m);
        }
    }

    /// Make every call of `op` fail (or succeed again).
    pub fn set_failing(&self, op: StoreOp, failing: bool) {
        self.switch(op).store(failing, Ordering::SeqCst);
    }

    /// Current row for `id`, if any.
    pub async fn row(&self, id: Uuid) -> Option<Memento> {
        self.rows.read().await.get(&id).cloned()
    }

    /// Number of successful `update_layout` calls so far.
    #[must_use]
    pub fn layout_writes(&self) -> usize {
        self.layout_writes.load(Ordering::SeqCst)
    }

    fn switch(&self, op: StoreOp) -> &AtomicBool {
        match op {
            StoreOp::Insert => &self.fail_insert,
            StoreOp::Update => &self.fail_update,
            StoreOp::Delete => &self.fail_delete,
            StoreOp::Upload => &self.fail_upload,
        }
    }

    fn failing(&self, op: StoreOp) -> bool {
        self.switch(op).load(Ordering::SeqCst)
    }
}

/// Public URL the memory store hands out for a blob.
#[must_use]
pub fn memory_url(bucket: &str, path: &str) -> String {
    format!("memory://{bucket}/{path}")
}

fn blob_key(bucket: &str, path: &str) -> String {
    format!("{bucket}/{path}")
}

#[async_trait::async_trait]
impl MementoStore for MemoryStore {
    async fn list_mementos(&self, wall_id: Uuid) -> Result<Vec<Memento>, StoreError> {
        let rows = self.rows.read().await;
        let mut out: Vec<Memento> = rows.values().filter(|m| m.wall_id == wall_id).cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn insert_memento(&self, new: NewMemento) -> Result<Memento, StoreError> {
        if self.failing(StoreOp::Insert) {
            return Err(StoreError::Rejected("insert refused".into()));
        }
        let now = OffsetDateTime::now_utc();
        let memento = Memento {
            id: Uuid::new_v4(),
            wall_id: new.wall_id,
            kind: new.kind,
            title: new.title,
            body: new.body,
            media_url: new.media_url,
            thumb_url: new.thumb_url,
            x: new.layout.x,
            y: new.layout.y,
            z: Some(new.layout.z),
            rotation_deg: Some(new.layout.rotation_deg),
            width: Some(new.layout.width),
            created_at: now,
            updated_at: Some(now),
        };
        self.rows.write().await.insert(memento.id, memento.clone());
        Ok(memento)
    }

    async fn update_layout(&self, id: Uuid, layout: Layout) -> Result<(), StoreError> {
        if self.failing(StoreOp::Update) {
            return Err(StoreError::Rejected("update refused".into()));
        }
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        row.x = layout.x;
        row.y = layout.y;
        row.z = Some(layout.z);
        row.rotation_deg = Some(layout.rotation_deg);
        row.width = Some(layout.width);
        row.updated_at = Some(OffsetDateTime::now_utc());
        self.layout_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_memento(&self, id: Uuid) -> Result<(), StoreError> {
        if self.failing(StoreOp::Delete) {
            return Err(StoreError::Rejected("delete refused".into()));
        }
        self.rows.write().await.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }

    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StoreError> {
        if self.failing(StoreOp::Upload) {
            return Err(StoreError::Upload { path: path.to_string(), reason: "upload refused".into() });
        }
        let mut blobs = self.blobs.write().await;
        let key = blob_key(bucket, path);
        if blobs.contains_key(&key) {
            return Err(StoreError::Upload { path: path.to_string(), reason: "path already exists".into() });
        }
        blobs.insert(key, Blob { bytes, content_type: content_type.to_string() });
        Ok(memory_url(bucket, path))
    }

    async fn download(&self, bucket: &str, path: &str) -> Result<Blob, StoreError> {
        self.blobs
            .read()
            .await
            .get(&blob_key(bucket, path))
            .cloned()
            .ok_or_else(|| StoreError::BlobNotFound(blob_key(bucket, path)))
    }
}
