//! Persistence service — debounced flush of committed layouts.
//!
//! DESIGN
//! ======
//! Releasing a card only marks its layout dirty. A background task wakes
//! every `flush_interval_ms`, drains the dirty layouts of confirmed mementos,
//! releases the lock, then writes each one. A failed write goes back into the
//! dirty set for the next tick unless a newer commit already replaced it or
//! the memento no longer exists in the store.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::services::wall::WallHost;
use crate::store::StoreError;

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

/// Spawn the background persistence task. Returns a handle for shutdown.
pub fn spawn_persistence_task(host: WallHost) -> JoinHandle<()> {
    let period = Duration::from_millis(host.config().flush_interval_ms);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            flush_dirty(&host).await;
        }
    })
}

/// Write every pending layout once. Returns how many writes succeeded.
pub async fn flush_dirty(host: &WallHost) -> usize {
    // Collect under the lock, then release before touching the store.
    let pending = host.state().write().await.drain_dirty();
    if pending.is_empty() {
        return 0;
    }

    let mut written = 0;
    let mut retry = Vec::new();
    for (id, layout) in pending {
        match host.store().update_layout(id, layout).await {
            Ok(()) => written += 1,
            Err(StoreError::NotFound(_)) => {
                warn!(memento_id = %id, "layout dropped; memento no longer stored");
            }
            Err(e) => {
                error!(memento_id = %id, error = %e, "layout write failed");
                retry.push((id, layout));
            }
        }
    }

    if !retry.is_empty() {
        let mut state = host.state().write().await;
        for (id, layout) in retry {
            state.requeue(id, layout);
        }
    }

    debug!(written, wall_id = %host.wall_id(), "layouts flushed");
    written
}
