pub mod snapshot;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::core::config::Settings;
use crate::error::StoreError;

pub use snapshot::Snapshot;

/// In-memory dataset behind the JSON backend. Loaded once from a serialized
/// snapshot; writes are coalesced into a single debounced flush rather than
/// persisted synchronously. Explicitly a non-durable development store.
#[derive(Clone)]
pub struct EntityStore {
    inner: Arc<InnerStore>,
}

struct InnerStore {
    snapshot_path: Option<PathBuf>,
    flush_debounce: Duration,
    state: Mutex<StoreState>,
    flush_task: Mutex<Option<JoinHandle<()>>>,
}

struct StoreState {
    data: Snapshot,
    initialized: bool,
}

impl EntityStore {
    /// A store with no snapshot file; starts empty and never flushes.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(InnerStore {
                snapshot_path: None,
                flush_debounce: Duration::from_millis(0),
                state: Mutex::new(StoreState { data: Snapshot::default(), initialized: true }),
                flush_task: Mutex::new(None),
            }),
        }
    }

    pub fn with_snapshot(path: impl Into<PathBuf>, flush_debounce: Duration) -> Self {
        Self {
            inner: Arc::new(InnerStore {
                snapshot_path: Some(path.into()),
                flush_debounce,
                state: Mutex::new(StoreState { data: Snapshot::default(), initialized: false }),
                flush_task: Mutex::new(None),
            }),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        match &settings.json_store().snapshot_path {
            Some(path) => Self::with_snapshot(
                path.clone(),
                Duration::from_millis(settings.json_store().flush_debounce_ms),
            ),
            None => Self::in_memory(),
        }
    }

    /// Load the snapshot. Idempotent: the file is read at most once per store
    /// lifetime. A missing file starts an empty dataset; an unparseable file
    /// leaves the store uninitialized so the caller may retry explicitly.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        if self.state(|state| state.initialized) {
            return Ok(());
        }

        let Some(path) = self.inner.snapshot_path.clone() else {
            self.state_mut(|state| state.initialized = true);
            return Ok(());
        };

        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes).map_err(|err| {
                tracing::error!(error = %err, path = %path.display(), "Snapshot parse failed");
                StoreError::Unavailable("snapshot parse failed".to_string())
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(err) => {
                tracing::error!(error = %err, path = %path.display(), "Snapshot read failed");
                return Err(StoreError::Unavailable("snapshot read failed".to_string()));
            }
        };

        self.state_mut(|state| {
            if !state.initialized {
                state.data = data;
                state.initialized = true;
            }
        });

        Ok(())
    }

    /// Pure read over the in-memory collections. Never fails; an
    /// uninitialized store reads as empty.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        self.state(|state| f(&state.data))
    }

    /// Mutate the dataset under the lock, then reset the flush timer. A single
    /// closure invocation is the store's unit of atomicity.
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Snapshot) -> R) -> R {
        let result = self.state_mut(|state| f(&mut state.data));
        self.schedule_flush();
        result
    }

    /// Write the current state out immediately, cancelling any pending timer.
    /// Intended as a shutdown hook; the debounced path covers normal writes.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = self.inner.snapshot_path.clone() else {
            return Ok(());
        };

        if let Some(task) = self.inner.flush_task.lock().expect("flush task lock").take() {
            task.abort();
        }

        let data = self.state(|state| state.data.clone());
        write_snapshot(&path, &data).await
    }

    fn schedule_flush(&self) {
        let Some(path) = self.inner.snapshot_path.clone() else {
            return;
        };

        let mut slot = self.inner.flush_task.lock().expect("flush task lock");
        // Only one timer is ever live; each write replaces it, so overlapping
        // stale flushes cannot happen and only the latest state hits disk.
        if let Some(task) = slot.take() {
            task.abort();
        }

        let store = self.clone();
        let debounce = self.inner.flush_debounce;
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let data = store.state(|state| state.data.clone());
            if let Err(err) = write_snapshot(&path, &data).await {
                tracing::warn!(error = %err, "Debounced snapshot flush failed");
            }
        }));
    }

    fn state<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        let state = self.inner.state.lock().expect("store lock");
        f(&state)
    }

    fn state_mut<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let mut state = self.inner.state.lock().expect("store lock");
        f(&mut state)
    }
}

async fn write_snapshot(path: &PathBuf, data: &Snapshot) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(data)
        .map_err(|err| StoreError::Unavailable(format!("snapshot serialize failed: {err}")))?;
    tokio::fs::write(path, bytes)
        .await
        .map_err(|err| StoreError::Unavailable(format!("snapshot write failed: {err}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use crate::db::models::Class;
    use crate::store::snapshot::upsert_by_id;
    use uuid::Uuid;

    fn temp_snapshot_path() -> PathBuf {
        std::env::temp_dir().join(format!("careclass-store-{}.json", Uuid::new_v4()))
    }

    fn class(id: &str, title: &str) -> Class {
        let now = primitive_now_utc();
        Class {
            id: id.to_string(),
            title: title.to_string(),
            subject: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn initialize_is_idempotent_and_missing_file_starts_empty() {
        let store = EntityStore::with_snapshot(temp_snapshot_path(), Duration::from_millis(50));
        store.initialize().await.expect("first initialize");
        store.initialize().await.expect("second initialize");
        assert_eq!(store.read(|data| data.classes.len()), 0);
    }

    #[tokio::test]
    async fn corrupt_snapshot_fails_and_leaves_store_retryable() {
        let path = temp_snapshot_path();
        tokio::fs::write(&path, b"{not json").await.expect("write corrupt file");

        let store = EntityStore::with_snapshot(&path, Duration::from_millis(50));
        let err = store.initialize().await.expect_err("corrupt snapshot must fail");
        assert!(matches!(err, StoreError::Unavailable(_)));

        // Uninitialized reads are empty, not errors.
        assert_eq!(store.read(|data| data.users.len()), 0);

        // Retry succeeds once the file is repaired.
        tokio::fs::write(&path, b"{}").await.expect("repair file");
        store.initialize().await.expect("retry after repair");
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn upsert_replaces_in_place_preserving_position() {
        let store = EntityStore::in_memory();
        store.write(|data| {
            upsert_by_id(&mut data.classes, class("a", "first"));
            upsert_by_id(&mut data.classes, class("b", "second"));
            upsert_by_id(&mut data.classes, class("a", "renamed"));
        });

        let titles = store.read(|data| {
            data.classes.iter().map(|item| item.title.clone()).collect::<Vec<_>>()
        });
        assert_eq!(titles, vec!["renamed".to_string(), "second".to_string()]);
    }

    async fn wait_for_snapshot(path: &PathBuf) -> Snapshot {
        // The flush task finishes its file write off the timer wheel, so poll
        // briefly instead of sleeping a fixed wall-clock amount.
        for _ in 0..200 {
            if let Ok(bytes) = tokio::fs::read(path).await {
                if let Ok(parsed) = serde_json::from_slice(&bytes) {
                    return parsed;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("snapshot was never flushed");
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_flush_coalesces_rapid_writes() {
        let path = temp_snapshot_path();
        let store = EntityStore::with_snapshot(&path, Duration::from_millis(400));
        store.initialize().await.expect("initialize");

        store.write(|data| upsert_by_id(&mut data.classes, class("a", "one")));
        store.write(|data| upsert_by_id(&mut data.classes, class("a", "two")));
        store.write(|data| upsert_by_id(&mut data.classes, class("a", "three")));

        // Inside the quiet period nothing has been flushed yet.
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!path.exists());

        tokio::time::advance(Duration::from_millis(400)).await;
        let parsed = wait_for_snapshot(&path).await;
        assert_eq!(parsed.classes.len(), 1);
        assert_eq!(parsed.classes[0].title, "three");
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn explicit_flush_writes_immediately() {
        let path = temp_snapshot_path();
        let store = EntityStore::with_snapshot(&path, Duration::from_secs(60));
        store.initialize().await.expect("initialize");

        store.write(|data| upsert_by_id(&mut data.classes, class("a", "one")));
        store.flush().await.expect("flush");

        let bytes = tokio::fs::read(&path).await.expect("snapshot present");
        let parsed: Snapshot = serde_json::from_slice(&bytes).expect("parse snapshot");
        assert_eq!(parsed.classes[0].title, "one");
        let _ = tokio::fs::remove_file(&path).await;
    }
}
