//! Dual-tier progress persistence.
//!
//! [`ProgressStore`] pairs the synchronous local tier with an optional
//! remote record store. The local tier is authoritative for the device's
//! immediate reads; the remote tier is consulted only while a session is
//! present, wins on load, and receives best-effort fire-and-forget pushes
//! on save. No remote failure ever reaches the caller.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use ringside_common::completion::CompletionMap;

use crate::remote::{
    Identity, ProgressRecord, RecordFilter, RecordStore, RemoteError, RemoteResult, PROGRESS_TABLE,
};
use crate::session::SessionHandle;
use crate::store::{LocalStore, StoreResult};

/// Seconds since the Unix epoch, for `updated_at` stamps.
fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Per-category completion-map persistence across both tiers.
pub struct ProgressStore {
    /// Always-available synchronous tier.
    local: LocalStore,
    /// Best-effort remote tier, used only while a session is present.
    remote: Option<Arc<dyn RecordStore>>,
    /// Shared view of the process-wide session.
    session: SessionHandle,
    /// Last map seen per category. Display convenience and sign-out
    /// teardown target; never preferred over the local tier on load.
    cache: DashMap<String, CompletionMap>,
}

impl ProgressStore {
    /// Create a store over the local tier only.
    #[must_use]
    pub fn new(local: LocalStore, session: SessionHandle) -> Self {
        Self {
            local,
            remote: None,
            session,
            cache: DashMap::new(),
        }
    }

    /// Attach a remote record store.
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RecordStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// The local tier.
    #[must_use]
    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// Load a category's completion map.
    ///
    /// With a session present the remote row wins: on a successful fetch the
    /// local tier is overwritten and the remote map returned. Any remote
    /// failure (unreachable, missing row, malformed row) falls back silently
    /// to the local tier, and a missing or unreadable local document yields
    /// an empty map. This never returns an error.
    pub async fn load(&self, category: &str) -> CompletionMap {
        if let (Some(identity), Some(remote)) = (self.session.identity(), self.remote.as_ref()) {
            match Self::fetch_remote(remote.as_ref(), &identity, category).await {
                Ok(map) => {
                    if let Err(e) = self.local.write_progress(category, &map) {
                        warn!("failed to mirror remote progress for {category} locally: {e}");
                    }
                    debug!("loaded {category} progress from remote");
                    self.cache.insert(category.to_string(), map.clone());
                    return map;
                },
                Err(e) => {
                    debug!("remote load for {category} failed ({e}), using local tier");
                },
            }
        }

        let map = match self.local.read_progress(category) {
            Ok(map) => map,
            Err(crate::store::StoreError::NotFound(_)) => CompletionMap::new(),
            Err(e) => {
                warn!("local progress read for {category} failed: {e}");
                CompletionMap::new()
            },
        };
        self.cache.insert(category.to_string(), map.clone());
        map
    }

    /// Save a category's completion map.
    ///
    /// The local write is synchronous and unconditional; its failure is the
    /// only error surfaced. With a session present, a remote upsert is then
    /// spawned fire-and-forget: push failures are logged and ignored, and
    /// outside a Tokio runtime the push is skipped with a warning.
    pub fn save(&self, category: &str, map: &CompletionMap) -> StoreResult<()> {
        self.local.write_progress(category, map)?;
        self.cache.insert(category.to_string(), map.clone());

        if let (Some(identity), Some(remote)) = (self.session.identity(), self.remote.as_ref()) {
            let record = Self::record(identity, category, map);
            let remote = Arc::clone(remote);
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        if let Err(e) = Self::upsert_record(remote.as_ref(), &record).await {
                            warn!(
                                "remote progress push for {} failed: {e}",
                                record.category
                            );
                        }
                    });
                },
                Err(_) => {
                    warn!("no async runtime available, skipping remote push for {category}");
                },
            }
        }

        Ok(())
    }

    /// Push a category's map to the remote tier and wait for the result.
    ///
    /// `save` uses the spawned equivalent; this awaited form exists for
    /// explicit flushes and tests. Fails with [`RemoteError::Unavailable`]
    /// when no session or remote store is configured.
    pub async fn push_remote(&self, category: &str, map: &CompletionMap) -> RemoteResult<()> {
        let (Some(identity), Some(remote)) = (self.session.identity(), self.remote.as_ref())
        else {
            return Err(RemoteError::Unavailable);
        };
        let record = Self::record(identity, category, map);
        Self::upsert_record(remote.as_ref(), &record).await
    }

    /// Pull a category from the remote tier into the local tier, the
    /// login-reconciliation primitive. Returns true when a remote row won.
    pub async fn reconcile(&self, category: &str) -> bool {
        let (Some(identity), Some(remote)) = (self.session.identity(), self.remote.as_ref())
        else {
            return false;
        };
        match Self::fetch_remote(remote.as_ref(), &identity, category).await {
            Ok(map) => {
                if let Err(e) = self.local.write_progress(category, &map) {
                    warn!("failed to mirror remote progress for {category} locally: {e}");
                }
                self.cache.insert(category.to_string(), map);
                info!("reconciled {category} progress from remote");
                true
            },
            Err(RemoteError::NotFound) => {
                debug!("no remote progress row for {category}");
                false
            },
            Err(e) => {
                warn!("reconciliation pull for {category} failed: {e}");
                false
            },
        }
    }

    /// Last map seen for a category, if any.
    #[must_use]
    pub fn cached(&self, category: &str) -> Option<CompletionMap> {
        self.cache.get(category).map(|entry| entry.clone())
    }

    /// Drop every cached map. Called on sign-out; the local tier is left
    /// untouched.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn record(identity: Identity, category: &str, map: &CompletionMap) -> ProgressRecord {
        ProgressRecord {
            identity,
            category: category.to_string(),
            data: map.clone(),
            updated_at: epoch_seconds(),
        }
    }

    async fn fetch_remote(
        remote: &dyn RecordStore,
        identity: &Identity,
        category: &str,
    ) -> RemoteResult<CompletionMap> {
        let filter = RecordFilter::progress(identity, category);
        let row = remote
            .select(PROGRESS_TABLE, &filter)
            .await?
            .ok_or(RemoteError::NotFound)?;
        let record: ProgressRecord = serde_json::from_value(row)
            .map_err(|e| RemoteError::InvalidData(e.to_string()))?;
        Ok(record.data)
    }

    async fn upsert_record(remote: &dyn RecordStore, record: &ProgressRecord) -> RemoteResult<()> {
        let row = serde_json::to_value(record)
            .map_err(|e| RemoteError::InvalidData(e.to_string()))?;
        remote.upsert(PROGRESS_TABLE, row).await
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("local", &self.local)
            .field("has_remote", &self.remote.is_some())
            .field("cached_categories", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryRecordStore;
    use crate::session::Session;
    use async_trait::async_trait;
    use serde_json::Value;
    use tempfile::TempDir;

    /// Remote store whose every call fails, for degradation tests.
    struct FailingRecordStore;

    #[async_trait]
    impl RecordStore for FailingRecordStore {
        fn name(&self) -> &str {
            "Failing Record Store"
        }

        async fn upsert(&self, _table: &str, _record: Value) -> RemoteResult<()> {
            Err(RemoteError::Network("connection refused".to_string()))
        }

        async fn select(
            &self,
            _table: &str,
            _filter: &RecordFilter,
        ) -> RemoteResult<Option<Value>> {
            Err(RemoteError::Network("connection refused".to_string()))
        }

        async fn select_all(
            &self,
            _table: &str,
            _filter: &RecordFilter,
        ) -> RemoteResult<Vec<Value>> {
            Err(RemoteError::Network("connection refused".to_string()))
        }

        async fn delete(&self, _table: &str, _filter: &RecordFilter) -> RemoteResult<()> {
            Err(RemoteError::Network("connection refused".to_string()))
        }
    }

    fn signed_in_handle(user: &str) -> SessionHandle {
        let handle = SessionHandle::new();
        handle.set(Some(Session::new(Identity::new(user), format!("{user}@example.com"))));
        handle
    }

    fn map_of(pairs: &[(&str, bool)]) -> CompletionMap {
        pairs.iter().map(|&(id, done)| (id, done)).collect()
    }

    async fn seed_remote(remote: &MemoryRecordStore, user: &str, category: &str, map: CompletionMap) {
        let record = ProgressRecord {
            identity: Identity::new(user),
            category: category.to_string(),
            data: map,
            updated_at: 1,
        };
        remote
            .upsert(PROGRESS_TABLE, serde_json::to_value(&record).expect("row"))
            .await
            .expect("seed");
    }

    #[tokio::test]
    async fn test_save_then_load_without_session_round_trips() {
        let dir = TempDir::new().expect("temp dir");
        let store = ProgressStore::new(LocalStore::new(dir.path()), SessionHandle::new());

        let map = map_of(&[("ach-1", true), ("ach-2", false)]);
        store.save("achievements", &map).expect("save");

        let loaded = store.load("achievements").await;
        assert_eq!(loaded, map);
    }

    #[tokio::test]
    async fn test_load_unknown_category_is_empty() {
        let dir = TempDir::new().expect("temp dir");
        let store = ProgressStore::new(LocalStore::new(dir.path()), SessionHandle::new());
        assert!(store.load("showcase").await.is_empty());
    }

    #[tokio::test]
    async fn test_load_with_session_prefers_remote_and_overwrites_local() {
        let dir = TempDir::new().expect("temp dir");
        let local = LocalStore::new(dir.path());
        let remote = Arc::new(MemoryRecordStore::new());
        seed_remote(&remote, "u1", "myrise", map_of(&[("c1-a", true)])).await;

        let store = ProgressStore::new(local.clone(), signed_in_handle("u1"))
            .with_remote(remote);

        // Stale local state loses to the remote row.
        local
            .write_progress("myrise", &map_of(&[("c1-stale", true)]))
            .expect("seed local");

        let loaded = store.load("myrise").await;
        assert!(loaded.is_complete("c1-a"));
        assert!(!loaded.is_complete("c1-stale"));

        let mirrored = local.read_progress("myrise").expect("local mirror");
        assert_eq!(mirrored, loaded);
    }

    #[tokio::test]
    async fn test_load_ignores_remote_without_session() {
        let dir = TempDir::new().expect("temp dir");
        let local = LocalStore::new(dir.path());
        let remote = Arc::new(MemoryRecordStore::new());
        seed_remote(&remote, "u1", "myrise", map_of(&[("remote-only", true)])).await;

        local
            .write_progress("myrise", &map_of(&[("local-only", true)]))
            .expect("seed local");

        let store = ProgressStore::new(local, SessionHandle::new()).with_remote(remote);
        let loaded = store.load("myrise").await;
        assert!(loaded.is_complete("local-only"));
        assert!(!loaded.is_complete("remote-only"));
    }

    #[tokio::test]
    async fn test_load_falls_back_when_remote_unreachable() {
        let dir = TempDir::new().expect("temp dir");
        let local = LocalStore::new(dir.path());
        local
            .write_progress("mygm", &map_of(&[("gm-p1-1", true)]))
            .expect("seed local");

        let store = ProgressStore::new(local, signed_in_handle("u1"))
            .with_remote(Arc::new(FailingRecordStore));

        let loaded = store.load("mygm").await;
        assert!(loaded.is_complete("gm-p1-1"));
    }

    #[tokio::test]
    async fn test_load_falls_back_on_malformed_remote_row() {
        let dir = TempDir::new().expect("temp dir");
        let local = LocalStore::new(dir.path());
        local
            .write_progress("myrise", &map_of(&[("c1-a", true)]))
            .expect("seed local");

        let remote = Arc::new(MemoryRecordStore::new());
        remote
            .upsert(
                PROGRESS_TABLE,
                serde_json::json!({"identity": "u1", "category": "myrise", "data": 42}),
            )
            .await
            .expect("seed garbage");

        let store = ProgressStore::new(local, signed_in_handle("u1")).with_remote(remote);
        let loaded = store.load("myrise").await;
        assert!(loaded.is_complete("c1-a"));
    }

    #[tokio::test]
    async fn test_save_with_failing_remote_still_updates_local() {
        let dir = TempDir::new().expect("temp dir");
        let local = LocalStore::new(dir.path());
        let store = ProgressStore::new(local.clone(), signed_in_handle("u1"))
            .with_remote(Arc::new(FailingRecordStore));

        let map = map_of(&[("c1-a", true)]);
        store.save("myrise", &map).expect("save");

        assert_eq!(local.read_progress("myrise").expect("read"), map);
        // The awaited push reports the failure the spawned one only logs.
        assert!(store.push_remote("myrise", &map).await.is_err());
    }

    #[test]
    fn test_save_outside_runtime_skips_push() {
        let dir = TempDir::new().expect("temp dir");
        let local = LocalStore::new(dir.path());
        let store = ProgressStore::new(local.clone(), signed_in_handle("u1"))
            .with_remote(Arc::new(MemoryRecordStore::new()));

        let map = map_of(&[("c1-a", true)]);
        store.save("myrise", &map).expect("save");
        assert_eq!(local.read_progress("myrise").expect("read"), map);
    }

    #[tokio::test]
    async fn test_push_remote_upserts_row() {
        let dir = TempDir::new().expect("temp dir");
        let remote = Arc::new(MemoryRecordStore::new());
        let store = ProgressStore::new(LocalStore::new(dir.path()), signed_in_handle("u1"))
            .with_remote(Arc::clone(&remote) as Arc<dyn RecordStore>);

        let map = map_of(&[("c1-a", true)]);
        store.push_remote("myrise", &map).await.expect("push");

        let filter = RecordFilter::progress(&Identity::new("u1"), "myrise");
        let row = remote
            .select(PROGRESS_TABLE, &filter)
            .await
            .expect("select")
            .expect("row");
        let record: ProgressRecord = serde_json::from_value(row).expect("record");
        assert!(record.data.is_complete("c1-a"));
        assert!(record.updated_at > 0);
    }

    #[tokio::test]
    async fn test_push_remote_without_session_is_unavailable() {
        let dir = TempDir::new().expect("temp dir");
        let store = ProgressStore::new(LocalStore::new(dir.path()), SessionHandle::new())
            .with_remote(Arc::new(MemoryRecordStore::new()));
        assert!(matches!(
            store.push_remote("myrise", &CompletionMap::new()).await,
            Err(RemoteError::Unavailable)
        ));
    }

    #[tokio::test]
    async fn test_reconcile_pulls_remote_into_local() {
        let dir = TempDir::new().expect("temp dir");
        let local = LocalStore::new(dir.path());
        let remote = Arc::new(MemoryRecordStore::new());
        seed_remote(&remote, "u1", "mygm", map_of(&[("gm-p1-1", true)])).await;

        let store = ProgressStore::new(local.clone(), signed_in_handle("u1")).with_remote(remote);
        assert!(store.reconcile("mygm").await);
        assert!(local
            .read_progress("mygm")
            .expect("read")
            .is_complete("gm-p1-1"));

        // Nothing stored remotely for this category.
        assert!(!store.reconcile("showcase").await);
    }

    #[tokio::test]
    async fn test_cache_tracks_last_seen_and_clears() {
        let dir = TempDir::new().expect("temp dir");
        let store = ProgressStore::new(LocalStore::new(dir.path()), SessionHandle::new());

        assert!(store.cached("myrise").is_none());
        let map = map_of(&[("c1-a", true)]);
        store.save("myrise", &map).expect("save");
        assert_eq!(store.cached("myrise"), Some(map));

        store.clear_cache();
        assert!(store.cached("myrise").is_none());
    }
}
