//! User-created roster entries.
//!
//! Custom wrestlers live as one JSON list in the local tier and are
//! mirrored row-per-entry to the remote tier while a session is present:
//! upsert on save, delete on removal, and a pull that overwrites the local
//! list during login reconciliation. Remote failures are logged and
//! ignored; the local list is always written first.

use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use ringside_common::types::{Brand, Stats, Wrestler, WrestlerStyle};

use crate::remote::{
    CustomEntryRecord, RecordFilter, RecordStore, RemoteError, RemoteResult, CUSTOM_TABLE,
};
use crate::session::SessionHandle;
use crate::store::{LocalStore, StoreError, StoreResult};

/// Local tier key holding the custom roster list.
pub const CUSTOM_ROSTER_KEY: &str = "custom-wrestlers";

/// Milliseconds since the Unix epoch, for entry ids.
fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Input for a new custom wrestler. The entry id and the overall rating
/// are derived on save, never supplied by the caller.
#[derive(Debug, Clone)]
pub struct CustomWrestlerDraft {
    /// Ring name.
    pub name: String,
    /// Optional nickname.
    pub alias: Option<String>,
    /// Roster brand.
    pub brand: Brand,
    /// In-ring style.
    pub style: WrestlerStyle,
    /// Portrait image location.
    pub image_url: String,
    /// Billed country.
    pub country: String,
    /// Billed height in centimeters.
    pub height_cm: u16,
    /// Billed weight in kilograms.
    pub weight_kg: u16,
    /// Short biography.
    pub bio: String,
    /// Raw power.
    pub strength: u8,
    /// Mobility and balance.
    pub agility: u8,
    /// Hold and counter proficiency.
    pub technique: u8,
    /// Movement and strike speed.
    pub speed: u8,
    /// Damage mitigation.
    pub defense: u8,
    /// Comeback and kick-out capacity.
    pub resilience: u8,
}

impl CustomWrestlerDraft {
    /// Create a draft with neutral defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            brand: Brand::Raw,
            style: WrestlerStyle::Striker,
            image_url: String::new(),
            country: String::new(),
            height_cm: 180,
            weight_kg: 90,
            bio: String::new(),
            strength: 75,
            agility: 75,
            technique: 75,
            speed: 75,
            defense: 75,
            resilience: 75,
        }
    }

    /// Set the nickname.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set brand and style.
    #[must_use]
    pub fn with_identity(mut self, brand: Brand, style: WrestlerStyle) -> Self {
        self.brand = brand;
        self.style = style;
        self
    }

    /// Set the six attributes; the overall rating is computed from them.
    #[must_use]
    pub fn with_attributes(
        mut self,
        strength: u8,
        agility: u8,
        technique: u8,
        speed: u8,
        defense: u8,
        resilience: u8,
    ) -> Self {
        self.strength = strength;
        self.agility = agility;
        self.technique = technique;
        self.speed = speed;
        self.defense = defense;
        self.resilience = resilience;
        self
    }

    fn into_wrestler(self, id: String) -> Wrestler {
        let stats = Stats::with_computed_overall(
            self.strength,
            self.agility,
            self.technique,
            self.speed,
            self.defense,
            self.resilience,
        );
        Wrestler {
            id,
            name: self.name,
            alias: self.alias,
            brand: self.brand,
            style: self.style,
            image_url: self.image_url,
            country: self.country,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            bio: self.bio,
            stats,
        }
    }
}

/// Local-list-plus-remote-mirror store for custom wrestlers.
pub struct CustomRosterStore {
    local: LocalStore,
    remote: Option<Arc<dyn RecordStore>>,
    session: SessionHandle,
}

impl CustomRosterStore {
    /// Create a store over the local tier only.
    #[must_use]
    pub fn new(local: LocalStore, session: SessionHandle) -> Self {
        Self {
            local,
            remote: None,
            session,
        }
    }

    /// Attach a remote record store.
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RecordStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// The locally stored custom roster. A missing or unreadable list
    /// reads as empty.
    #[must_use]
    pub fn list(&self) -> Vec<Wrestler> {
        match self.local.read_json::<Vec<Wrestler>>(CUSTOM_ROSTER_KEY) {
            Ok(list) => list,
            Err(StoreError::NotFound(_)) => Vec::new(),
            Err(e) => {
                warn!("custom roster list unreadable: {e}");
                Vec::new()
            },
        }
    }

    /// Save a new custom wrestler: assign a `custom_<millis>` id, compute
    /// the overall rating, persist the local list, then best-effort mirror
    /// the entry to the remote tier when a session is present.
    pub async fn add(&self, draft: CustomWrestlerDraft) -> StoreResult<Wrestler> {
        let mut list = self.list();

        let mut stamp = epoch_millis();
        while list
            .iter()
            .any(|entry| entry.id == format!("{}{stamp}", Wrestler::CUSTOM_PREFIX))
        {
            stamp += 1;
        }
        let wrestler = draft.into_wrestler(format!("{}{stamp}", Wrestler::CUSTOM_PREFIX));

        list.push(wrestler.clone());
        self.local.write_json(CUSTOM_ROSTER_KEY, &list)?;
        info!("saved custom wrestler {}", wrestler.id);

        if let Err(e) = self.push_entry(&wrestler).await {
            if !matches!(e, RemoteError::Unavailable) {
                warn!("remote mirror of {} failed: {e}", wrestler.id);
            }
        }
        Ok(wrestler)
    }

    /// Remove a custom wrestler by id. Returns false when the id was not
    /// in the list. The remote row is deleted best-effort afterwards.
    pub async fn remove(&self, entry_id: &str) -> StoreResult<bool> {
        let mut list = self.list();
        let before = list.len();
        list.retain(|entry| entry.id != entry_id);
        if list.len() == before {
            return Ok(false);
        }

        self.local.write_json(CUSTOM_ROSTER_KEY, &list)?;
        info!("removed custom wrestler {entry_id}");

        if let Err(e) = self.remove_remote(entry_id).await {
            if !matches!(e, RemoteError::Unavailable) {
                warn!("remote delete of {entry_id} failed: {e}");
            }
        }
        Ok(true)
    }

    /// Upsert one entry to the remote tier. [`RemoteError::Unavailable`]
    /// when no session or remote store exists.
    pub async fn push_entry(&self, wrestler: &Wrestler) -> RemoteResult<()> {
        let (Some(identity), Some(remote)) = (self.session.identity(), self.remote.as_ref())
        else {
            return Err(RemoteError::Unavailable);
        };
        let record = CustomEntryRecord {
            id: wrestler.id.clone(),
            identity,
            wrestler: wrestler.clone(),
        };
        let row = serde_json::to_value(&record)
            .map_err(|e| RemoteError::InvalidData(e.to_string()))?;
        remote.upsert(CUSTOM_TABLE, row).await
    }

    /// Delete one entry's remote row.
    pub async fn remove_remote(&self, entry_id: &str) -> RemoteResult<()> {
        let (Some(identity), Some(remote)) = (self.session.identity(), self.remote.as_ref())
        else {
            return Err(RemoteError::Unavailable);
        };
        remote
            .delete(CUSTOM_TABLE, &RecordFilter::custom_entry(&identity, entry_id))
            .await
    }

    /// Pull this identity's entries from the remote tier and overwrite the
    /// local list (remote wins at login). Malformed rows are skipped; a
    /// failed pull leaves the local list untouched. Returns true when the
    /// local list was overwritten.
    pub async fn pull_remote(&self) -> bool {
        let (Some(identity), Some(remote)) = (self.session.identity(), self.remote.as_ref())
        else {
            return false;
        };

        let rows = match remote
            .select_all(CUSTOM_TABLE, &RecordFilter::custom_entries(&identity))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!("custom roster pull failed: {e}");
                return false;
            },
        };

        let list: Vec<Wrestler> = rows
            .into_iter()
            .filter_map(|row: Value| {
                match serde_json::from_value::<CustomEntryRecord>(row) {
                    Ok(record) => Some(record.wrestler),
                    Err(e) => {
                        debug!("skipping malformed custom roster row: {e}");
                        None
                    },
                }
            })
            .collect();

        match self.local.write_json(CUSTOM_ROSTER_KEY, &list) {
            Ok(()) => {
                info!("pulled {} custom wrestlers from remote", list.len());
                true
            },
            Err(e) => {
                warn!("failed to store pulled custom roster: {e}");
                false
            },
        }
    }
}

impl std::fmt::Debug for CustomRosterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomRosterStore")
            .field("local", &self.local)
            .field("has_remote", &self.remote.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{Identity, MemoryRecordStore};
    use crate::session::Session;
    use tempfile::TempDir;

    fn signed_in_handle(user: &str) -> SessionHandle {
        let handle = SessionHandle::new();
        handle.set(Some(Session::new(
            Identity::new(user),
            format!("{user}@example.com"),
        )));
        handle
    }

    fn local_only() -> (TempDir, CustomRosterStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = CustomRosterStore::new(LocalStore::new(dir.path()), SessionHandle::new());
        (dir, store)
    }

    fn mirrored(user: &str) -> (TempDir, Arc<MemoryRecordStore>, CustomRosterStore) {
        let dir = TempDir::new().expect("temp dir");
        let remote = Arc::new(MemoryRecordStore::new());
        let store = CustomRosterStore::new(LocalStore::new(dir.path()), signed_in_handle(user))
            .with_remote(Arc::clone(&remote) as Arc<dyn RecordStore>);
        (dir, remote, store)
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_computed_overall() {
        let (_dir, store) = local_only();
        let draft = CustomWrestlerDraft::new("Iron Vega")
            .with_alias("The Anvil")
            .with_identity(Brand::SmackDown, WrestlerStyle::Powerhouse)
            .with_attributes(95, 60, 70, 65, 85, 90);

        let wrestler = store.add(draft).await.expect("add");

        assert!(wrestler.is_custom());
        // (95 + 60 + 70 + 65 + 85 + 90) / 6 = 77.5 -> 78
        assert_eq!(wrestler.stats.overall, 78);
        assert_eq!(store.list(), vec![wrestler]);
    }

    #[tokio::test]
    async fn test_ids_stay_unique_within_one_millisecond() {
        let (_dir, store) = local_only();
        let first = store
            .add(CustomWrestlerDraft::new("One"))
            .await
            .expect("first");
        let second = store
            .add(CustomWrestlerDraft::new("Two"))
            .await
            .expect("second");
        assert_ne!(first.id, second.id);
        assert_eq!(store.list().len(), 2);
    }

    #[tokio::test]
    async fn test_add_mirrors_to_remote_when_signed_in() {
        let (_dir, remote, store) = mirrored("u1");
        let wrestler = store
            .add(CustomWrestlerDraft::new("Iron Vega"))
            .await
            .expect("add");

        assert_eq!(remote.row_count(CUSTOM_TABLE), 1);
        let row = remote
            .select(
                CUSTOM_TABLE,
                &RecordFilter::custom_entry(&Identity::new("u1"), &wrestler.id),
            )
            .await
            .expect("select")
            .expect("row");
        let record: CustomEntryRecord = serde_json::from_value(row).expect("record");
        assert_eq!(record.wrestler.name, "Iron Vega");
    }

    #[tokio::test]
    async fn test_remove_deletes_locally_and_remotely() {
        let (_dir, remote, store) = mirrored("u1");
        let wrestler = store
            .add(CustomWrestlerDraft::new("Iron Vega"))
            .await
            .expect("add");

        assert!(store.remove(&wrestler.id).await.expect("remove"));
        assert!(store.list().is_empty());
        assert_eq!(remote.row_count(CUSTOM_TABLE), 0);

        // Unknown ids are reported, not errors.
        assert!(!store.remove("custom_0").await.expect("noop remove"));
    }

    #[tokio::test]
    async fn test_pull_remote_overwrites_local_list() {
        let (_dir, remote, store) = mirrored("u1");

        // Local entry that the login pull must replace.
        store
            .add(CustomWrestlerDraft::new("Local Only"))
            .await
            .expect("add");
        remote.clear();

        let record = CustomEntryRecord {
            id: "custom_42".to_string(),
            identity: Identity::new("u1"),
            wrestler: CustomWrestlerDraft::new("Cloud Champ")
                .into_wrestler("custom_42".to_string()),
        };
        remote
            .upsert(CUSTOM_TABLE, serde_json::to_value(&record).expect("row"))
            .await
            .expect("seed");
        // A malformed row must be skipped, not fatal.
        remote
            .upsert(CUSTOM_TABLE, serde_json::json!({"identity": "u1", "id": "junk"}))
            .await
            .expect("seed junk");

        assert!(store.pull_remote().await);
        let list = store.list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Cloud Champ");
    }

    #[tokio::test]
    async fn test_pull_without_session_leaves_local_untouched() {
        let (_dir, store) = local_only();
        store
            .add(CustomWrestlerDraft::new("Keeper"))
            .await
            .expect("add");

        assert!(!store.pull_remote().await);
        assert_eq!(store.list().len(), 1);
    }

    #[tokio::test]
    async fn test_add_without_session_skips_remote() {
        let dir = TempDir::new().expect("temp dir");
        let remote = Arc::new(MemoryRecordStore::new());
        let store = CustomRosterStore::new(LocalStore::new(dir.path()), SessionHandle::new())
            .with_remote(Arc::clone(&remote) as Arc<dyn RecordStore>);

        store
            .add(CustomWrestlerDraft::new("Anon"))
            .await
            .expect("add");
        assert_eq!(remote.row_count(CUSTOM_TABLE), 0);
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_empty_list_when_nothing_stored() {
        let (_dir, store) = local_only();
        assert!(store.list().is_empty());
    }
}
