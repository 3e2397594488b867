//! Remote persistence tier.
//!
//! The remote side is an unreliable, best-effort record store reached over
//! the network: progress rows keyed by (identity, category) and custom
//! roster rows keyed by (entry id, identity). Everything behind
//! [`RecordStore`] is a single request-response with no retry; callers in
//! [`crate::progress`] and [`crate::custom`] degrade to the local tier on
//! any failure.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use ringside_common::completion::CompletionMap;
use ringside_common::types::Wrestler;

/// Remote table holding per-category progress rows.
pub const PROGRESS_TABLE: &str = "user_progress";
/// Remote table holding user-created roster entries.
pub const CUSTOM_TABLE: &str = "custom_wrestlers";

/// Errors from the remote tier.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// No row matched the filter.
    #[error("record not found")]
    NotFound,

    /// Row exists but does not match the expected shape.
    #[error("invalid record data: {0}")]
    InvalidData(String),

    /// The backend rejected the credentials attached to the call.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The backend is not reachable at all.
    #[error("remote store unavailable")]
    Unavailable,
}

/// Result type for remote tier operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

// ============================================================================
// Identity and record shapes
// ============================================================================

/// Opaque authenticated identity used to key remote records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a provider-issued identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One progress row: a category's completion map for one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Owning identity.
    pub identity: Identity,
    /// Category key.
    pub category: String,
    /// The completion map payload.
    pub data: CompletionMap,
    /// Last write time, seconds since the Unix epoch. Informational only;
    /// conflicting writers are last-write-wins.
    pub updated_at: u64,
}

/// One custom roster row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEntryRecord {
    /// Entry id (`custom_<millis>`).
    pub id: String,
    /// Owning identity.
    pub identity: Identity,
    /// The wrestler payload.
    pub wrestler: Wrestler,
}

// ============================================================================
// Filters
// ============================================================================

/// Conjunction of field equality conditions, the only filter shape the
/// backend supports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    conditions: Vec<(String, String)>,
}

impl RecordFilter {
    /// Empty filter matching every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field equality condition.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// The filter's conditions.
    #[must_use]
    pub fn conditions(&self) -> &[(String, String)] {
        &self.conditions
    }

    /// Whether a JSON record satisfies every condition.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            record
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|actual| actual == expected)
        })
    }

    /// Filter for a progress row.
    #[must_use]
    pub fn progress(identity: &Identity, category: &str) -> Self {
        Self::new()
            .eq("identity", identity.as_str())
            .eq("category", category)
    }

    /// Filter for one identity's custom entries.
    #[must_use]
    pub fn custom_entries(identity: &Identity) -> Self {
        Self::new().eq("identity", identity.as_str())
    }

    /// Filter for a single custom entry.
    #[must_use]
    pub fn custom_entry(identity: &Identity, entry_id: &str) -> Self {
        Self::new()
            .eq("id", entry_id)
            .eq("identity", identity.as_str())
    }
}

// ============================================================================
// Backend trait
// ============================================================================

/// Asynchronous record-store backend.
///
/// Implementations are treated as unreliable: every call may fail, and
/// callers never retry. Rows are JSON objects; upserts replace the row
/// whose key columns match the incoming record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    /// Insert the record, or replace the existing row with the same key.
    async fn upsert(&self, table: &str, record: Value) -> RemoteResult<()>;

    /// First row matching the filter, if any.
    async fn select(&self, table: &str, filter: &RecordFilter) -> RemoteResult<Option<Value>>;

    /// Every row matching the filter.
    async fn select_all(&self, table: &str, filter: &RecordFilter) -> RemoteResult<Vec<Value>>;

    /// Delete every row matching the filter; deleting nothing is not an
    /// error.
    async fn delete(&self, table: &str, filter: &RecordFilter) -> RemoteResult<()>;
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-memory [`RecordStore`], used in tests and as an offline stand-in.
///
/// Key columns default to the two application tables: progress rows are
/// keyed by (identity, category), custom entries by (id, identity).
#[derive(Debug)]
pub struct MemoryRecordStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    key_columns: HashMap<String, Vec<String>>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        let mut key_columns = HashMap::new();
        key_columns.insert(
            PROGRESS_TABLE.to_string(),
            vec!["identity".to_string(), "category".to_string()],
        );
        key_columns.insert(
            CUSTOM_TABLE.to_string(),
            vec!["id".to_string(), "identity".to_string()],
        );
        Self {
            tables: Mutex::new(HashMap::new()),
            key_columns,
        }
    }
}

impl MemoryRecordStore {
    /// Create a store with the application's default key columns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the key columns for a table.
    #[must_use]
    pub fn with_key_columns<I, S>(mut self, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_columns
            .insert(table.into(), columns.into_iter().map(Into::into).collect());
        self
    }

    /// Number of rows currently stored in a table.
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.lock().get(table).map_or(0, Vec::len)
    }

    /// Drop every row in every table.
    pub fn clear(&self) {
        self.tables.lock().clear();
    }

    /// Filter matching the key columns of an incoming record.
    fn key_filter(&self, table: &str, record: &Value) -> RecordFilter {
        let mut filter = RecordFilter::new();
        if let Some(columns) = self.key_columns.get(table) {
            for column in columns {
                if let Some(value) = record.get(column).and_then(Value::as_str) {
                    filter = filter.eq(column, value);
                }
            }
        }
        filter
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn name(&self) -> &str {
        "In-Memory Record Store"
    }

    async fn upsert(&self, table: &str, record: Value) -> RemoteResult<()> {
        let key = self.key_filter(table, &record);
        let mut tables = self.tables.lock();
        let rows = tables.entry(table.to_string()).or_default();
        if key.conditions().is_empty() {
            rows.push(record);
        } else {
            rows.retain(|row| !key.matches(row));
            rows.push(record);
        }
        Ok(())
    }

    async fn select(&self, table: &str, filter: &RecordFilter) -> RemoteResult<Option<Value>> {
        let tables = self.tables.lock();
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| filter.matches(row)).cloned()))
    }

    async fn select_all(&self, table: &str, filter: &RecordFilter) -> RemoteResult<Vec<Value>> {
        let tables = self.tables.lock();
        Ok(tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete(&self, table: &str, filter: &RecordFilter) -> RemoteResult<()> {
        let mut tables = self.tables.lock();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !filter.matches(row));
        }
        Ok(())
    }
}
