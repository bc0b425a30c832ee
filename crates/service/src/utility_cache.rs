//! Zip → utility lookup table, loaded lazily from the object store and kept
//! for the life of the process.
//!
//! State is a single atomically swapped pointer: `None` is Empty,
//! `Some(table)` is Populated. A load publishes a complete table in one
//! store, so readers never observe a partial mapping. Concurrent lookups on an
//! empty cache may each load; the last one to finish wins.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use models::utility::{is_canonical_zip, normalize_zip, UtilityRecord};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::errors::ServiceError;
use crate::metrics;
use crate::storage::{ObjectStore, StoredObject};

pub type UtilityTable = HashMap<String, UtilityRecord>;

/// Outcome of a lookup; "not found" is an ordinary value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtilityLookup {
    Found { zip: String, record: UtilityRecord },
    NotFound { zip: String },
}

impl UtilityLookup {
    /// Normalized zip the lookup was answered for.
    pub fn zip(&self) -> &str {
        match self {
            UtilityLookup::Found { zip, .. } | UtilityLookup::NotFound { zip } => zip,
        }
    }

    /// The matched record, or the "Unknown Utility Company" sentinel.
    pub fn into_record(self) -> UtilityRecord {
        match self {
            UtilityLookup::Found { record, .. } => record,
            UtilityLookup::NotFound { zip } => UtilityRecord::unknown(&zip),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Populated { entries: usize },
}

pub struct UtilityCache {
    store: Arc<dyn ObjectStore>,
    key: String,
    table: ArcSwapOption<UtilityTable>,
}

impl UtilityCache {
    pub fn new(store: Arc<dyn ObjectStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into(), table: ArcSwapOption::empty() }
    }

    pub fn state(&self) -> CacheState {
        match self.table.load().as_ref() {
            None => CacheState::Empty,
            Some(t) => CacheState::Populated { entries: t.len() },
        }
    }

    /// Look up the utility for `raw_zip`, loading the table first if empty.
    ///
    /// Fails only when that load fails; the cache then stays empty.
    #[instrument(skip(self))]
    pub async fn lookup(&self, raw_zip: &str) -> Result<UtilityLookup, ServiceError> {
        let zip = normalize_zip(raw_zip);
        let table = self.table().await?;
        metrics::UTILITY_LOOKUPS_TOTAL.inc();
        match table.get(&zip) {
            Some(record) => {
                debug!(%zip, utility = %record.name, "utility found");
                Ok(UtilityLookup::Found { zip, record: record.clone() })
            }
            None => {
                metrics::UTILITY_UNKNOWN_TOTAL.inc();
                debug!(%zip, "no utility for zip");
                Ok(UtilityLookup::NotFound { zip })
            }
        }
    }

    /// Record for `raw_zip`, with the sentinel standing in for unknown zips.
    pub async fn lookup_utility(&self, raw_zip: &str) -> Result<UtilityRecord, ServiceError> {
        Ok(self.lookup(raw_zip).await?.into_record())
    }

    /// Drop the cached table; the next lookup reloads it. No I/O.
    pub fn clear(&self) {
        self.table.store(None);
        info!(key = %self.key, "utility cache cleared");
    }

    async fn table(&self) -> Result<Arc<UtilityTable>, ServiceError> {
        if let Some(table) = self.table.load_full() {
            return Ok(table);
        }
        let table = Arc::new(self.load().await?);
        self.table.store(Some(Arc::clone(&table)));
        Ok(table)
    }

    async fn load(&self) -> Result<UtilityTable, ServiceError> {
        let stored = self.store.get(&self.key).await?;
        metrics::UTILITY_CACHE_LOADS_TOTAL.inc();
        let table = match stored {
            StoredObject::Absent => {
                warn!(key = %self.key, "utilities object missing, using empty table");
                UtilityTable::new()
            }
            StoredObject::Present(value) => decode_table(&self.key, value),
        };
        info!(key = %self.key, entries = table.len(), "utility table loaded");
        Ok(table)
    }
}

/// Decode a `{zip: record}` object. A non-object yields an empty table;
/// entries whose key is not a 5-digit zip or whose value is not a record are
/// skipped.
pub fn decode_table(key: &str, value: Value) -> UtilityTable {
    let entries = match value {
        Value::Object(map) => map,
        other => {
            warn!(%key, kind = json_kind(&other), "utilities object is not a zip mapping, using empty table");
            return UtilityTable::new();
        }
    };

    let mut table = UtilityTable::with_capacity(entries.len());
    for (raw_zip, raw_record) in entries {
        let zip = normalize_zip(&raw_zip);
        if !is_canonical_zip(&zip) {
            warn!(%key, zip = %raw_zip, "skipping utility entry with malformed zip");
            continue;
        }
        match serde_json::from_value::<UtilityRecord>(raw_record) {
            Ok(record) => {
                table.insert(zip, record);
            }
            Err(e) => warn!(%key, zip = %raw_zip, error = %e, "skipping malformed utility entry"),
        }
    }
    table
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
