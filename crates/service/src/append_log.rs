//! Append-only JSON array log on top of an [`ObjectStore`].
//!
//! Each append is a full read-modify-write of the blob. There is no
//! conditional write, so two concurrent appends to the same key can race and
//! the later `put` silently drops the other writer's item.
// TODO: switch to a conditional put (If-Match on the S3 ETag) once multiple writers share a log.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::metrics;
use crate::storage::{ObjectStore, StoredObject};

pub struct AppendLog {
    store: Arc<dyn ObjectStore>,
}

impl AppendLog {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Append `item` to the array stored at `key`; returns the new length.
    ///
    /// Store and decode failures propagate unchanged and leave the log as it
    /// was. No retry, no dedup.
    #[instrument(skip(self, item), fields(key = %key))]
    pub async fn append(&self, key: &str, item: Value) -> Result<usize, ServiceError> {
        let existing = self.store.get(key).await?;
        let mut entries = into_entries(key, existing);
        entries.push(item);
        let len = entries.len();
        self.store.put(key, &Value::Array(entries)).await?;
        metrics::LOG_APPENDS_TOTAL.inc();
        info!(%key, entries = len, "appended item to log");
        Ok(len)
    }

    /// Current entries at `key`, with the same coercion `append` applies.
    pub async fn read(&self, key: &str) -> Result<Vec<Value>, ServiceError> {
        let existing = self.store.get(key).await?;
        Ok(into_entries(key, existing))
    }
}

/// Absent or empty objects start a new log; any other non-array value is
/// wrapped as the first entry so the rewritten blob is always an array.
fn into_entries(key: &str, stored: StoredObject) -> Vec<Value> {
    match stored {
        StoredObject::Absent => Vec::new(),
        StoredObject::Present(Value::Array(items)) => items,
        StoredObject::Present(v) if is_empty_json(&v) => Vec::new(),
        StoredObject::Present(other) => {
            warn!(%key, "stored log is not an array, wrapping existing value");
            vec![other]
        }
    }
}

fn is_empty_json(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Object(m) => m.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryObjectStore;
    use async_trait::async_trait;
    use serde_json::json;

    const KEY: &str = "submissions.json";

    fn log_over(store: &Arc<MemoryObjectStore>) -> AppendLog {
        AppendLog::new(store.clone())
    }

    async fn stored(store: &MemoryObjectStore) -> Value {
        let bytes = store.raw(KEY).await.expect("log written");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    #[tokio::test]
    async fn append_to_missing_key_creates_single_element_array() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryObjectStore::new());
        let n = log_over(&store).append(KEY, json!({"id": 1})).await?;
        assert_eq!(n, 1);
        assert_eq!(stored(&store).await, json!([{"id": 1}]));
        Ok(())
    }

    #[tokio::test]
    async fn append_wraps_single_object() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryObjectStore::new());
        store.seed(KEY, &json!({"legacy": true})).await;
        log_over(&store).append(KEY, json!({"id": 2})).await?;
        assert_eq!(stored(&store).await, json!([{"legacy": true}, {"id": 2}]));
        Ok(())
    }

    #[tokio::test]
    async fn empty_object_and_null_start_fresh() -> Result<(), anyhow::Error> {
        for seed in [json!({}), json!(null), json!([])] {
            let store = Arc::new(MemoryObjectStore::new());
            store.seed(KEY, &seed).await;
            log_over(&store).append(KEY, json!("x")).await?;
            assert_eq!(stored(&store).await, json!(["x"]), "seed {seed}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn appends_preserve_order_and_do_not_dedup() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryObjectStore::new());
        let log = log_over(&store);
        log.append(KEY, json!({"n": 1})).await?;
        log.append(KEY, json!({"n": 2})).await?;
        log.append(KEY, json!({"n": 2})).await?;
        assert_eq!(log.read(KEY).await?, vec![json!({"n": 1}), json!({"n": 2}), json!({"n": 2})]);
        assert_eq!(store.put_count(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_log_fails_without_write() {
        let store = Arc::new(MemoryObjectStore::new());
        store.put_raw(KEY, "[{broken").await;
        let err = log_over(&store).append(KEY, json!(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
        assert_eq!(store.put_count(), 0);
        assert_eq!(store.raw(KEY).await.unwrap(), b"[{broken".to_vec());
    }

    struct ReadOnlyStore(MemoryObjectStore);

    #[async_trait]
    impl ObjectStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> Result<StoredObject, ServiceError> {
            self.0.get(key).await
        }
        async fn put(&self, key: &str, _value: &Value) -> Result<(), ServiceError> {
            Err(ServiceError::store(key, "access denied"))
        }
    }

    #[tokio::test]
    async fn failed_put_propagates_and_leaves_log_unchanged() {
        let inner = MemoryObjectStore::new();
        inner.seed(KEY, &json!([1])).await;
        let store = Arc::new(ReadOnlyStore(inner));
        let log = AppendLog::new(store.clone());

        let err = log.append(KEY, json!(2)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(ref m) if m.contains("access denied")));
        assert_eq!(log.read(KEY).await.unwrap(), vec![json!(1)]);
    }
}
