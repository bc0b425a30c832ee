use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::object_store::{decode, encode, ObjectStore, StoredObject};
use crate::errors::ServiceError;

/// In-process object store holding raw bytes per key.
///
/// Used by the `memory` storage backend and as a test double; it counts
/// reads and writes so callers can assert on round trips.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    gets: AtomicUsize,
    puts: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` verbatim, bypassing JSON encoding.
    pub async fn put_raw(&self, key: &str, bytes: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(key.to_string(), bytes.into());
    }

    /// Seed `key` with an encoded value without counting a put.
    pub async fn seed(&self, key: &str, value: &Value) {
        self.put_raw(key, value.to_string()).await;
    }

    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(key).cloned()
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get(&self, key: &str) -> Result<StoredObject, ServiceError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let bytes = self.objects.read().await.get(key).cloned();
        match bytes {
            None => {
                debug!(%key, "object not found in memory store");
                Ok(StoredObject::Absent)
            }
            Some(bytes) => decode(key, &bytes).map(StoredObject::Present),
        }
    }

    async fn put(&self, key: &str, value: &Value) -> Result<(), ServiceError> {
        let bytes = encode(key, value)?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.objects.write().await.insert(key.to_string(), bytes);
        Ok(())
    }
}
