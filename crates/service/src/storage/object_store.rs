use async_trait::async_trait;
use serde_json::Value;
use tracing::error;

use crate::errors::ServiceError;

/// Result of reading a key.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredObject {
    Absent,
    Present(Value),
}

impl StoredObject {
    pub fn is_absent(&self) -> bool {
        matches!(self, StoredObject::Absent)
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            StoredObject::Absent => None,
            StoredObject::Present(v) => Some(v),
        }
    }
}

/// Trait abstraction for JSON blob storage.
/// Implementations can be S3, local files, or in-process memory.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch and decode the object at `key`.
    async fn get(&self, key: &str) -> Result<StoredObject, ServiceError>;
    /// Encode `value` and replace whatever is stored at `key`.
    async fn put(&self, key: &str, value: &Value) -> Result<(), ServiceError>;
}

pub(crate) fn decode(key: &str, bytes: &[u8]) -> Result<Value, ServiceError> {
    serde_json::from_slice(bytes).map_err(|e| {
        error!(%key, error = %e, "stored object is not valid JSON");
        ServiceError::decode(key, e)
    })
}

pub(crate) fn encode(key: &str, value: &Value) -> Result<Vec<u8>, ServiceError> {
    serde_json::to_vec_pretty(value).map_err(|e| ServiceError::Encode(format!("{key}: {e}")))
}
