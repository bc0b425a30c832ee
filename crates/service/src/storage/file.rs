use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use super::object_store::{decode, encode, ObjectStore, StoredObject};
use crate::errors::ServiceError;

/// Local-directory object store: key `a/b.json` lives at `<root>/a/b.json`.
///
/// Writes go to a sibling temp file and are renamed into place, so readers
/// observe either the old or the new object.
#[derive(Clone, Debug)]
pub struct FileObjectStore {
    root: PathBuf,
}

impl FileObjectStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ServiceError> {
        let rel = Path::new(key);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if key.is_empty() || escapes {
            return Err(ServiceError::store(key, "key must be a relative path inside the store root"));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl ObjectStore for FileObjectStore {
    async fn get(&self, key: &str) -> Result<StoredObject, ServiceError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                let value = decode(key, &bytes)?;
                info!(%key, "read object from local store");
                Ok(StoredObject::Present(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(%key, "object not found in local store");
                Ok(StoredObject::Absent)
            }
            Err(e) => Err(ServiceError::store(key, e)),
        }
    }

    async fn put(&self, key: &str, value: &Value) -> Result<(), ServiceError> {
        let path = self.path_for(key)?;
        let bytes = encode(key, value)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| ServiceError::store(key, e))?;
        }
        let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4()));
        fs::write(&tmp, bytes).await.map_err(|e| ServiceError::store(key, e))?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::store(key, e));
        }
        info!(%key, "wrote object to local store");
        Ok(())
    }
}
