//! Runtime wiring
//!
//! Builds the object store selected by config and the services layered on it.

use std::sync::Arc;

use configs::{AppConfig, StorageBackend, StorageConfig};
use tracing::info;

use crate::errors::ServiceError;
use crate::geocoding::{AddressValidator, CensusGeocoder, Geocoder};
use crate::storage::{FileObjectStore, MemoryObjectStore, ObjectStore, S3ObjectStore};
use crate::submission::SubmissionService;
use crate::utility_cache::UtilityCache;

/// One instance per process, shared by all request handlers.
#[derive(Clone)]
pub struct Services {
    pub validator: Arc<AddressValidator>,
    pub utilities: Arc<UtilityCache>,
    pub submissions: Arc<SubmissionService>,
}

impl Services {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        geocoder: Arc<dyn Geocoder>,
        storage: &StorageConfig,
        benchmark: &str,
    ) -> Self {
        Self {
            validator: Arc::new(AddressValidator::new(geocoder, benchmark)),
            utilities: Arc::new(UtilityCache::new(Arc::clone(&store), storage.utilities_file_key.clone())),
            submissions: Arc::new(SubmissionService::new(store, storage.submissions_file_key.clone())),
        }
    }
}

pub async fn build_object_store(cfg: &StorageConfig) -> Result<Arc<dyn ObjectStore>, ServiceError> {
    info!(backend = ?cfg.backend, "configuring object store");
    let store: Arc<dyn ObjectStore> = match cfg.backend {
        StorageBackend::S3 => Arc::new(S3ObjectStore::connect(cfg).await?),
        StorageBackend::File => {
            common::env::ensure_data_dir(&cfg.root_dir)
                .await
                .map_err(|e| ServiceError::Store(e.to_string()))?;
            Arc::new(FileObjectStore::new(&cfg.root_dir))
        }
        StorageBackend::Memory => Arc::new(MemoryObjectStore::new()),
    };
    Ok(store)
}

pub async fn build_services(cfg: &AppConfig) -> Result<Services, ServiceError> {
    let store = build_object_store(&cfg.storage).await?;
    let geocoder: Arc<dyn Geocoder> = Arc::new(CensusGeocoder::from_config(&cfg.geocoding)?);
    Ok(Services::new(store, geocoder, &cfg.storage, &cfg.geocoding.benchmark))
}
