use std::sync::Arc;

use chrono::Utc;
use models::{ConfirmationData, SubmissionRecord, SubmissionResponse};
use tracing::{info, instrument};

use crate::append_log::AppendLog;
use crate::errors::ServiceError;
use crate::storage::ObjectStore;

/// Records confirmed registrations in the submissions log.
pub struct SubmissionService {
    log: AppendLog,
    key: String,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn ObjectStore>, key: impl Into<String>) -> Self {
        Self { log: AppendLog::new(store), key: key.into() }
    }

    /// Stamp `data` with the current UTC time and append it.
    #[instrument(skip(self, data), fields(key = %self.key))]
    pub async fn submit(&self, data: ConfirmationData) -> Result<SubmissionResponse, ServiceError> {
        data.validate()?;
        info!(
            first_name = %data.user_info.first_name,
            last_name = %data.user_info.last_name,
            "submitting subscriber"
        );
        let record = SubmissionRecord::from_confirmation(data, Utc::now());
        self.append_submission(&record).await?;
        Ok(SubmissionResponse::submitted())
    }

    /// Append one record. Not idempotent: a retry appends a second copy.
    pub async fn append_submission(&self, record: &SubmissionRecord) -> Result<(), ServiceError> {
        let item = serde_json::to_value(record).map_err(|e| ServiceError::Encode(e.to_string()))?;
        self.log.append(&self.key, item).await?;
        Ok(())
    }

    /// All stored submissions, oldest first. Entries that do not decode as
    /// records (legacy or hand-edited) are skipped.
    pub async fn list(&self) -> Result<Vec<SubmissionRecord>, ServiceError> {
        let entries = self.log.read(&self.key).await?;
        Ok(entries
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect())
    }
}
