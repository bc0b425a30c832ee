//! Core services of the enrollment API.
//! - `storage`: JSON object store client and its backends (S3, local files, memory).
//! - `append_log`: read-modify-write append onto a JSON array blob.
//! - `utility_cache`: lazily loaded zip → utility table.
//! - `geocoding`: address validation against the Census geocoder.
//! - `submission`: builds and appends submission records.

pub mod errors;
pub mod storage;
pub mod append_log;
pub mod utility_cache;
pub mod geocoding;
pub mod submission;
pub mod metrics;
pub mod runtime;
