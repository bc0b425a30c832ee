//! Storage abstractions for service layer
//!
//! A keyed JSON blob store with whole-object replace semantics. Callers only
//! see decoded `serde_json::Value`s; a missing object is `StoredObject::Absent`,
//! not an error.

pub mod object_store;
pub mod memory;
pub mod file;
pub mod s3;

pub use object_store::{ObjectStore, StoredObject};
pub use memory::MemoryObjectStore;
pub use file::FileObjectStore;
pub use s3::S3ObjectStore;
