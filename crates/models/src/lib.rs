//! Wire and domain value types shared by the service and server crates.
//! Request types carry their own validation; nothing here performs I/O.

pub mod errors;
pub mod address;
pub mod utility;
pub mod submission;

pub use address::{AddressQuery, Coordinates, ValidatedAddress};
pub use submission::{AssistanceProgram, ConfirmationData, SubmissionRecord, SubmissionResponse, UserInfo};
pub use utility::{normalize_zip, UtilityCompany, UtilityRecord};
