use serde::{Deserialize, Serialize};

pub const UNKNOWN_UTILITY_NAME: &str = "Unknown Utility Company";
pub const UNKNOWN_UTILITY_CONTACT: &str = "Please contact your local utility provider";

/// Utility serving a zip code, as stored in the utilities blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityRecord {
    pub name: String,
    #[serde(default)]
    pub service_area: String,
    #[serde(default)]
    pub contact_info: String,
}

impl UtilityRecord {
    /// Sentinel returned for zips absent from the lookup table.
    pub fn unknown(zip: &str) -> Self {
        Self {
            name: UNKNOWN_UTILITY_NAME.to_string(),
            service_area: zip.to_string(),
            contact_info: UNKNOWN_UTILITY_CONTACT.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_UTILITY_NAME
    }
}

/// Utility company as exchanged with the frontend: the lookup response, and
/// the selection echoed back inside a submission (where only `name` and
/// `zipCode` are required).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityCompany {
    pub name: String,
    #[serde(rename = "zipCode", alias = "zip_code")]
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_area: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact_info: String,
}

impl UtilityCompany {
    pub fn from_record(zip_code: &str, record: UtilityRecord) -> Self {
        Self {
            name: record.name,
            zip_code: zip_code.to_string(),
            service_area: record.service_area,
            contact_info: record.contact_info,
        }
    }
}

/// Strip hyphens and spaces, keep at most the first five characters.
///
/// Digits are not checked: malformed input simply never matches a key.
pub fn normalize_zip(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-' && *c != ' ').take(5).collect()
}

/// Exactly five ASCII digits.
pub fn is_canonical_zip(zip: &str) -> bool {
    zip.len() == 5 && zip.bytes().all(|b| b.is_ascii_digit())
}
