use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::utility::UtilityCompany;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssistanceProgram {
    #[serde(rename = "SNAP")]
    Snap,
    Medicaid,
    None,
}

impl AssistanceProgram {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssistanceProgram::Snap => "SNAP",
            AssistanceProgram::Medicaid => "Medicaid",
            AssistanceProgram::None => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "firstName", alias = "first_name")]
    pub first_name: String,
    #[serde(rename = "lastName", alias = "last_name")]
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode", alias = "zip_code")]
    pub zip_code: String,
}

/// Confirmed registration posted by the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationData {
    #[serde(rename = "userInfo", alias = "user_info")]
    pub user_info: UserInfo,
    #[serde(rename = "recommendedAddress", alias = "recommended_address")]
    pub recommended_address: String,
    #[serde(rename = "utilityCompany", alias = "utility_company")]
    pub utility_company: UtilityCompany,
    #[serde(rename = "assistanceProgram", alias = "assistance_program")]
    pub assistance_program: AssistanceProgram,
}

impl ConfirmationData {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.user_info.first_name.trim().is_empty() || self.user_info.last_name.trim().is_empty() {
            return Err(ModelError::Validation("first and last name are required".into()));
        }
        if self.utility_company.name.trim().is_empty() {
            return Err(ModelError::Validation("utility company name is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedUser {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedUtility {
    pub name: String,
    pub zip_code: String,
}

/// One entry of the append-only submissions log (snake_case on disk).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub timestamp: String,
    pub user_info: SubmittedUser,
    pub recommended_address: String,
    pub utility_company: SubmittedUtility,
    pub assistance_program: AssistanceProgram,
}

impl SubmissionRecord {
    pub fn from_confirmation(data: ConfirmationData, at: DateTime<Utc>) -> Self {
        let ConfirmationData { user_info, recommended_address, utility_company, assistance_program } = data;
        Self {
            timestamp: at.to_rfc3339_opts(SecondsFormat::Micros, true),
            user_info: SubmittedUser {
                first_name: user_info.first_name,
                last_name: user_info.last_name,
                address: user_info.address,
                city: user_info.city,
                state: user_info.state,
                zip_code: user_info.zip_code,
            },
            recommended_address,
            utility_company: SubmittedUtility {
                name: utility_company.name,
                zip_code: utility_company.zip_code,
            },
            assistance_program,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
}

impl SubmissionResponse {
    pub fn submitted() -> Self {
        Self { success: true, message: "Your information has been successfully submitted".into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn confirmation_json(program: &str) -> String {
        format!(
            r#"{{
                "userInfo": {{"firstName":"Ada","lastName":"Lovelace","address":"123 Main St","city":"Springfield","state":"IL","zipCode":"62704"}},
                "recommendedAddress": "123 MAIN ST, SPRINGFIELD, IL, 62704",
                "utilityCompany": {{"name":"Ameren","zipCode":"62704"}},
                "assistanceProgram": "{program}"
            }}"#
        )
    }

    #[test]
    fn assistance_program_limited_to_known_values() {
        for ok in ["SNAP", "Medicaid", "None"] {
            let d: ConfirmationData = serde_json::from_str(&confirmation_json(ok)).unwrap();
            assert_eq!(d.assistance_program.as_str(), ok);
        }
        assert!(serde_json::from_str::<ConfirmationData>(&confirmation_json("WIC")).is_err());
        assert!(serde_json::from_str::<ConfirmationData>(&confirmation_json("snap")).is_err());
    }

    #[test]
    fn record_is_snake_case_with_utc_timestamp() {
        let d: ConfirmationData = serde_json::from_str(&confirmation_json("SNAP")).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let rec = SubmissionRecord::from_confirmation(d, at);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T12:30:00.000000Z");
        assert_eq!(json["user_info"]["first_name"], "Ada");
        assert_eq!(json["user_info"]["zip_code"], "62704");
        assert_eq!(json["utility_company"], serde_json::json!({"name":"Ameren","zip_code":"62704"}));
        assert_eq!(json["assistance_program"], "SNAP");
    }

    #[test]
    fn validate_requires_names() {
        let mut d: ConfirmationData = serde_json::from_str(&confirmation_json("None")).unwrap();
        assert!(d.validate().is_ok());
        d.user_info.first_name = "  ".into();
        assert!(d.validate().is_err());
    }
}
