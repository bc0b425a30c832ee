use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct AddressQueryDoc {
    pub address: String,
    pub city: String,
    /// 2-letter state code, any case
    pub state: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
}

#[derive(Serialize, ToSchema)]
pub struct CoordinatesDoc { pub latitude: f64, pub longitude: f64 }

#[derive(Serialize, ToSchema)]
pub struct ValidatedAddressDoc {
    #[serde(rename = "matchedAddress")]
    pub matched_address: String,
    pub coordinates: CoordinatesDoc,
    #[serde(rename = "isValid")]
    pub is_valid: bool,
}

#[derive(Serialize, ToSchema)]
pub struct UtilityCompanyDoc {
    pub name: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
    pub service_area: Option<String>,
    pub contact_info: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UserInfoDoc {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
}

#[derive(Serialize, ToSchema)]
pub enum AssistanceProgramDoc {
    #[serde(rename = "SNAP")]
    Snap,
    Medicaid,
    None,
}

#[derive(Serialize, ToSchema)]
pub struct ConfirmationDataDoc {
    #[serde(rename = "userInfo")]
    pub user_info: UserInfoDoc,
    #[serde(rename = "recommendedAddress")]
    pub recommended_address: String,
    #[serde(rename = "utilityCompany")]
    pub utility_company: UtilityCompanyDoc,
    #[serde(rename = "assistanceProgram")]
    pub assistance_program: AssistanceProgramDoc,
}

#[derive(Serialize, ToSchema)]
pub struct SubmissionResponseDoc { pub success: bool, pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::address::validate_address,
        crate::routes::utility::get_utility_company,
        crate::routes::submission::submit_subscriber,
        crate::routes::admin::clear_utility_cache,
    ),
    components(
        schemas(
            HealthResponse,
            AddressQueryDoc,
            CoordinatesDoc,
            ValidatedAddressDoc,
            UtilityCompanyDoc,
            UserInfoDoc,
            AssistanceProgramDoc,
            ConfirmationDataDoc,
            SubmissionResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "address"),
        (name = "utility"),
        (name = "submission"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
