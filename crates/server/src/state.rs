use std::sync::Arc;

use service::runtime::Services;
use service::{geocoding::AddressValidator, submission::SubmissionService, utility_cache::UtilityCache};

/// Shared handler state; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<AddressValidator>,
    pub utilities: Arc<UtilityCache>,
    pub submissions: Arc<SubmissionService>,
}

impl From<Services> for AppState {
    fn from(s: Services) -> Self {
        Self { validator: s.validator, utilities: s.utilities, submissions: s.submissions }
    }
}
