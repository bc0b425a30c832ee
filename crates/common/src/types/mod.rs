use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body of the `GET /` liveness probe.
#[derive(Serialize, Debug)]
pub struct RootStatus {
    pub status: &'static str,
    pub message: &'static str,
}

impl RootStatus {
    pub fn running() -> Self {
        Self { status: "healthy", message: "Customer Registration API is running" }
    }
}
