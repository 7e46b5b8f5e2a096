//! Health API.

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::HealthResponse;

/// Health API client.
///
/// Note: the health endpoint does not require authentication.
pub struct HealthApi {
    client: ApiClient,
}

impl HealthApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Check basic health.
    pub async fn check(&self) -> Result<HealthResponse> {
        self.client.get("health").await
    }

    /// Simple connectivity check - returns true if the API is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.check().await.is_ok()
    }
}
