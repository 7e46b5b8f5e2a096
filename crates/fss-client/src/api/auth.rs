//! Auth API.
//!
//! Login is the only place credentials enter the token store from outside
//! the refresh stage.

use crate::client::ApiClient;
use crate::error::Result;
use crate::refresh::SessionSignal;
use crate::types::{LoginRequest, LoginResponse, SetupAdminRequest, User};

/// Auth API client.
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for tokens and persist them.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.client.post("auth/login", &request).await?;

        let tokens = self.client.tokens();
        tokens.set_access_token(&response.access_token);
        tokens.set_refresh_token(&response.refresh_token);
        if let Some(admin) = &response.admin {
            tokens.set_user(admin);
        }
        self.client.stage().publish(SessionSignal::Active);

        tracing::info!(email, "Logged in");
        Ok(response)
    }

    /// Tell the server the session is over, then clear local credentials.
    ///
    /// Local state is cleared even when the server call fails.
    pub async fn logout(&self) {
        if let Err(e) = self.client.post_unit("auth/logout", &serde_json::json!({})).await {
            tracing::debug!(error = %e, "Server logout failed; clearing local session anyway");
        }
        self.client.end_session();
    }

    /// Obtain a new access token from the stored refresh token.
    pub async fn refresh(&self) -> Result<String> {
        self.client.stage().refresh().await
    }

    /// Fetch the current admin's profile.
    pub async fn profile(&self) -> Result<User> {
        self.client.get("auth/profile").await
    }

    /// Create the first admin account.
    pub async fn setup(&self, request: &SetupAdminRequest) -> Result<User> {
        self.client.post("auth/setup", request).await
    }
}
