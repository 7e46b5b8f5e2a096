//! Email API.
//!
//! These calls ask the server to send mail; nothing is delivered from here.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{CustomEmailRequest, TestEmailRequest};

/// Email API client. Every call requires a signed-in admin.
pub struct EmailApi {
    client: ApiClient,
}

impl EmailApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Mail service configuration and health.
    pub async fn status(&self) -> Result<Value> {
        self.client.get("emails/status").await
    }

    /// Send a test message to `address`.
    pub async fn test(&self, address: &str) -> Result<Value> {
        self.client
            .post("emails/test", &TestEmailRequest { test_email: address })
            .await
    }

    /// Send a one-off message.
    pub async fn send_custom(&self, request: &CustomEmailRequest) -> Result<Value> {
        self.client.post("emails/custom", request).await
    }

    /// Remind customers whose enquiries are awaiting follow-up.
    pub async fn send_follow_up_reminders(&self) -> Result<Value> {
        self.client.post_empty("emails/follow-up-reminders").await
    }

    /// Send the weekly summary to admins.
    pub async fn send_weekly_report(&self) -> Result<Value> {
        self.client.post_empty("emails/weekly-report").await
    }
}
