//! Dashboard API.
//!
//! Report bodies are shaped by the server and returned as JSON values.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{AnalyticsQuery, ExportQuery};

/// Dashboard API client. Every call requires a signed-in admin.
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Headline figures for the dashboard landing view.
    pub async fn overview(&self) -> Result<Value> {
        self.client.get("dashboard/overview").await
    }

    /// Enquiry analytics over a date window.
    pub async fn analytics(&self, query: &AnalyticsQuery) -> Result<Value> {
        self.client.get_with_query("dashboard/analytics", query).await
    }

    /// Response-time and conversion figures.
    pub async fn performance(&self) -> Result<Value> {
        self.client.get("dashboard/performance").await
    }

    /// Export enquiries matching the selection.
    pub async fn export(&self, query: &ExportQuery) -> Result<Value> {
        self.client.get_with_query("dashboard/export", query).await
    }
}
