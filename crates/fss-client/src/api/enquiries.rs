//! Enquiries API.

use crate::client::ApiClient;
use crate::error::Result;
use crate::types::{
    AddNoteRequest, CreateEnquiryRequest, Enquiry, EnquiryFilters, EnquiryPage, EnquiryStats,
    EnquiryStatus, Priority, UpdatePriorityRequest, UpdateStatusRequest,
};

/// Enquiries API client.
pub struct EnquiriesApi {
    client: ApiClient,
}

impl EnquiriesApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submit a new enquiry. Public; no session required.
    pub async fn create(&self, request: &CreateEnquiryRequest) -> Result<Enquiry> {
        self.client.post("enquiries", request).await
    }

    /// List enquiries matching the filters.
    pub async fn list(&self, filters: &EnquiryFilters) -> Result<EnquiryPage> {
        self.client.get_with_query("enquiries", filters).await
    }

    /// Get an enquiry by ID.
    pub async fn get(&self, id: &str) -> Result<Enquiry> {
        self.client.get(&format!("enquiries/{}", id)).await
    }

    /// Move an enquiry to a new status.
    pub async fn update_status(
        &self,
        id: &str,
        status: EnquiryStatus,
        reason: Option<&str>,
    ) -> Result<()> {
        self.client
            .patch_unit(
                &format!("enquiries/{}/status", id),
                &UpdateStatusRequest { status, reason },
            )
            .await
    }

    /// Change an enquiry's priority.
    pub async fn update_priority(&self, id: &str, priority: Priority) -> Result<()> {
        self.client
            .patch_unit(
                &format!("enquiries/{}", id),
                &UpdatePriorityRequest { priority },
            )
            .await
    }

    /// Attach a note to an enquiry.
    pub async fn add_note(&self, id: &str, note: &str, is_private: bool) -> Result<()> {
        self.client
            .post_unit(
                &format!("enquiries/{}/notes", id),
                &AddNoteRequest { note, is_private },
            )
            .await
    }

    /// Delete an enquiry.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("enquiries/{}", id)).await
    }

    /// Aggregate counts.
    pub async fn stats(&self) -> Result<EnquiryStats> {
        self.client.get("enquiries/stats").await
    }
}
