//! Admin enquiry board.
//!
//! Holds the list an admin is looking at. Every change to a displayed
//! enquiry is applied only after the server confirms it, and any session
//! expiry wipes the list so nothing stale stays on screen.

use fss_client::{
    ApiClient, Enquiry, EnquiryFilters, EnquiryNote, EnquiryStats, EnquiryStatus, Priority,
    Result,
};

/// Proof that the user confirmed a deletion.
///
/// Only [`EnquiryBoard::request_delete`] creates one, and
/// [`EnquiryBoard::delete`] consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a deletion only happens when the confirmation is passed to `delete`"]
pub struct DeleteConfirmation {
    id: String,
}

impl DeleteConfirmation {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// The enquiry list shown on the admin dashboard.
#[derive(Debug)]
pub struct EnquiryBoard {
    client: ApiClient,
    enquiries: Vec<Enquiry>,
    total: u64,
    filters: EnquiryFilters,
}

impl EnquiryBoard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            enquiries: Vec::new(),
            total: 0,
            filters: EnquiryFilters::default(),
        }
    }

    pub fn enquiries(&self) -> &[Enquiry] {
        &self.enquiries
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn filters(&self) -> &EnquiryFilters {
        &self.filters
    }

    pub fn find(&self, id: &str) -> Option<&Enquiry> {
        self.enquiries.iter().find(|e| e.id == id)
    }

    /// Fetch a fresh page and replace the displayed list.
    pub async fn list(&mut self, filters: EnquiryFilters) -> Result<&[Enquiry]> {
        let result = self.client.enquiries().list(&filters).await;
        let page = self.settle(result)?;

        tracing::debug!(count = page.enquiries.len(), total = page.total, "Loaded enquiries");
        self.enquiries = page.enquiries;
        self.total = page.total;
        self.filters = filters;
        Ok(&self.enquiries)
    }

    /// Re-run the last listing.
    pub async fn reload(&mut self) -> Result<&[Enquiry]> {
        let filters = self.filters.clone();
        self.list(filters).await
    }

    /// Fetch one enquiry, updating the displayed copy if present.
    pub async fn get(&mut self, id: &str) -> Result<Enquiry> {
        let result = self.client.enquiries().get(id).await;
        let enquiry = self.settle(result)?;
        if let Some(shown) = self.enquiries.iter_mut().find(|e| e.id == enquiry.id) {
            *shown = enquiry.clone();
        }
        Ok(enquiry)
    }

    /// Change an enquiry's status once the server accepts it.
    pub async fn update_status(
        &mut self,
        id: &str,
        status: EnquiryStatus,
        reason: Option<&str>,
    ) -> Result<()> {
        let result = self
            .client
            .enquiries()
            .update_status(id, status, reason)
            .await;
        self.settle(result)?;

        if let Some(shown) = self.find_mut(id) {
            shown.status = status;
        }
        tracing::info!(id, %status, "Enquiry status updated");
        Ok(())
    }

    /// Change an enquiry's priority once the server accepts it.
    pub async fn update_priority(&mut self, id: &str, priority: Priority) -> Result<()> {
        let result = self.client.enquiries().update_priority(id, priority).await;
        self.settle(result)?;

        if let Some(shown) = self.find_mut(id) {
            shown.priority = priority;
        }
        tracing::info!(id, %priority, "Enquiry priority updated");
        Ok(())
    }

    /// Ask for a deletion. The returned confirmation must be passed to
    /// [`delete`](Self::delete) for the request to be issued.
    pub fn request_delete(&self, id: impl Into<String>) -> DeleteConfirmation {
        DeleteConfirmation { id: id.into() }
    }

    /// Delete a confirmed enquiry. The list is untouched on failure.
    pub async fn delete(&mut self, confirmation: DeleteConfirmation) -> Result<()> {
        let id = confirmation.id;
        let result = self.client.enquiries().delete(&id).await;
        self.settle(result)?;

        let before = self.enquiries.len();
        self.enquiries.retain(|e| e.id != id);
        if self.enquiries.len() < before {
            self.total = self.total.saturating_sub(1);
        }
        tracing::info!(id = %id, "Enquiry deleted");
        Ok(())
    }

    /// Attach a note, mirrored locally once accepted.
    pub async fn add_note(&mut self, id: &str, note: &str, is_private: bool) -> Result<()> {
        let result = self.client.enquiries().add_note(id, note, is_private).await;
        self.settle(result)?;

        if let Some(shown) = self.find_mut(id) {
            shown.notes.push(EnquiryNote {
                note: note.to_string(),
                is_private,
                created_at: None,
            });
        }
        Ok(())
    }

    pub async fn stats(&mut self) -> Result<EnquiryStats> {
        let result = self.client.enquiries().stats().await;
        self.settle(result)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Enquiry> {
        self.enquiries.iter_mut().find(|e| e.id == id)
    }

    /// Pass a result through, dropping the displayed data if the session died.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result
            && e.is_session_expired()
        {
            tracing::warn!("Session expired; clearing enquiry board");
            self.enquiries.clear();
            self.total = 0;
        }
        result
    }
}
