//! Public enquiry submission.

use fss_client::{ApiClient, Enquiry, Error, Result};

use super::validation::EnquiryForm;

/// Submits enquiries from the public site.
#[derive(Debug, Clone)]
pub struct EnquiryWorkflow {
    client: ApiClient,
}

impl EnquiryWorkflow {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Validate and submit a form.
    ///
    /// Local validation failures return [`Error::Validation`] without any
    /// network call.
    pub async fn submit(&self, form: &EnquiryForm) -> Result<Enquiry> {
        let request = form.to_request().map_err(|errors| {
            tracing::debug!(fields = errors.len(), "Enquiry rejected by local validation");
            Error::validation(errors)
        })?;

        let enquiry = self.client.enquiries().create(&request).await?;
        tracing::info!(id = %enquiry.id, service = %enquiry.service, "Enquiry submitted");
        Ok(enquiry)
    }
}
