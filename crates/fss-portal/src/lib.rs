//! Client-side core of the FSS portal.
//!
//! Builds on [`fss_client`] to provide the pieces a front end needs:
//!
//! - [`SessionManager`]: loading, anonymous or authenticated, kept in step
//!   with the client's session signals.
//! - [`enquiry`]: validation and submission of the public enquiry form, and
//!   the admin board that lists and edits enquiries.
//! - [`routes`]: typed routes and the guard that keeps protected views
//!   behind a live session.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fss_client::ApiClient;
//! use fss_portal::{Decision, Navigator, SessionManager};
//!
//! # async fn example() -> fss_client::Result<()> {
//! let client = ApiClient::builder().build()?;
//! let session = Arc::new(SessionManager::new(client));
//! session.initialize();
//!
//! let navigator = Navigator::new(session);
//! if let Decision::Redirect(route) = navigator.navigate("/admin/dashboard") {
//!     println!("please sign in at {}", route);
//! }
//! # Ok(())
//! # }
//! ```

pub mod enquiry;
pub mod routes;
pub mod session;

#[cfg(test)]
mod testing;

pub use enquiry::{
    DeleteConfirmation, EnquiryBoard, EnquiryForm, EnquiryFormController, EnquiryWorkflow,
    FormField, FormPhase, SubmitOutcome, validate,
};
pub use routes::{Decision, Navigator, Route, ServicePage, View, guard};
pub use session::{Credentials, SessionManager, SessionStatus};
