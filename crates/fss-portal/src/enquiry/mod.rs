//! Enquiry workflow: public form submission and admin management.

mod board;
mod form;
mod validation;
mod workflow;

pub use board::{DeleteConfirmation, EnquiryBoard};
pub use form::{
    DEFAULT_SUCCESS_DISPLAY, EnquiryFormController, FormPhase, SUBMIT_FAILED_MESSAGE,
    SubmitOutcome,
};
pub use validation::{
    EnquiryForm, FormField, MIN_MESSAGE_CHARS, MIN_NAME_CHARS, validate, validate_field,
};
pub use workflow::EnquiryWorkflow;
