//! Enquiry form controller.
//!
//! One controller backs one open form. It owns the typed values, the field
//! error set and the submission phase, and guarantees:
//!
//! - at most one submission in flight; further submits are ignored,
//! - user input survives every failure,
//! - a successful submission closes the form once, after the configured
//!   display duration,
//! - nothing is applied after [`EnquiryFormController::teardown`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use fss_client::{Enquiry, Error, NETWORK_ERROR_MESSAGE, ValidationErrors};
use parking_lot::Mutex;
use tokio::task::AbortHandle;

use super::validation::{EnquiryForm, FormField, validate};
use super::workflow::EnquiryWorkflow;

/// Default time the success state stays visible.
pub const DEFAULT_SUCCESS_DISPLAY: Duration = Duration::from_millis(2000);

/// Notice shown when the server rejected or failed the submission.
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit enquiry. Please try again.";

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Submitting,
    Succeeded,
    Closed,
    Failed { notice: String, retryable: bool },
}

impl FormPhase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, FormPhase::Submitting)
    }
}

/// Result of a call to [`EnquiryFormController::submit`].
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The enquiry was created; the form is showing its success state.
    Created(Enquiry),
    /// Field errors, local or from the server. Input is kept.
    Rejected(ValidationErrors),
    /// The request failed; the form is in [`FormPhase::Failed`].
    Failed(Error),
    /// Another submission is in flight, or the form is not editable.
    Ignored,
    /// The form was torn down while the request was pending.
    Discarded,
}

type CloseCallback = Arc<dyn Fn() + Send + Sync>;

struct FormState {
    values: EnquiryForm,
    errors: ValidationErrors,
    phase: FormPhase,
    torn_down: bool,
}

struct Shared {
    state: Mutex<FormState>,
    close_timer: Mutex<Option<AbortHandle>>,
    on_close: Mutex<Option<CloseCallback>>,
}

impl Shared {
    /// Move to `Closed` and notify, if the form is in a closable phase.
    fn close_from(&self, expected: impl Fn(&FormPhase) -> bool) -> bool {
        {
            let mut state = self.state.lock();
            if state.torn_down || !expected(&state.phase) {
                return false;
            }
            state.values = EnquiryForm::default();
            state.errors.clear();
            state.phase = FormPhase::Closed;
        }

        let callback = self.on_close.lock().clone();
        if let Some(callback) = callback {
            callback();
        }
        true
    }

    fn cancel_timer(&self) {
        if let Some(handle) = self.close_timer.lock().take() {
            handle.abort();
        }
    }
}

/// Drives one enquiry form.
pub struct EnquiryFormController {
    workflow: EnquiryWorkflow,
    success_display: Duration,
    shared: Arc<Shared>,
}

impl fmt::Debug for EnquiryFormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnquiryFormController")
            .field("phase", &self.phase())
            .field("success_display", &self.success_display)
            .finish_non_exhaustive()
    }
}

impl EnquiryFormController {
    pub fn new(workflow: EnquiryWorkflow) -> Self {
        Self {
            workflow,
            success_display: DEFAULT_SUCCESS_DISPLAY,
            shared: Arc::new(Shared {
                state: Mutex::new(FormState {
                    values: EnquiryForm::default(),
                    errors: ValidationErrors::new(),
                    phase: FormPhase::Editing,
                    torn_down: false,
                }),
                close_timer: Mutex::new(None),
                on_close: Mutex::new(None),
            }),
        }
    }

    /// Set how long the success state is shown before the form closes.
    pub fn with_success_display(mut self, duration: Duration) -> Self {
        self.success_display = duration;
        self
    }

    /// Register the callback invoked whenever the form closes.
    pub fn on_close<F>(self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.shared.on_close.lock() = Some(Arc::new(callback));
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // State accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn phase(&self) -> FormPhase {
        self.shared.state.lock().phase.clone()
    }

    pub fn values(&self) -> EnquiryForm {
        self.shared.state.lock().values.clone()
    }

    pub fn errors(&self) -> ValidationErrors {
        self.shared.state.lock().errors.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.shared.state.lock().phase.is_submitting()
    }

    // ─────────────────────────────────────────────────────────────────────
    // User actions
    // ─────────────────────────────────────────────────────────────────────

    /// Reopen a closed form for editing.
    pub fn open(&self) {
        let mut state = self.shared.state.lock();
        if state.phase == FormPhase::Closed {
            state.phase = FormPhase::Editing;
        }
    }

    /// Edit one field. Clears that field's error and leaves a failure notice
    /// behind. Returns `false` when the form is not editable.
    pub fn set_field(&self, field: FormField, value: impl Into<String>) -> bool {
        let mut state = self.shared.state.lock();
        if state.torn_down {
            return false;
        }
        match state.phase {
            FormPhase::Submitting | FormPhase::Succeeded => return false,
            FormPhase::Failed { .. } | FormPhase::Closed => state.phase = FormPhase::Editing,
            FormPhase::Editing => {}
        }
        state.values.set(field, value);
        state.errors.remove(field.as_str());
        true
    }

    /// Replace all values at once.
    pub fn fill(&self, form: EnquiryForm) -> bool {
        FormField::ALL
            .into_iter()
            .all(|field| self.set_field(field, form.get(field)))
    }

    /// Dismiss the form. Refused while a submission is in flight.
    pub fn close(&self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.shared.cancel_timer();
        self.shared.close_from(|phase| *phase != FormPhase::Closed)
    }

    /// Submit the current values.
    pub async fn submit(&self) -> SubmitOutcome {
        let values = {
            let mut state = self.shared.state.lock();
            if state.torn_down {
                return SubmitOutcome::Ignored;
            }
            match state.phase {
                FormPhase::Editing | FormPhase::Failed { .. } => {}
                FormPhase::Submitting => {
                    tracing::debug!("Submission already in flight; ignoring");
                    return SubmitOutcome::Ignored;
                }
                FormPhase::Succeeded | FormPhase::Closed => return SubmitOutcome::Ignored,
            }

            let errors = validate(&state.values);
            if !errors.is_empty() {
                state.errors = errors.clone();
                state.phase = FormPhase::Editing;
                return SubmitOutcome::Rejected(errors);
            }

            state.phase = FormPhase::Submitting;
            state.values.clone()
        };

        let result = self.workflow.submit(&values).await;

        let mut state = self.shared.state.lock();
        if state.torn_down {
            tracing::debug!("Form torn down before the response arrived; discarding");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(enquiry) => {
                state.values = EnquiryForm::default();
                state.errors.clear();
                state.phase = FormPhase::Succeeded;
                drop(state);
                self.schedule_close();
                SubmitOutcome::Created(enquiry)
            }
            Err(Error::Validation { errors, .. }) => {
                state.errors.merge(&errors);
                state.phase = FormPhase::Editing;
                SubmitOutcome::Rejected(state.errors.clone())
            }
            Err(e) => {
                let notice = match &e {
                    Error::Network { .. } => NETWORK_ERROR_MESSAGE.to_string(),
                    _ => SUBMIT_FAILED_MESSAGE.to_string(),
                };
                state.phase = FormPhase::Failed {
                    notice,
                    retryable: e.is_retryable(),
                };
                tracing::warn!(kind = %e.kind(), "Enquiry submission failed");
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Stop all pending work. Later responses are discarded and the close
    /// callback will not fire.
    pub fn teardown(&self) {
        self.shared.state.lock().torn_down = true;
        self.shared.cancel_timer();
    }

    fn schedule_close(&self) {
        let shared = Arc::clone(&self.shared);
        let delay = self.success_display;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.close_timer.lock().take();
            shared.close_from(|phase| *phase == FormPhase::Succeeded);
        });

        self.shared.cancel_timer();
        *self.shared.close_timer.lock() = Some(task.abort_handle());
    }
}

impl Drop for EnquiryFormController {
    fn drop(&mut self) {
        self.teardown();
    }
}
