//! Client error types.
//!
//! Every failed request is classified into exactly one of the request kinds
//! below. Transport exceptions never escape the client: they surface as
//! [`Error::Network`] with a fixed, user-presentable message.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown for any failure where no HTTP response was received.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred. Please check your connection.";

/// Client error type.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The server (or local validation) rejected one or more fields.
    #[error("{message}")]
    Validation {
        /// Summary message.
        message: String,
        /// Field name to human-readable message.
        errors: ValidationErrors,
    },

    /// Server returned a non-2xx response without field detail.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from server.
        message: String,
    },

    /// No response was received (timeout, connectivity).
    #[error("{message}")]
    Network {
        /// Generic connectivity notice.
        message: String,
    },

    /// No valid credential remains; the session was terminated.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Discriminant of [`Error`], matching the wire-level taxonomy names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Api,
    Network,
    SessionExpired,
    Config,
}

impl ErrorKind {
    /// Stable identifier for logs and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Api => "API_ERROR",
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::SessionExpired => "SESSION_EXPIRED",
            ErrorKind::Config => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Build a network error carrying the generic connectivity notice.
    pub fn network() -> Self {
        Error::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    /// Build a validation error from a local error set.
    pub fn validation(errors: ValidationErrors) -> Self {
        Error::Validation {
            message: "Please correct the highlighted fields.".to_string(),
            errors,
        }
    }

    /// The taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Api { .. } => ErrorKind::Api,
            Error::Network { .. } => ErrorKind::Network,
            Error::SessionExpired => ErrorKind::SessionExpired,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    /// Check if this is a field-level validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Check if the session was terminated.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::SessionExpired)
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network { .. } => true,
            Error::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Field errors, when this is a validation error.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Classify a non-2xx response.
    ///
    /// A 400 carrying a non-empty `errors` list becomes [`Error::Validation`];
    /// everything else becomes [`Error::Api`].
    pub(crate) fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|p| p.message.clone())
            .unwrap_or_else(|| format!("HTTP {}", status));

        if status == 400
            && let Some(errors) = parsed.and_then(|p| p.errors)
            && !errors.is_empty()
        {
            return Error::Validation {
                message,
                errors: errors
                    .into_iter()
                    .map(|e| (e.field, e.message))
                    .collect(),
            };
        }

        Error::Api { status, message }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error response body from the server.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
}

/// One entry of a structured validation failure.
#[derive(Debug, Deserialize)]
pub(crate) struct FieldError {
    pub field: String,
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// ValidationErrors
// ─────────────────────────────────────────────────────────────────────────────

/// Mapping from field name to a human-readable message.
///
/// Ordered by field name so rendering is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Merge another set into this one. Entries from `other` win.
    pub fn merge(&mut self, other: &ValidationErrors) {
        for (field, message) in other.iter() {
            self.0.insert(field.to_string(), message.to_string());
        }
    }

    /// Field names with errors, in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_becomes_field_errors() {
        let body = br#"{"message":"Validation failed","errors":[{"field":"email","message":"Email is invalid"},{"field":"phone","message":"Phone is invalid"}]}"#;
        let err = Error::from_response(400, body);

        assert_eq!(err.kind(), ErrorKind::Validation);
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.get("email"), Some("Email is invalid"));
        assert_eq!(fields.get("phone"), Some("Phone is invalid"));
        assert_eq!(err.to_string(), "Validation failed");
    }

    #[test]
    fn test_bad_request_without_errors_is_api_error() {
        let err = Error::from_response(400, br#"{"message":"Bad input"}"#);
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad input");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_request_with_empty_errors_is_api_error() {
        let err = Error::from_response(400, br#"{"message":"Invalid enquiry","errors":[]}"#);
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.field_errors().is_none());
        assert_eq!(err.to_string(), "API error (400): Invalid enquiry");
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status() {
        let err = Error::from_response(502, b"<html>gateway</html>");
        assert_eq!(err.to_string(), "API error (502): HTTP 502");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_network_error_uses_generic_message() {
        let err = Error::network();
        assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
        assert_eq!(err.kind().as_str(), "NETWORK_ERROR");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_predicates() {
        assert!(Error::SessionExpired.is_session_expired());
        assert!(!Error::SessionExpired.is_retryable());
        assert!(
            Error::Api {
                status: 404,
                message: "gone".into()
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_merge_prefers_incoming_messages() {
        let mut local: ValidationErrors = [("name", "Name is required"), ("email", "local")]
            .into_iter()
            .collect();
        let server: ValidationErrors = [("email", "Email already used"), ("phone", "bad")]
            .into_iter()
            .collect();

        local.merge(&server);

        assert_eq!(local.len(), 3);
        assert_eq!(local.get("email"), Some("Email already used"));
        assert_eq!(local.fields().collect::<Vec<_>>(), vec!["email", "name", "phone"]);
    }
}
