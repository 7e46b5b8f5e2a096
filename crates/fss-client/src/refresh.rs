//! Bearer attachment and one-shot refresh-and-retry.
//!
//! [`RefreshStage`] wraps a [`Transport`]. It attaches the stored access token
//! to every non-issuance request and, when such a request comes back 401,
//! exchanges the refresh token for a new access token and re-issues the
//! request exactly once. When no usable refresh token exists, or the exchange
//! fails, the session is terminated: the token store is cleared and
//! [`SessionSignal::Terminated`] is published.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::token_store::{TokenStore, is_expired};
use crate::transport::{ApiRequest, RawResponse, Transport};
use crate::types::{RefreshRequest, RefreshResponse};

/// Session lifecycle notifications published by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// Credentials were issued (login).
    Active,
    /// No valid credential remains; consumers must treat the user as logged
    /// out.
    Terminated,
}

/// Why a refresh could not produce a new access token.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RefreshFailure {
    Missing,
    Expired,
    Unreachable(String),
    Rejected(u16),
    Malformed,
}

impl RefreshFailure {
    fn describe(&self) -> String {
        match self {
            RefreshFailure::Missing => "no refresh token".to_string(),
            RefreshFailure::Expired => "refresh token expired".to_string(),
            RefreshFailure::Unreachable(e) => format!("refresh endpoint unreachable: {}", e),
            RefreshFailure::Rejected(status) => format!("refresh rejected with {}", status),
            RefreshFailure::Malformed => "refresh response missing access token".to_string(),
        }
    }
}

/// Request pipeline stage owning all token writes triggered by requests.
#[derive(Debug)]
pub struct RefreshStage {
    transport: Arc<dyn Transport>,
    tokens: TokenStore,
    signals: watch::Sender<SessionSignal>,
}

impl RefreshStage {
    pub fn new(transport: Arc<dyn Transport>, tokens: TokenStore) -> Self {
        let initial = if tokens.access_token().is_some() {
            SessionSignal::Active
        } else {
            SessionSignal::Terminated
        };
        let (signals, _) = watch::channel(initial);
        Self {
            transport,
            tokens,
            signals,
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Receive session signals. The receiver sees only changes published
    /// after this call.
    pub fn subscribe(&self) -> watch::Receiver<SessionSignal> {
        self.signals.subscribe()
    }

    pub(crate) fn publish(&self, signal: SessionSignal) {
        self.signals.send_replace(signal);
    }

    /// Clear credentials and announce the session is over.
    pub(crate) fn terminate(&self, reason: &str) {
        tracing::warn!(reason, "Session terminated");
        self.tokens.clear();
        self.publish(SessionSignal::Terminated);
    }

    /// Send one request through the transport, mapping transport failures.
    async fn send(&self, request: &ApiRequest, bearer: Option<&str>) -> Result<RawResponse> {
        tracing::debug!(
            method = %request.method(),
            path = request.path(),
            retried = request.is_retried(),
            "API request"
        );

        match self.transport.send(request, bearer).await {
            Ok(response) => {
                tracing::debug!(
                    status = response.status,
                    path = request.path(),
                    "API response"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(path = request.path(), error = %e, "API request failed");
                Err(Error::network())
            }
        }
    }

    /// Execute a request, refreshing and retrying once on 401.
    ///
    /// Non-2xx responses other than the handled 401 are returned as-is for
    /// the caller to classify.
    pub async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let mut request = request;

        let bearer = if request.is_issuance() {
            None
        } else {
            self.tokens.access_token()
        };

        let response = self.send(&request, bearer.as_deref()).await?;

        if !response.is_unauthorized() || request.is_issuance() || request.is_retried() {
            return Ok(response);
        }

        request.mark_retried();

        let access_token = match self.refresh_access_token().await {
            Ok(token) => token,
            Err(failure) => {
                self.terminate(&failure.describe());
                return Err(Error::SessionExpired);
            }
        };

        let retried = self.send(&request, Some(&access_token)).await?;
        if retried.is_unauthorized() {
            self.terminate("request rejected after refresh");
            return Err(Error::SessionExpired);
        }

        Ok(retried)
    }

    /// Refresh explicitly, terminating the session on failure.
    pub async fn refresh(&self) -> Result<String> {
        match self.refresh_access_token().await {
            Ok(token) => Ok(token),
            Err(failure) => {
                self.terminate(&failure.describe());
                Err(Error::SessionExpired)
            }
        }
    }

    /// Exchange the stored refresh token for a new access token and persist
    /// it.
    async fn refresh_access_token(&self) -> std::result::Result<String, RefreshFailure> {
        let refresh_token = self.tokens.refresh_token().ok_or(RefreshFailure::Missing)?;
        if is_expired(&refresh_token) {
            return Err(RefreshFailure::Expired);
        }

        let request = ApiRequest::post("auth/refresh")
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .map_err(|_| RefreshFailure::Malformed)?;

        tracing::debug!("Refreshing access token");
        let response = self
            .transport
            .send(&request, None)
            .await
            .map_err(|e| RefreshFailure::Unreachable(e.to_string()))?;

        if !response.is_success() {
            return Err(RefreshFailure::Rejected(response.status));
        }

        let body: RefreshResponse =
            serde_json::from_slice(&response.body).map_err(|_| RefreshFailure::Malformed)?;
        if body.access_token.is_empty() {
            return Err(RefreshFailure::Malformed);
        }

        self.tokens.set_access_token(&body.access_token);
        if let Some(rotated) = body.refresh_token.as_deref().filter(|t| !t.is_empty()) {
            self.tokens.set_refresh_token(rotated);
        }

        tracing::info!("Access token refreshed");
        Ok(body.access_token)
    }
}
