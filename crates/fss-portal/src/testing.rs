//! Test doubles shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use fss_client::transport::{ApiRequest, RawResponse, Transport, TransportError};
use parking_lot::Mutex;
use serde_json::Value;

#[derive(Debug, Clone)]
enum Reply {
    Json(u16, Value),
    Unreachable,
}

/// Transport answering from a table keyed by `"METHOD path"` or `"path"`.
///
/// Unknown routes answer `200 {}`.
#[derive(Debug, Default)]
pub(crate) struct StubTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
}

impl StubTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, route: &str, status: u16, body: Value) {
        self.replies
            .lock()
            .insert(route.to_string(), Reply::Json(status, body));
    }

    pub(crate) fn unreachable(&self, route: &str) {
        self.replies
            .lock()
            .insert(route.to_string(), Reply::Unreachable);
    }

    /// Hold every response for `delay` (tokio time, so paused clocks apply).
    pub(crate) fn delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        _bearer: Option<&str>,
    ) -> Result<RawResponse, TransportError> {
        let call = format!("{} {}", request.method(), request.path());
        self.calls.lock().push(call.clone());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = {
            let replies = self.replies.lock();
            replies
                .get(&call)
                .or_else(|| replies.get(request.path()))
                .cloned()
        };

        match reply {
            Some(Reply::Json(status, body)) => {
                Ok(RawResponse::new(status, body.to_string().into_bytes()))
            }
            Some(Reply::Unreachable) => Err(TransportError::Connect("connection refused".into())),
            None => Ok(RawResponse::new(200, b"{}".to_vec())),
        }
    }
}

/// Unsigned token expiring `offset_secs` from now.
pub(crate) fn token_with_offset(offset_secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + offset_secs;
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::json!({"sub": "admin-1", "exp": exp}).to_string());
    format!("{}.{}.sig", header, payload)
}

pub(crate) fn stale_token() -> String {
    token_with_offset(-3600)
}
