//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use url::Url;

use crate::api::{AuthApi, DashboardApi, EmailApi, EnquiriesApi, HealthApi};
use crate::error::{Error, Result};
use crate::refresh::{RefreshStage, SessionSignal};
use crate::storage::{MemoryStorage, Storage};
use crate::token_store::TokenStore;
use crate::transport::{ApiRequest, HttpTransport, RawResponse, Transport};
use crate::types::User;

/// Default API origin.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Default timeout for requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// FSS API client.
///
/// Cheap to clone; clones share the token store, transport and session
/// signal channel.
///
/// # Example
///
/// ```no_run
/// use fss_client::{ApiClient, EnquiryFilters};
///
/// # async fn example() -> fss_client::Result<()> {
/// let client = ApiClient::builder()
///     .base_url("http://localhost:5000/api")
///     .build()?;
///
/// client.auth().login("admin@example.com", "secret").await?;
/// let page = client.enquiries().list(&EnquiryFilters::default()).await?;
/// println!("{} enquiries", page.total);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    stage: RefreshStage,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Read-only access to stored credentials.
    pub fn tokens(&self) -> &TokenStore {
        self.inner.stage.tokens()
    }

    /// Subscribe to session lifecycle signals.
    pub fn subscribe(&self) -> watch::Receiver<SessionSignal> {
        self.inner.stage.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the enquiries API.
    pub fn enquiries(&self) -> EnquiriesApi {
        EnquiriesApi::new(self.clone())
    }

    /// Access the dashboard API.
    pub fn dashboard(&self) -> DashboardApi {
        DashboardApi::new(self.clone())
    }

    /// Access the email API.
    pub fn emails(&self) -> EmailApi {
        EmailApi::new(self.clone())
    }

    /// Access the health API.
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Clear all stored credentials and announce the session has ended.
    pub fn end_session(&self) {
        self.inner.stage.terminate("session ended");
    }

    /// Replace the cached profile of the logged-in user.
    pub fn remember_user(&self, user: &User) {
        self.tokens().set_user(user);
    }

    pub(crate) fn stage(&self) -> &RefreshStage {
        &self.inner.stage
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request pipeline
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a request and decode the JSON response.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(request).await?;
        decode(&response)
    }

    /// Execute a request, discarding any response body.
    pub async fn request_unit(&self, request: ApiRequest) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }

    /// Execute a request and return the successful raw response.
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let method = request.method();
        let path = request.path().to_string();
        let response = self.inner.stage.execute(request).await.inspect_err(|e| {
            tracing::warn!(%method, %path, kind = %e.kind(), "API call failed");
        })?;

        if response.is_success() {
            return Ok(response);
        }

        let err = Error::from_response(response.status, &response.body);
        tracing::warn!(%method, %path, status = response.status, kind = %err.kind(), "API call failed");
        Err(err)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(ApiRequest::get(path)).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(ApiRequest::get(path).query(query)?).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::post(path).json(body)?).await
    }

    /// Make a POST request without a body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(ApiRequest::post(path)).await
    }

    /// Make a POST request, ignoring the response body.
    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.request_unit(ApiRequest::post(path).json(body)?).await
    }

    /// Make a PATCH request, ignoring the response body.
    pub(crate) async fn patch_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.request_unit(ApiRequest::patch(path).json(body)?).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.request_unit(ApiRequest::delete(path)).await
    }
}

/// Decode a successful response body.
///
/// An empty body decodes as JSON `null`, so unit-like targets accept it.
fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };

    serde_json::from_slice(body).map_err(|e| Error::Api {
        status: response.status,
        message: format!("invalid response body: {}", e),
    })
}

/// Builder for creating an [`ApiClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    storage: Option<Arc<dyn Storage>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            storage: None,
            transport: None,
        }
    }

    /// Set the API base URL, e.g. `http://localhost:5000/api`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Persist session state in the given storage. Defaults to memory.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient> {
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

        // Parse and normalize base URL
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid base URL '{}': {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let user_agent = self
                    .user_agent
                    .unwrap_or_else(|| format!("fss-client/{}", env!("CARGO_PKG_VERSION")));
                Arc::new(HttpTransport::new(
                    base_url.clone(),
                    self.timeout,
                    &user_agent,
                )?)
            }
        };

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                base_url,
                stage: RefreshStage::new(transport, TokenStore::new(storage)),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
