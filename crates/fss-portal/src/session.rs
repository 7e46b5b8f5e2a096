//! Auth session manager.
//!
//! Tracks whether an admin is signed in. The manager never writes tokens
//! itself; it reads the client's token store and reacts to the client's
//! session signals, so a session terminated inside the refresh stage is
//! observed here as [`SessionStatus::Anonymous`] on the next status check.

use std::fmt;

use fss_client::{ApiClient, Result, SessionSignal, User};
use parking_lot::Mutex;
use tokio::sync::watch;

/// Authentication state of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// The stored session has not been checked yet.
    Loading,
    Anonymous,
    Authenticated,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Loading => "loading",
            SessionStatus::Anonymous => "anonymous",
            SessionStatus::Authenticated => "authenticated",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login credentials.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug)]
struct SessionState {
    status: SessionStatus,
    user: Option<User>,
}

/// Owns the session status of one client.
#[derive(Debug)]
pub struct SessionManager {
    client: ApiClient,
    state: Mutex<SessionState>,
    signals: Mutex<watch::Receiver<SessionSignal>>,
}

impl SessionManager {
    /// Create a manager in the [`SessionStatus::Loading`] state.
    pub fn new(client: ApiClient) -> Self {
        let signals = client.subscribe();
        Self {
            client,
            state: Mutex::new(SessionState {
                status: SessionStatus::Loading,
                user: None,
            }),
            signals: Mutex::new(signals),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Check the stored session and leave the loading state.
    ///
    /// A present, unexpired access token with a readable cached profile
    /// authenticates. Anything else, including corrupt stored data, ends up
    /// anonymous with stale credentials cleared.
    pub fn initialize(&self) -> SessionStatus {
        let tokens = self.client.tokens();

        let status = if tokens.has_valid_access_token() {
            match tokens.user() {
                Ok(user) => {
                    self.set_state(SessionStatus::Authenticated, user);
                    SessionStatus::Authenticated
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stored user record is corrupt; signing out");
                    self.discard_stored_session();
                    SessionStatus::Anonymous
                }
            }
        } else {
            if tokens.access_token().is_some() || tokens.refresh_token().is_some() {
                tracing::debug!("Stored access token is missing or expired; clearing session");
                self.discard_stored_session();
            }
            self.set_state(SessionStatus::Anonymous, None);
            SessionStatus::Anonymous
        };

        // Signals raised while initializing are already reflected in `status`.
        self.signals.lock().borrow_and_update();
        tracing::debug!(%status, "Session initialized");
        status
    }

    /// Sign in. On failure the session stays anonymous.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        match self
            .client
            .auth()
            .login(&credentials.email, &credentials.password)
            .await
        {
            Ok(response) => {
                self.signals.lock().borrow_and_update();
                let user = response.admin.unwrap_or_else(|| User {
                    id: String::new(),
                    name: String::new(),
                    email: credentials.email.clone(),
                    role: String::new(),
                });
                self.set_state(SessionStatus::Authenticated, Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.set_state(SessionStatus::Anonymous, None);
                Err(e)
            }
        }
    }

    /// Sign out. Always succeeds locally.
    pub async fn logout(&self) {
        self.client.auth().logout().await;
        self.signals.lock().borrow_and_update();
        self.set_state(SessionStatus::Anonymous, None);
        tracing::info!("Logged out");
    }

    /// Current status, after applying any pending termination signal.
    pub fn status(&self) -> SessionStatus {
        self.apply_signals();
        self.state.lock().status
    }

    /// Cached profile of the signed-in admin.
    pub fn user(&self) -> Option<User> {
        self.apply_signals();
        self.state.lock().user.clone()
    }

    /// Replace the cached profile, e.g. after fetching a fresh one.
    pub fn update_user(&self, user: User) {
        self.client.remember_user(&user);
        self.state.lock().user = Some(user);
    }

    fn apply_signals(&self) {
        let mut signals = self.signals.lock();
        let changed = signals.has_changed().unwrap_or(false);
        if changed && *signals.borrow_and_update() == SessionSignal::Terminated {
            let mut state = self.state.lock();
            if state.status != SessionStatus::Anonymous {
                tracing::info!(previous = %state.status, "Session terminated");
            }
            state.status = SessionStatus::Anonymous;
            state.user = None;
        }
    }

    fn discard_stored_session(&self) {
        self.client.end_session();
        self.set_state(SessionStatus::Anonymous, None);
    }

    fn set_state(&self, status: SessionStatus, user: Option<User>) {
        let mut state = self.state.lock();
        state.status = status;
        state.user = user;
    }
}
