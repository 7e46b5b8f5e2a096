//! Session token storage.
//!
//! Holds the access token, refresh token and cached admin profile under the
//! `authToken`, `refreshToken` and `user` keys of a [`Storage`] backend.
//! Reads are public; writes are crate-private so that the API client is the
//! only component that ever mutates session credentials.

use std::sync::Arc;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::storage::{MemoryStorage, Storage};
use crate::types::User;

pub const ACCESS_TOKEN_KEY: &str = "authToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// JWT payloads are base64url; some issuers keep the padding, most drop it.
const TOKEN_PAYLOAD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims read from a token payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiry in seconds since the Unix epoch.
    pub exp: f64,
    #[serde(default)]
    pub iat: Option<f64>,
    #[serde(default)]
    pub sub: Option<String>,
}

impl TokenClaims {
    /// Expiry as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let millis = (self.exp * 1000.0).floor() as i64;
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// Decode the payload segment of a three-part token.
///
/// Returns `None` for anything that is not a well-formed token with a
/// numeric `exp` claim.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    let bytes = TOKEN_PAYLOAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether a token is expired at `now`.
///
/// A token whose expiry equals `now` exactly is expired, as is any token
/// that cannot be decoded.
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        Some(claims) => {
            let now_secs = now.timestamp_millis() as f64 / 1000.0;
            claims.exp <= now_secs
        }
        None => true,
    }
}

/// Whether a token is expired right now.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

/// Typed view over the session keys of a storage backend.
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Read a key, treating storage failures as absence.
    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read session storage");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            tracing::warn!(key, error = %e, "Failed to write session storage");
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Cached profile. An unparsable record is reported, not hidden.
    pub fn user(&self) -> Result<Option<User>, serde_json::Error> {
        match self.read(USER_KEY) {
            Some(json) => serde_json::from_str(&json).map(Some),
            None => Ok(None),
        }
    }

    /// True when an access token is stored and not expired.
    pub fn has_valid_access_token(&self) -> bool {
        self.access_token().is_some_and(|t| !is_expired(&t))
    }

    /// True when a refresh token is stored and not expired.
    pub fn has_valid_refresh_token(&self) -> bool {
        self.refresh_token().is_some_and(|t| !is_expired(&t))
    }

    pub(crate) fn set_access_token(&self, token: &str) {
        self.write(ACCESS_TOKEN_KEY, token);
    }

    pub(crate) fn set_refresh_token(&self, token: &str) {
        self.write(REFRESH_TOKEN_KEY, token);
    }

    pub(crate) fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => self.write(USER_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "Failed to encode cached user"),
        }
    }

    /// Remove all session keys in one storage operation.
    pub(crate) fn clear(&self) {
        if let Err(e) = self
            .storage
            .remove_all(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY])
        {
            tracing::warn!(error = %e, "Failed to clear session storage");
        }
    }
}
