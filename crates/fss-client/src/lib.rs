//! HTTP client SDK for the FSS enquiry API.
//!
//! This crate provides a typed client for the public enquiry endpoint and the
//! authenticated admin endpoints, together with the session machinery that
//! keeps an admin logged in:
//!
//! - **Token store**: access token, refresh token and cached profile kept in
//!   a pluggable key/value [`Storage`].
//! - **Refresh stage**: bearer attachment and one-shot refresh-and-retry on
//!   401, terminating the session when no usable refresh token remains.
//! - **Error taxonomy**: every failure is a validation, API, network or
//!   session-expired [`Error`]; transport errors never escape.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fss_client::{ApiClient, CreateEnquiryRequest, FileStorage, Result, Service};
//!
//! # async fn example() -> Result<()> {
//! let client = ApiClient::builder()
//!     .base_url("http://localhost:5000/api")
//!     .storage(Arc::new(FileStorage::new(std::path::Path::new("/tmp/fss"))))
//!     .build()?;
//!
//! let enquiry = client
//!     .enquiries()
//!     .create(&CreateEnquiryRequest {
//!         name: "Asha".into(),
//!         email: "asha@example.com".into(),
//!         phone: "+919876543210".into(),
//!         service: Service::Mentoring,
//!         message: "I'd like to book a session".into(),
//!     })
//!     .await?;
//! println!("Created enquiry {}", enquiry.id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod refresh;
pub mod storage;
pub mod token_store;
pub mod transport;
pub mod types;

pub use client::{ApiClient, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{Error, ErrorKind, NETWORK_ERROR_MESSAGE, Result, ValidationErrors};
pub use refresh::SessionSignal;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use token_store::{TokenClaims, TokenStore};
pub use types::*;
