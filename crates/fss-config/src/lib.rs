//! Configuration for FSS portal clients.
//!
//! Provides TOML-based client configuration with:
//! - A single API origin, overridable through `FSS_API_URL`
//! - Request timeout and success-banner display duration
//! - The data directory holding persisted session state
//!
//! Resolution order (later overrides earlier):
//! 1. Built-in defaults
//! 2. `~/.config/fss/client.toml` (or `$FSS_CONFIG_DIR/client.toml`)
//! 3. `FSS_API_URL`
//! 4. CLI arguments (handled externally)

pub mod client;
pub mod discovery;
pub mod error;

pub use client::{
    ClientConfig, DEFAULT_API_URL, DEFAULT_SUCCESS_DISPLAY_MS, DEFAULT_TIMEOUT_SECS,
    load_client_config, load_client_config_from, save_client_config_to,
};
pub use discovery::{API_URL_ENV, CONFIG_DIR_ENV, client_config_path, xdg_config_dir};
pub use error::{ConfigError, Result};
