//! Config directory discovery.

use std::path::PathBuf;

/// Application name for XDG directory resolution.
const APP_NAME: &str = "fss";

/// Default config filename within the config directory.
const CLIENT_CONFIG_FILE: &str = "client.toml";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "FSS_CONFIG_DIR";

/// Environment variable selecting the API origin.
pub const API_URL_ENV: &str = "FSS_API_URL";

/// Get the config directory.
///
/// Uses `FSS_CONFIG_DIR` when set and non-empty, otherwise the platform
/// config directory (`~/.config/fss` on Linux).
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Path of the client config file.
pub fn client_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(CLIENT_CONFIG_FILE))
}
