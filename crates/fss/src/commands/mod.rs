//! CLI command handlers.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use console::Style;
use fss_client::{ApiClient, Error, FileStorage};
use fss_config::ClientConfig;
use fss_portal::{Decision, EnquiryBoard, Navigator, Route, SessionManager};

pub mod auth;
pub mod dashboard;
pub mod email;
pub mod enquiry;
pub mod health;
pub mod route;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved client configuration.
    pub config: ClientConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Build an API client whose session persists in the data directory.
    pub fn client(&self) -> Result<ApiClient> {
        let data_dir = self.config.effective_data_dir();
        tracing::debug!(api_url = %self.config.api_url, data_dir = %data_dir.display(), "Building client");

        let client = ApiClient::builder()
            .base_url(&self.config.api_url)
            .timeout(self.config.timeout())
            .storage(Arc::new(FileStorage::new(&data_dir)))
            .build()?;
        Ok(client)
    }

    /// Load the stored session.
    pub fn session(&self) -> Result<Arc<SessionManager>> {
        let session = Arc::new(SessionManager::new(self.client()?));
        session.initialize();
        Ok(session)
    }

    /// Client for admin-only calls, or explain why the dashboard is out of
    /// reach.
    pub fn admin_client(&self) -> Result<ApiClient> {
        let navigator = Navigator::new(self.session()?);
        match navigator.navigate(&Route::AdminDashboard.path()) {
            Decision::Render(_) => Ok(navigator.session().client().clone()),
            Decision::Redirect(target) => Err(self.redirect(&target)),
            Decision::Loading => Err(self.fail("Session check did not complete")),
        }
    }

    /// Open the admin board.
    pub fn admin_board(&self) -> Result<EnquiryBoard> {
        Ok(EnquiryBoard::new(self.admin_client()?))
    }

    /// Print a message and return the marker error.
    pub fn fail(&self, message: &str) -> anyhow::Error {
        if self.json_output {
            println!("{}", serde_json::json!({ "error": message }));
        } else {
            eprintln!("{} {}", Style::new().red().apply_to("Error:"), message);
        }
        Reported.into()
    }

    /// Report a redirect to the login view.
    pub fn redirect(&self, target: &Route) -> anyhow::Error {
        if self.json_output {
            println!(
                "{}",
                serde_json::json!({ "error": "SESSION_REQUIRED", "redirect": target.path() })
            );
        } else {
            eprintln!(
                "{} Not signed in (redirect to {}). Run `fss auth login` first.",
                Style::new().yellow().apply_to("→"),
                target
            );
        }
        Reported.into()
    }

    /// Render a client error the way its kind calls for.
    pub fn report(&self, err: &Error) -> anyhow::Error {
        if self.json_output {
            let mut body = serde_json::json!({
                "error": err.kind().as_str(),
                "message": err.to_string(),
            });
            if let Some(fields) = err.field_errors() {
                body["fields"] = serde_json::to_value(fields).unwrap_or_default();
            }
            if let Error::Api { status, .. } = err {
                body["status"] = (*status).into();
            }
            println!("{}", body);
            return Reported.into();
        }

        let red = Style::new().red();
        let dim = Style::new().dim();
        match err {
            Error::Validation { message, errors } => {
                eprintln!("{} {}", red.apply_to("Error:"), message);
                for (field, message) in errors.iter() {
                    eprintln!("  {} {}", red.apply_to(format!("{}:", field)), message);
                }
            }
            Error::Network { message } => {
                eprintln!("{} {}", red.apply_to("Error:"), message);
                eprintln!("{}", dim.apply_to("Check the API URL and try again."));
            }
            Error::SessionExpired => {
                eprintln!("{} {}", red.apply_to("Error:"), err);
                eprintln!("{}", dim.apply_to("Run `fss auth login` to sign in again."));
            }
            Error::Api { .. } | Error::Config(_) => {
                eprintln!("{} {}", red.apply_to("Error:"), err);
            }
        }
        Reported.into()
    }
}

/// Marker for failures that were already shown to the user.
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("command failed")
    }
}

impl std::error::Error for Reported {}

/// Print a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a server-shaped report: scalars as aligned `key: value` lines,
/// nested values as compact JSON.
pub fn print_report(title: &str, report: &serde_json::Value) {
    let dim = Style::new().dim();
    println!("{}", console::style(title).bold());
    println!("{}", dim.apply_to("─".repeat(40)));

    let serde_json::Value::Object(fields) = report else {
        println!("{}", report);
        return;
    };
    if fields.is_empty() {
        println!("{}", dim.apply_to("No data"));
        return;
    }

    let width = fields.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (key, value) in fields {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                truncate(&value.to_string(), 60)
            }
            other => other.to_string(),
        };
        println!("{:<width$}  {}", format!("{}:", key), text, width = width + 1);
    }
}

/// The `message` field of a server reply, if it carries one.
pub fn reply_message(reply: &serde_json::Value) -> Option<&str> {
    reply.get("message").and_then(serde_json::Value::as_str)
}

/// Truncate a string for table display.
pub fn truncate(s: &str, max_chars: usize) -> String {
    let single_line = s.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let cut: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
