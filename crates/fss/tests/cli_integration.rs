//! CLI integration tests for the `fss` command-line interface.
//!
//! These tests verify:
//! - Help text and argument parsing
//! - Local validation of enquiry submissions
//! - Route guard decisions without a stored session
//! - Error rendering when the API is unreachable
//!
//! Note: no API server is required. Each test points the config directory
//! at a fresh temporary directory so no real session is touched.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the fss binary with an isolated config directory.
fn fss(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fss").unwrap();
    cmd.env("FSS_CONFIG_DIR", config_dir.path())
        .env_remove("FSS_API_URL");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("enquiry"))
        .stdout(predicate::str::contains("route"))
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("email"))
        .stdout(predicate::str::contains("health"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fss"));
}

#[test]
fn test_enquiry_help_lists_operations() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["enquiry", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("priority"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("stats"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument Parsing Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_status_rejects_unknown_value() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["enquiry", "status", "e1", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("archived"));
}

#[test]
fn test_delete_requires_id() {
    let dir = TempDir::new().unwrap();
    fss(&dir).args(["enquiry", "delete"]).assert().failure();
}

#[test]
fn test_invalid_api_url_is_rejected() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["--api-url", "ftp://example.com", "route", "/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Enquiry Submission Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_submit_reports_field_errors_without_network() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["--api-url", "http://127.0.0.1:1/api"])
        .args(["enquiry", "submit", "--name", "Jo", "--email", "bad"])
        .args(["--phone", "123", "--message", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid email address"))
        .stderr(predicate::str::contains("Please enter a valid phone number"))
        .stderr(predicate::str::contains("Please select a service"))
        .stderr(predicate::str::contains("Message must be at least 10 characters"))
        .stderr(predicate::str::contains("Network error").not());
}

#[test]
fn test_submit_json_error_shape() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["--json", "enquiry", "submit", "--name", "A"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("VALIDATION_ERROR"))
        .stdout(predicate::str::contains("Name must be at least 2 characters"));
}

#[test]
fn test_submit_unreachable_api_is_network_error() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["--api-url", "http://127.0.0.1:1/api", "enquiry", "submit"])
        .args(["--name", "Asha", "--email", "asha@example.com"])
        .args(["--phone", "+919876543210", "--service", "Mentoring"])
        .args(["--message", "Looking for weekly mentoring sessions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Network error occurred. Please check your connection.",
        ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Route Guard Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_public_route_renders() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["route", "/about"])
        .assert()
        .success()
        .stdout(predicate::str::contains("render about"));
}

#[test]
fn test_unknown_route_renders_home() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["route", "/no/such/page"])
        .assert()
        .success()
        .stdout(predicate::str::contains("render home"));
}

#[test]
fn test_protected_route_redirects_without_session() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["--json", "route", "/admin/dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"decision\":\"redirect\""))
        .stdout(predicate::str::contains("/admin/login"));
}

#[test]
fn test_admin_command_without_session_redirects() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["enquiry", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_auth_status_anonymous() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("anonymous"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard and Email Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_dashboard_help_lists_reports() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["dashboard", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("overview"))
        .stdout(predicate::str::contains("analytics"))
        .stdout(predicate::str::contains("performance"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn test_dashboard_without_session_redirects() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["dashboard", "overview"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_dashboard_rejects_reversed_window() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["dashboard", "export", "--from", "2024-06-01", "--to", "2024-05-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from must not be after --to"));
}

#[test]
fn test_dashboard_rejects_malformed_date() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["dashboard", "analytics", "--from", "last-tuesday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("last-tuesday"));
}

#[test]
fn test_email_without_session_redirects_in_json() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["--json", "email", "weekly-report"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("SESSION_REQUIRED"))
        .stdout(predicate::str::contains("/admin/login"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Health Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_health_unreachable() {
    let dir = TempDir::new().unwrap();
    fss(&dir)
        .args(["--json", "--api-url", "http://127.0.0.1:1/api", "health"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("NETWORK_ERROR"));
}
