//! FSS - Full Stack Solutions portal client
//!
//! Main entry point for the `fss` CLI.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

mod commands;

use commands::{Reported, auth, dashboard, email, enquiry, health, route};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// FSS - Full Stack Solutions portal client
#[derive(Parser)]
#[command(name = "fss")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// API URL (default: http://localhost:5000/api)
    #[arg(long, global = true, env = "FSS_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Admin sign-in and session management
    Auth(auth::AuthArgs),

    /// Submit and manage enquiries
    Enquiry(enquiry::EnquiryArgs),

    /// Admin reports and exports
    Dashboard(dashboard::DashboardArgs),

    /// Ask the server to send admin mail
    Email(email::EmailArgs),

    /// Show how a path would be routed for the current session
    Route(route::RouteArgs),

    /// Check that the API is reachable
    Health(health::HealthArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable, stderr) + rotating JSON file
    let filter = if cli.verbose {
        "fss=debug,fss_client=debug,fss_portal=debug,fss_config=debug,info"
    } else {
        "warn"
    };

    let log_dir = fss_config::xdg_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "fss.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(cli.verbose)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "fss=trace,fss_client=trace,fss_portal=trace,fss_config=trace,info",
                )),
        )
        .init();

    // Resolve configuration: file, then environment, then flags
    let mut config = fss_config::load_client_config().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    config.validate().context("Invalid configuration")?;

    let ctx = commands::Context {
        config,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    let result = match cli.command {
        Commands::Auth(args) => auth::run(args, &ctx).await,
        Commands::Enquiry(args) => enquiry::run(args, &ctx).await,
        Commands::Dashboard(args) => dashboard::run(args, &ctx).await,
        Commands::Email(args) => email::run(args, &ctx).await,
        Commands::Route(args) => route::run(args, &ctx).await,
        Commands::Health(args) => health::run(args, &ctx).await,
    };

    match result {
        // Already rendered for the user; only the exit status is left.
        Err(e) if e.is::<Reported>() => {
            drop(guard);
            std::process::exit(1)
        }
        other => other,
    }
}
