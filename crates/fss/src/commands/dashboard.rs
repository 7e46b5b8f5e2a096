//! Dashboard command - admin reports and exports.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use console::Style;
use fss_client::{AnalyticsQuery, EnquiryStatus, ExportQuery, Service};

use super::{Context, print_json, print_report};

/// Arguments for the dashboard command.
#[derive(Args, Debug)]
pub struct DashboardArgs {
    #[command(subcommand)]
    pub command: DashboardCommand,
}

#[derive(Subcommand, Debug)]
pub enum DashboardCommand {
    /// Show headline figures
    Overview,

    /// Show enquiry analytics for a date window
    Analytics {
        /// Named window, e.g. 7d or 30d
        #[arg(long)]
        period: Option<String>,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show response and conversion figures
    Performance,

    /// Export enquiries
    Export {
        /// Export format requested from the server (e.g. csv, json)
        #[arg(long)]
        format: Option<String>,

        /// Only enquiries with this status
        #[arg(long)]
        status: Option<EnquiryStatus>,

        /// Only enquiries for this service
        #[arg(long)]
        service: Option<Service>,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Write the export to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the dashboard command.
pub async fn run(args: DashboardArgs, ctx: &Context) -> Result<()> {
    match args.command {
        DashboardCommand::Overview => cmd_overview(ctx).await,
        DashboardCommand::Analytics { period, from, to } => {
            let query = AnalyticsQuery {
                period,
                start_date: from,
                end_date: to,
            };
            cmd_analytics(query, ctx).await
        }
        DashboardCommand::Performance => cmd_performance(ctx).await,
        DashboardCommand::Export {
            format,
            status,
            service,
            from,
            to,
            output,
        } => {
            let query = ExportQuery {
                format,
                status,
                service,
                start_date: from,
                end_date: to,
            };
            cmd_export(query, output, ctx).await
        }
    }
}

fn check_window(from: Option<NaiveDate>, to: Option<NaiveDate>, ctx: &Context) -> Result<()> {
    if let (Some(from), Some(to)) = (from, to)
        && from > to
    {
        return Err(ctx.fail("--from must not be after --to"));
    }
    Ok(())
}

async fn cmd_overview(ctx: &Context) -> Result<()> {
    let client = ctx.admin_client()?;
    let overview = client.dashboard().overview().await.map_err(|e| ctx.report(&e))?;
    show(ctx, "Overview", &overview)
}

async fn cmd_analytics(query: AnalyticsQuery, ctx: &Context) -> Result<()> {
    check_window(query.start_date, query.end_date, ctx)?;
    let client = ctx.admin_client()?;
    let analytics = client
        .dashboard()
        .analytics(&query)
        .await
        .map_err(|e| ctx.report(&e))?;
    show(ctx, "Analytics", &analytics)
}

async fn cmd_performance(ctx: &Context) -> Result<()> {
    let client = ctx.admin_client()?;
    let performance = client
        .dashboard()
        .performance()
        .await
        .map_err(|e| ctx.report(&e))?;
    show(ctx, "Performance", &performance)
}

async fn cmd_export(query: ExportQuery, output: Option<PathBuf>, ctx: &Context) -> Result<()> {
    check_window(query.start_date, query.end_date, ctx)?;
    let client = ctx.admin_client()?;
    let export = client
        .dashboard()
        .export(&query)
        .await
        .map_err(|e| ctx.report(&e))?;

    let Some(path) = output else {
        return print_json(&export);
    };

    let content = match &export {
        serde_json::Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other)?,
    };
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;
    tracing::info!(path = %path.display(), "Export written");

    if ctx.json_output {
        println!("{}", serde_json::json!({ "output": path, "ok": true }));
    } else {
        println!(
            "{} Export written to {}",
            Style::new().green().apply_to("✓"),
            path.display()
        );
    }
    Ok(())
}

fn show(ctx: &Context, title: &str, report: &serde_json::Value) -> Result<()> {
    if ctx.json_output {
        print_json(report)
    } else {
        print_report(title, report);
        Ok(())
    }
}
