//! Enquiry command - public submission and admin management.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use fss_client::{Enquiry, EnquiryFilters, EnquiryStatus, Error, Priority, Service};
use fss_portal::{EnquiryForm, EnquiryFormController, EnquiryWorkflow, SubmitOutcome};

use super::{Context, print_json, truncate};

/// Arguments for the enquiry command.
#[derive(Args, Debug)]
pub struct EnquiryArgs {
    #[command(subcommand)]
    pub command: EnquiryCommand,
}

#[derive(Subcommand, Debug)]
pub enum EnquiryCommand {
    /// Submit a new enquiry (no sign-in needed)
    Submit {
        /// Your name
        #[arg(long, default_value = "")]
        name: String,

        /// Contact email
        #[arg(long, default_value = "")]
        email: String,

        /// Contact phone, digits with optional leading +
        #[arg(long, default_value = "")]
        phone: String,

        /// Service: "Software Development", "Digital Marketing",
        /// "Video Editing", "Mentoring" or "Other"
        #[arg(long, default_value = "")]
        service: String,

        /// What you need help with
        #[arg(long, default_value = "")]
        message: String,
    },

    /// List enquiries
    List {
        /// Filter by status (new, in-progress, completed, cancelled)
        #[arg(long)]
        status: Option<EnquiryStatus>,

        /// Filter by service
        #[arg(long)]
        service: Option<Service>,

        /// Filter by priority (low, medium, high)
        #[arg(long)]
        priority: Option<Priority>,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show a specific enquiry
    Show {
        /// Enquiry ID
        id: String,
    },

    /// Change an enquiry's status
    Status {
        /// Enquiry ID
        id: String,

        /// New status (new, in-progress, completed, cancelled)
        status: EnquiryStatus,

        /// Reason for the change
        #[arg(long)]
        reason: Option<String>,
    },

    /// Change an enquiry's priority
    Priority {
        /// Enquiry ID
        id: String,

        /// New priority (low, medium, high)
        priority: Priority,
    },

    /// Add a note to an enquiry
    Note {
        /// Enquiry ID
        id: String,

        /// Note text
        text: String,

        /// Hide the note from non-admin views
        #[arg(long)]
        private: bool,
    },

    /// Delete an enquiry
    Delete {
        /// Enquiry ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show enquiry statistics
    Stats,
}

/// Run the enquiry command.
pub async fn run(args: EnquiryArgs, ctx: &Context) -> Result<()> {
    match args.command {
        EnquiryCommand::Submit {
            name,
            email,
            phone,
            service,
            message,
        } => {
            let form = EnquiryForm {
                name,
                email,
                phone,
                service,
                message,
            };
            cmd_submit(form, ctx).await
        }
        EnquiryCommand::List {
            status,
            service,
            priority,
            search,
            page,
            limit,
        } => {
            let filters = EnquiryFilters {
                page,
                limit,
                status,
                service,
                priority,
                search,
            };
            cmd_list(filters, ctx).await
        }
        EnquiryCommand::Show { id } => cmd_show(&id, ctx).await,
        EnquiryCommand::Status { id, status, reason } => {
            cmd_status(&id, status, reason.as_deref(), ctx).await
        }
        EnquiryCommand::Priority { id, priority } => cmd_priority(&id, priority, ctx).await,
        EnquiryCommand::Note { id, text, private } => cmd_note(&id, &text, private, ctx).await,
        EnquiryCommand::Delete { id, yes } => cmd_delete(id, yes, ctx).await,
        EnquiryCommand::Stats => cmd_stats(ctx).await,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public submission
// ─────────────────────────────────────────────────────────────────────────────

async fn cmd_submit(values: EnquiryForm, ctx: &Context) -> Result<()> {
    let form = EnquiryFormController::new(EnquiryWorkflow::new(ctx.client()?))
        .with_success_display(ctx.config.success_display());
    form.fill(values);

    match form.submit().await {
        SubmitOutcome::Created(enquiry) => {
            if ctx.json_output {
                print_json(&enquiry)
            } else {
                let green = Style::new().green();
                let dim = Style::new().dim();
                println!(
                    "{} Thank you! Your enquiry has been submitted. {}",
                    green.apply_to("✓"),
                    dim.apply_to(format!("[{}]", enquiry.id))
                );
                println!("We'll get back to you soon.");
                Ok(())
            }
        }
        SubmitOutcome::Rejected(errors) => Err(ctx.report(&Error::validation(errors))),
        SubmitOutcome::Failed(e) => Err(ctx.report(&e)),
        SubmitOutcome::Ignored | SubmitOutcome::Discarded => {
            Err(ctx.fail("The enquiry was not submitted"))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Admin management
// ─────────────────────────────────────────────────────────────────────────────

async fn cmd_list(filters: EnquiryFilters, ctx: &Context) -> Result<()> {
    let mut board = ctx.admin_board()?;
    board.list(filters).await.map_err(|e| ctx.report(&e))?;

    if ctx.json_output {
        return print_json(&serde_json::json!({
            "enquiries": board.enquiries(),
            "total": board.total(),
        }));
    }

    let dim = Style::new().dim();
    println!("{}", style("Enquiries").bold());
    println!("{}", dim.apply_to("─".repeat(72)));

    if board.enquiries().is_empty() {
        println!("{}", dim.apply_to("No enquiries found"));
        return Ok(());
    }

    for enquiry in board.enquiries() {
        print_row(enquiry);
    }
    println!();
    println!(
        "{}",
        dim.apply_to(format!(
            "Showing {} of {}",
            board.enquiries().len(),
            board.total()
        ))
    );
    Ok(())
}

fn print_row(enquiry: &Enquiry) {
    let dim = Style::new().dim();
    let created = enquiry
        .created_at
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    println!(
        "{} {:<11} {:<6} {:<20} {:<20} {}",
        dim.apply_to(format!("[{}]", enquiry.id)),
        status_style(enquiry.status).apply_to(enquiry.status.as_str()),
        enquiry.priority.as_str(),
        enquiry.service.as_str(),
        truncate(&enquiry.name, 20),
        dim.apply_to(created)
    );
}

fn status_style(status: EnquiryStatus) -> Style {
    match status {
        EnquiryStatus::New => Style::new().cyan(),
        EnquiryStatus::InProgress => Style::new().yellow(),
        EnquiryStatus::Completed => Style::new().green(),
        EnquiryStatus::Cancelled => Style::new().dim(),
    }
}

async fn cmd_show(id: &str, ctx: &Context) -> Result<()> {
    let mut board = ctx.admin_board()?;
    let enquiry = board.get(id).await.map_err(|e| ctx.report(&e))?;

    if ctx.json_output {
        return print_json(&enquiry);
    }

    let dim = Style::new().dim();
    println!("{}", style(format!("Enquiry {}", enquiry.id)).bold());
    println!("{}", dim.apply_to("─".repeat(50)));
    println!("Name:     {}", enquiry.name);
    println!("Email:    {}", enquiry.email);
    println!("Phone:    {}", enquiry.phone);
    println!("Service:  {}", enquiry.service);
    println!(
        "Status:   {}",
        status_style(enquiry.status).apply_to(enquiry.status)
    );
    println!("Priority: {}", enquiry.priority);
    if let Some(at) = enquiry.created_at {
        println!("Created:  {}", at.format("%Y-%m-%d %H:%M UTC"));
    }
    println!();
    println!("{}", enquiry.message);

    if !enquiry.notes.is_empty() {
        println!();
        println!("{}", style("Notes").bold());
        for note in &enquiry.notes {
            let marker = if note.is_private { " (private)" } else { "" };
            println!("  - {}{}", note.note, dim.apply_to(marker));
        }
    }
    Ok(())
}

async fn cmd_status(
    id: &str,
    status: EnquiryStatus,
    reason: Option<&str>,
    ctx: &Context,
) -> Result<()> {
    let mut board = ctx.admin_board()?;
    board
        .update_status(id, status, reason)
        .await
        .map_err(|e| ctx.report(&e))?;
    confirm_done(ctx, id, &format!("Status set to {}", status))
}

async fn cmd_priority(id: &str, priority: Priority, ctx: &Context) -> Result<()> {
    let mut board = ctx.admin_board()?;
    board
        .update_priority(id, priority)
        .await
        .map_err(|e| ctx.report(&e))?;
    confirm_done(ctx, id, &format!("Priority set to {}", priority))
}

async fn cmd_note(id: &str, text: &str, private: bool, ctx: &Context) -> Result<()> {
    let mut board = ctx.admin_board()?;
    board
        .add_note(id, text, private)
        .await
        .map_err(|e| ctx.report(&e))?;
    confirm_done(ctx, id, "Note added")
}

async fn cmd_delete(id: String, yes: bool, ctx: &Context) -> Result<()> {
    let mut board = ctx.admin_board()?;

    if !yes {
        print!("Delete enquiry {}? This cannot be undone. [y/N] ", id);
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let confirmation = board.request_delete(id.clone());
    board
        .delete(confirmation)
        .await
        .map_err(|e| ctx.report(&e))?;
    confirm_done(ctx, &id, "Deleted")
}

async fn cmd_stats(ctx: &Context) -> Result<()> {
    let mut board = ctx.admin_board()?;
    let stats = board.stats().await.map_err(|e| ctx.report(&e))?;

    if ctx.json_output {
        return print_json(&stats);
    }

    println!("{}", style("Enquiry Statistics").bold());
    println!("{}", Style::new().dim().apply_to("─".repeat(40)));
    println!("Total: {}", stats.total);
    print_counts("By status", &stats.by_status);
    print_counts("By service", &stats.by_service);
    print_counts("By priority", &stats.by_priority);
    Ok(())
}

fn print_counts(title: &str, counts: &BTreeMap<String, u64>) {
    if counts.is_empty() {
        return;
    }
    println!();
    println!("{}", style(title).bold());
    for (key, count) in counts {
        println!("  {:<22} {}", key, count);
    }
}

fn confirm_done(ctx: &Context, id: &str, what: &str) -> Result<()> {
    if ctx.json_output {
        println!("{}", serde_json::json!({ "id": id, "ok": true }));
    } else {
        println!(
            "{} {} {}",
            Style::new().green().apply_to("✓"),
            what,
            Style::new().dim().apply_to(format!("[{}]", id))
        );
    }
    Ok(())
}
