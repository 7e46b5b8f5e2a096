//! Email command - ask the server to send admin mail.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use fss_client::CustomEmailRequest;

use super::{Context, print_json, print_report, reply_message};

/// Arguments for the email command.
#[derive(Args, Debug)]
pub struct EmailArgs {
    #[command(subcommand)]
    pub command: EmailCommand,
}

#[derive(Subcommand, Debug)]
pub enum EmailCommand {
    /// Show the mail service status
    Status,

    /// Send a test message
    Test {
        /// Recipient address
        address: String,
    },

    /// Send a one-off message
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Subject line
        #[arg(long)]
        subject: String,

        /// Message body
        #[arg(long)]
        message: String,

        /// Enquiry the message relates to
        #[arg(long)]
        enquiry: Option<String>,
    },

    /// Remind customers whose enquiries await follow-up
    Reminders,

    /// Send the weekly summary to admins
    WeeklyReport,
}

/// Run the email command.
pub async fn run(args: EmailArgs, ctx: &Context) -> Result<()> {
    let client = ctx.admin_client()?;
    let emails = client.emails();

    let (reply, done) = match args.command {
        EmailCommand::Status => {
            let status = emails.status().await.map_err(|e| ctx.report(&e))?;
            if ctx.json_output {
                return print_json(&status);
            }
            print_report("Email", &status);
            return Ok(());
        }
        EmailCommand::Test { address } => {
            let reply = emails.test(&address).await.map_err(|e| ctx.report(&e))?;
            (reply, format!("Test email sent to {}", address))
        }
        EmailCommand::Send {
            to,
            subject,
            message,
            enquiry,
        } => {
            if subject.trim().is_empty() || message.trim().is_empty() {
                return Err(ctx.fail("Subject and message are required"));
            }
            let request = CustomEmailRequest {
                to,
                subject,
                message,
                enquiry_id: enquiry,
            };
            let reply = emails
                .send_custom(&request)
                .await
                .map_err(|e| ctx.report(&e))?;
            (reply, format!("Email sent to {}", request.to))
        }
        EmailCommand::Reminders => {
            let reply = emails
                .send_follow_up_reminders()
                .await
                .map_err(|e| ctx.report(&e))?;
            (reply, "Follow-up reminders sent".to_string())
        }
        EmailCommand::WeeklyReport => {
            let reply = emails
                .send_weekly_report()
                .await
                .map_err(|e| ctx.report(&e))?;
            (reply, "Weekly report sent".to_string())
        }
    };

    if ctx.json_output {
        return print_json(&reply);
    }
    println!(
        "{} {}",
        Style::new().green().apply_to("✓"),
        reply_message(&reply).unwrap_or(&done)
    );
    Ok(())
}
