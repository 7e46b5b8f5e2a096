//! Auth command - admin sign-in and session management.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use fss_client::SetupAdminRequest;
use fss_client::token_store::decode_claims;
use fss_portal::{Credentials, SessionStatus};

use super::{Context, print_json};

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Sign in as an admin
    Login {
        /// Admin email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the stored session
    Status,

    /// Fetch the signed-in admin's profile from the server
    Whoami,

    /// Create the first admin account
    Setup {
        /// Display name
        #[arg(long)]
        name: String,

        /// Admin email
        #[arg(long)]
        email: String,
    },
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Login { email } => cmd_login(email, ctx).await,
        AuthCommand::Logout => cmd_logout(ctx).await,
        AuthCommand::Status => cmd_status(ctx),
        AuthCommand::Whoami => cmd_whoami(ctx).await,
        AuthCommand::Setup { name, email } => cmd_setup(name, email, ctx).await,
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

async fn cmd_login(email: Option<String>, ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    if session.status() == SessionStatus::Authenticated {
        let who = session.user().map(|u| u.email).unwrap_or_default();
        println!("Already signed in {}", style(who).cyan());
        println!("Run 'fss auth logout' first to sign in as someone else.");
        return Ok(());
    }

    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    if email.is_empty() || password.is_empty() {
        return Err(ctx.fail("Email and password are required"));
    }

    let user = session
        .login(&Credentials::new(email, password))
        .await
        .map_err(|e| ctx.report(&e))?;

    if ctx.json_output {
        print_json(&user)?;
    } else {
        let green = Style::new().green();
        println!(
            "{} Signed in as {} <{}>",
            green.apply_to("✓"),
            user.name,
            user.email
        );
    }
    Ok(())
}

async fn cmd_logout(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let was_signed_in = session.status() == SessionStatus::Authenticated;
    session.logout().await;

    if ctx.json_output {
        println!("{}", serde_json::json!({ "status": "anonymous" }));
    } else if was_signed_in {
        println!("Signed out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

fn cmd_status(ctx: &Context) -> Result<()> {
    // Read the expiry before the session check clears stale tokens.
    let expires_at = ctx
        .client()?
        .tokens()
        .access_token()
        .and_then(|t| decode_claims(&t))
        .and_then(|c| c.expires_at());
    let session = ctx.session()?;
    let status = session.status();

    if ctx.json_output {
        return print_json(&serde_json::json!({
            "status": status.as_str(),
            "user": session.user(),
            "expiresAt": expires_at,
            "apiUrl": ctx.config.api_url,
        }));
    }

    let dim = Style::new().dim();
    println!("{}", style("Session").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("Status:  {}", status);
    if let Some(user) = session.user() {
        println!("User:    {} <{}>", user.name, user.email);
        if !user.role.is_empty() {
            println!("Role:    {}", user.role);
        }
    }
    if let Some(at) = expires_at {
        println!("Expires: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("API:     {}", dim.apply_to(&ctx.config.api_url));

    if status != SessionStatus::Authenticated {
        println!();
        println!("Run 'fss auth login' to sign in.");
    }
    Ok(())
}

async fn cmd_whoami(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    if session.status() != SessionStatus::Authenticated {
        return Err(ctx.redirect(&fss_portal::Route::AdminLogin));
    }

    let user = session
        .client()
        .auth()
        .profile()
        .await
        .map_err(|e| ctx.report(&e))?;
    session.update_user(user.clone());

    if ctx.json_output {
        print_json(&user)
    } else {
        println!("{} <{}>", style(&user.name).bold(), user.email);
        if !user.role.is_empty() {
            println!("Role: {}", user.role);
        }
        Ok(())
    }
}

async fn cmd_setup(name: String, email: String, ctx: &Context) -> Result<()> {
    let password = rpassword::prompt_password("New admin password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        return Err(ctx.fail("Passwords do not match"));
    }

    let client = ctx.client()?;
    let user = client
        .auth()
        .setup(&SetupAdminRequest {
            name,
            email,
            password,
        })
        .await
        .map_err(|e| ctx.report(&e))?;

    if ctx.json_output {
        print_json(&user)
    } else {
        println!(
            "{} Admin account created for {}",
            Style::new().green().apply_to("✓"),
            user.email
        );
        println!("Run 'fss auth login' to sign in.");
        Ok(())
    }
}
