//! Health command - API reachability check.

use anyhow::Result;
use clap::Args;
use console::Style;

use super::{Context, print_json};

/// Arguments for the health command.
#[derive(Args, Debug)]
pub struct HealthArgs {}

/// Run the health command.
pub async fn run(_args: HealthArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let health = client.health().check().await.map_err(|e| ctx.report(&e))?;

    if ctx.json_output {
        return print_json(&health);
    }

    let green = Style::new().green();
    let dim = Style::new().dim();
    match &health.version {
        Some(version) => println!(
            "{} API {} {}",
            green.apply_to("●"),
            health.status,
            dim.apply_to(format!("(v{})", version))
        ),
        None => println!("{} API {}", green.apply_to("●"), health.status),
    }
    println!("{}", dim.apply_to(client.base_url().as_str()));
    Ok(())
}
