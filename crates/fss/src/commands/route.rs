//! Route command - show how the route guard treats a path.

use anyhow::Result;
use clap::Args;
use console::Style;
use fss_portal::{Decision, Navigator, Route};

use super::Context;

/// Arguments for the route command.
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Path to resolve, e.g. /admin/dashboard
    pub path: String,
}

/// Run the route command.
pub async fn run(args: RouteArgs, ctx: &Context) -> Result<()> {
    let navigator = Navigator::new(ctx.session()?);
    let route = Route::parse(&args.path);
    let decision = navigator.navigate(&args.path);

    if ctx.json_output {
        let (kind, target) = match &decision {
            Decision::Render(view) => ("render", Some(view.name().to_string())),
            Decision::Redirect(to) => ("redirect", Some(to.path())),
            Decision::Loading => ("loading", None),
        };
        println!(
            "{}",
            serde_json::json!({
                "path": args.path,
                "route": route.path(),
                "protected": route.is_protected(),
                "decision": kind,
                "target": target,
            })
        );
        return Ok(());
    }

    let dim = Style::new().dim();
    match &decision {
        Decision::Render(view) => {
            println!("{} {}", Style::new().green().apply_to("render"), view.name());
        }
        Decision::Redirect(to) => {
            println!("{} {}", Style::new().yellow().apply_to("redirect"), to);
        }
        Decision::Loading => println!("{}", dim.apply_to("loading")),
    }
    if ctx.verbose {
        let protection = if route.is_protected() {
            "protected"
        } else {
            "public"
        };
        println!("{}", dim.apply_to(format!("{} ({})", route, protection)));
    }
    Ok(())
}
