// ABOUTME: CLI navigation commands - next, prev and goto
//
// `next` submits whatever record is stored for the step at the given location
// (or the step's initial record when nothing is stored yet).

use anyhow::{bail, Result};

use super::{print_json, CliContext, GotoArgs, LocationArgs, OutputFormat};
use gatewise::routing::Resolution;
use gatewise::wizard::{Submission, Transition};

/// Submit the stored record for the step at `location`
pub async fn submit_stored(ctx: &CliContext, location: &str) -> Result<Submission> {
    ctx.ensure_session()?;

    let controller = ctx.controller();
    let step = controller.current_step(location);
    let data = controller.forms().load_step_or_default(step);

    Ok(controller.submit(location, data).await)
}

pub async fn next(ctx: &CliContext, args: &LocationArgs, format: OutputFormat) -> Result<()> {
    let submission = submit_stored(ctx, &args.at).await?;

    match format {
        OutputFormat::Json => print_json(&submission)?,
        OutputFormat::Text => match &submission.transition {
            Transition::Advanced { from, to } => {
                println!("{from} complete.");
                println!("Now at {}", to.path());
            }
            Transition::Finished { step } => println!("{step} complete. The wizard is finished."),
            Transition::Rejected { step } => {
                println!("{step} is not valid yet:");
                for issue in &submission.issues {
                    println!("  - {issue}");
                }
            }
            other => println!("Now at {}", other.location()),
        },
    }

    if let Transition::Rejected { step } = submission.transition {
        bail!("Cannot continue from {step}");
    }
    Ok(())
}

pub fn prev(ctx: &CliContext, args: &LocationArgs, format: OutputFormat) -> Result<()> {
    let transition = ctx.controller().previous(&args.at, None::<fn()>);

    match format {
        OutputFormat::Json => print_json(&transition)?,
        OutputFormat::Text => println!("Now at {}", transition.location()),
    }
    Ok(())
}

/// Resolve a direct navigation request through routing and the navigation policy
pub fn resolve(ctx: &CliContext, path: &str) -> Resolution {
    ctx.router()
        .resolve_with(path, &ctx.auth(), &ctx.controller())
}

pub fn goto(ctx: &CliContext, args: &GotoArgs, format: OutputFormat) -> Result<()> {
    let resolution = resolve(ctx, &args.path);

    match format {
        OutputFormat::Json => print_json(&resolution)?,
        OutputFormat::Text => match resolution {
            Resolution::Render(route) => println!("Now at {route}"),
            Resolution::Redirect(route) => println!("Redirected to {route}"),
        },
    }
    Ok(())
}
