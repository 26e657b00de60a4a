// ABOUTME: CLI review and deploy commands

use anyhow::Result;

use super::{print_json, CliContext, OutputFormat};
use gatewise::wizard::{deploy as run_deploy, ReviewReport, ReviewStatus, ReviewSummary};

const fn status_icon(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Success => "\u{2713}", // check mark
        ReviewStatus::Warning => "!",
        ReviewStatus::Error => "\u{2717}", // ballot x
    }
}

fn summary_lines(summary: &ReviewSummary) -> Vec<String> {
    vec![
        format!("Gateway:        {}", summary.gateway_name),
        format!("Endpoints:      {}", summary.endpoint_count),
        format!("Mappings:       {}", summary.mapping_count),
        format!(
            "Rate limiting:  {}",
            if summary.rate_limiting_enabled { "enabled" } else { "disabled" }
        ),
        format!("Authentication: {}", summary.auth_method),
    ]
}

pub fn execute(ctx: &CliContext, format: OutputFormat) -> Result<()> {
    let report = ReviewReport::from_forms(ctx.controller().forms());

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            for line in summary_lines(&report.summary) {
                println!("{line}");
            }
            println!();
            for item in &report.items {
                println!("{} {:<24} {}", status_icon(item.status), item.title, item.message);
            }
        }
    }
    Ok(())
}

pub async fn deploy(ctx: &CliContext, format: OutputFormat) -> Result<()> {
    ctx.ensure_session()?;

    let controller = ctx.controller();
    let text = format == OutputFormat::Text;
    let transition = run_deploy(&controller, ctx.config.wizard.deploy_tick(), |progress| {
        if text {
            println!("Deploying... {progress}%");
        }
    })
    .await?;

    match format {
        OutputFormat::Json => print_json(&transition)?,
        OutputFormat::Text => println!("Gateway deployed. {} is complete.", transition.step()),
    }
    Ok(())
}
