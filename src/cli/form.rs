// ABOUTME: CLI record commands - show, template and set step records
//
// `set` stores the record even when it does not validate yet, the same way a
// panel autosaves partial input; validation only gates `next`.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use super::{print_json, CliContext, OutputFormat, SetArgs, StepArgs};
use gatewise::wizard::{FieldIssue, StepData, StepId};

pub fn show(ctx: &CliContext, args: &StepArgs, format: OutputFormat) -> Result<()> {
    let record = ctx.controller().forms().load_step(args.step);

    match (record, format) {
        (Some(data), _) => print_json(&data),
        (None, OutputFormat::Json) => print_json(&serde_json::Value::Null),
        (None, OutputFormat::Text) => {
            println!("No record stored for {}.", args.step);
            Ok(())
        }
    }
}

pub fn template(args: &StepArgs, _format: OutputFormat) -> Result<()> {
    print_json(&StepData::default_for(args.step))
}

#[derive(Debug, Serialize)]
pub struct SetOutcome {
    pub step: StepId,
    pub issues: Vec<FieldIssue>,
}

/// Decode `json` against the step's schema and store it
pub fn store_record(ctx: &CliContext, step: StepId, json: &str) -> Result<SetOutcome> {
    ctx.ensure_session()?;

    let data = StepData::from_json(step, json)
        .with_context(|| format!("Record does not match the schema for {step}"))?;

    if !ctx.controller().forms().save_step(&data) {
        bail!("Failed to store the record for {step}");
    }

    Ok(SetOutcome {
        step,
        issues: data.validate(),
    })
}

pub fn set(ctx: &CliContext, args: SetArgs, format: OutputFormat) -> Result<()> {
    let json = match (args.json, args.file) {
        (Some(json), _) => json,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("Provide the record with --json or --file"),
    };

    let outcome = store_record(ctx, args.step, &json)?;

    match format {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Text => {
            println!("Saved {}.", outcome.step);
            if !outcome.issues.is_empty() {
                println!("Not ready to continue yet:");
                for issue in &outcome.issues {
                    println!("  - {issue}");
                }
            }
        }
    }

    Ok(())
}
