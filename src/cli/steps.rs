// ABOUTME: CLI steps command - show the step registry and overall progress

use anyhow::Result;
use serde::Serialize;

use super::{print_json, CliContext, OutputFormat};
use gatewise::wizard::{Progress, StepDefinition};

/// A registry entry with the step's one-line description
#[derive(Debug, Serialize)]
pub struct StepEntry {
    #[serde(flatten)]
    pub definition: StepDefinition,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepsOverview {
    pub steps: Vec<StepEntry>,
    pub percent: f64,
    pub progress: Progress,
}

pub fn overview(ctx: &CliContext) -> StepsOverview {
    let controller = ctx.controller();
    let tracker = controller.tracker();
    let progress = tracker.progress();

    StepsOverview {
        steps: tracker
            .registry()
            .steps()
            .into_iter()
            .map(|definition| StepEntry {
                description: definition.id.description(),
                definition,
            })
            .collect(),
        percent: progress.percent(),
        progress,
    }
}

pub fn execute(ctx: &CliContext, format: OutputFormat) -> Result<()> {
    let overview = overview(ctx);

    match format {
        OutputFormat::Json => print_json(&overview)?,
        OutputFormat::Text => {
            for entry in &overview.steps {
                let step = &entry.definition;
                let mark = if step.completed { "x" } else { " " };
                println!("[{mark}] {}  {:<22} {}", step.id.number(), step.title, step.path);
                println!("       {}", entry.description);
            }
            println!(
                "\n{}/{} complete ({:.0}%)",
                overview.progress.completed_count, overview.progress.total_count, overview.percent
            );
            if !overview.progress.completed.is_empty() {
                let ids: Vec<String> = overview.progress.completed.iter().map(u32::to_string).collect();
                println!("Completed steps: {}", ids.join(", "));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support;
    use gatewise::store::{KeyValueStore, STEPS_KEY};
    use gatewise::wizard::StepId;

    #[test]
    fn test_overview_seeds_registry_on_fresh_store() {
        let (store, ctx) = test_support::context();
        let overview = overview(&ctx);

        assert_eq!(overview.steps.len(), 6);
        assert!(overview.steps.iter().all(|s| !s.definition.completed));
        assert_eq!(overview.progress.completed_count, 0);
        assert!(store.get(STEPS_KEY).unwrap().is_some());
    }

    #[test]
    fn test_overview_reports_percent() {
        let (_, ctx) = test_support::context();
        ctx.controller().tracker().mark_completed(1);
        ctx.controller().tracker().mark_completed(2);
        ctx.controller().tracker().mark_completed(3);

        let overview = overview(&ctx);
        assert_eq!(overview.progress.completed_count, 3);
        assert_eq!(overview.progress.completed, vec![1, 2, 3]);
        assert!((overview.percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overview_carries_step_descriptions() {
        let (_, ctx) = test_support::context();
        let overview = overview(&ctx);

        for entry in &overview.steps {
            assert_eq!(entry.description, entry.definition.id.description());
            assert!(!entry.description.is_empty());
        }

        let json = serde_json::to_value(&overview).unwrap();
        assert_eq!(json["steps"][0]["path"], "/onboard/step1");
        assert_eq!(json["steps"][0]["description"], StepId::BasicInfo.description());
        assert_eq!(json["progress"]["completed"], serde_json::json!([]));
    }
}
