// ABOUTME: CLI dashboard command - demo traffic analytics for the gateway

use anyhow::Result;

use super::{print_json, DashboardArgs, OutputFormat};
use gatewise::dashboard::{generate_dashboard_data, DashboardData};

fn text_lines(data: &DashboardData) -> Vec<String> {
    let summary = &data.summary;
    let mut lines = vec![
        format!(
            "APIs: {} ({} active)   Requests: {}   Errors: {}",
            summary.total_apis, summary.active_apis, summary.total_requests, summary.total_errors
        ),
        format!(
            "Success rate: {:.2}%   Avg response: {}ms",
            summary.overall_success_rate, summary.avg_response_time
        ),
        String::new(),
    ];

    for api in &data.api_list {
        lines.push(format!(
            "{:<8} {:<20} {:<28} {:>6.2}% {:>5}ms",
            api.id, api.name, api.endpoint, api.success_rate, api.avg_response_time
        ));
    }

    if let (Some(first), Some(last)) = (data.response_times.first(), data.response_times.last()) {
        lines.push(String::new());
        lines.push(format!(
            "{} points from {} to {}",
            data.response_times.len(),
            first.timestamp,
            last.timestamp
        ));
    }
    lines
}

pub fn execute(args: &DashboardArgs, format: OutputFormat) -> Result<()> {
    let data = generate_dashboard_data(args.range, args.portfolio.as_deref())?;

    match format {
        OutputFormat::Json => print_json(&data)?,
        OutputFormat::Text => {
            for line in text_lines(&data) {
                println!("{line}");
            }
        }
    }
    Ok(())
}
