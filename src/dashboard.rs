// ABOUTME: Demo analytics data for the gateway dashboard
// Portfolio and API catalogues are fixed; time series are drawn from an
// injected random source so callers and tests can seed them

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Portfolio id that selects every API
pub const ALL_PORTFOLIOS: &str = "all";

const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Unknown time range '{0}' (expected live, daily, weekly, monthly or yearly)")]
    UnknownRange(String),

    #[error("Unknown portfolio '{0}'")]
    UnknownPortfolio(String),
}

/// Window the time series cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Last 60 minutes, one point per minute
    Live,
    /// Last 24 hours, one point per hour
    #[default]
    Daily,
    /// Last 7 days, one point per day
    Weekly,
    /// Last 30 days, one point per day, dated `M/D/YYYY`
    Monthly,
    /// Last 12 months, one point per month, dated `Mon YYYY`
    Yearly,
}

impl TimeRange {
    pub const fn all() -> [Self; 5] {
        [Self::Live, Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Number of points, including the one for `now`
    pub const fn points(self) -> usize {
        match self {
            Self::Live => 61,
            Self::Daily => 25,
            Self::Weekly => 8,
            Self::Monthly => 31,
            Self::Yearly => 13,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DashboardError::UnknownRange(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCodeDistribution {
    #[serde(rename = "2xx")]
    pub success: u64,
    #[serde(rename = "3xx")]
    pub redirect: u64,
    #[serde(rename = "4xx")]
    pub client_error: u64,
    #[serde(rename = "5xx")]
    pub server_error: u64,
}

impl StatusCodeDistribution {
    pub const fn total(&self) -> u64 {
        self.success + self.redirect + self.client_error + self.server_error
    }

    pub const fn errors(&self) -> u64 {
        self.client_error + self.server_error
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub description: String,
    pub api_count: u32,
    pub total_requests: u64,
    pub avg_success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    pub id: String,
    pub name: String,
    pub endpoint: String,
    pub portfolio: String,
    pub success_rate: f64,
    pub total_requests: u64,
    pub total_errors: u64,
    pub avg_response_time: u32,
    pub p95_response_time: u32,
    pub status_codes: StatusCodeDistribution,
    pub last_updated: String,
    pub uptime: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRangeData {
    pub timestamp: String,
    pub avg_response_time: u32,
    pub p95: u32,
    pub total_requests: u32,
    pub errors: u32,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThroughputData {
    pub timestamp: String,
    pub requests_per_minute: u32,
    pub errors_per_minute: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapData {
    pub hour: u32,
    pub day: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(rename = "totalAPIs")]
    pub total_apis: u32,
    #[serde(rename = "activeAPIs")]
    pub active_apis: u32,
    pub total_requests: u64,
    pub total_errors: u64,
    pub overall_success_rate: f64,
    pub avg_response_time: u32,
}

impl DashboardSummary {
    fn from_status_codes(codes: &StatusCodeDistribution) -> Self {
        let total_requests = codes.total();
        let total_errors = codes.errors();
        #[allow(clippy::cast_precision_loss)]
        let overall_success_rate = if total_requests == 0 {
            0.0
        } else {
            (total_requests - total_errors) as f64 / total_requests as f64 * 100.0
        };

        Self {
            total_apis: 25,
            active_apis: 24,
            total_requests,
            total_errors,
            overall_success_rate,
            avg_response_time: 156,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub summary: DashboardSummary,
    pub portfolios: Vec<Portfolio>,
    pub api_list: Vec<ApiStats>,
    pub response_times: Vec<TimeRangeData>,
    pub status_codes: StatusCodeDistribution,
    pub throughput: Vec<ThroughputData>,
    pub heatmap_data: Vec<HeatmapData>,
}

/// Point labels for `range`, oldest first and ending at `now`
pub fn timestamps(range: TimeRange, now: DateTime<Utc>) -> Vec<String> {
    let iso = |at: DateTime<Utc>| at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let back = (0..range.points() as i64).rev();

    match range {
        TimeRange::Live => back.map(|i| iso(now - Duration::minutes(i))).collect(),
        TimeRange::Daily => back.map(|i| iso(now - Duration::hours(i))).collect(),
        TimeRange::Weekly => back.map(|i| iso(now - Duration::days(i))).collect(),
        TimeRange::Monthly => back
            .map(|i| (now - Duration::days(i)).format("%-m/%-d/%Y").to_string())
            .collect(),
        TimeRange::Yearly => {
            let current = i64::from(now.year()) * 12 + i64::from(now.month0());
            back.filter_map(|i| {
                let month = current - i;
                let year = i32::try_from(month.div_euclid(12)).ok()?;
                let month0 = u32::try_from(month.rem_euclid(12)).ok()?;
                NaiveDate::from_ymd_opt(year, month0 + 1, 1)
            })
            .map(|first| first.format("%b %Y").to_string())
            .collect()
        }
    }
}

fn portfolio_entry(id: &str, name: &str, description: &str, api_count: u32, total_requests: u64, avg_success_rate: f64) -> Portfolio {
    Portfolio {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        api_count,
        total_requests,
        avg_success_rate,
    }
}

pub fn portfolios() -> Vec<Portfolio> {
    vec![
        portfolio_entry(ALL_PORTFOLIOS, "All Portfolios", "Combined view of all APIs", 25, 1_250_000, 98.7),
        portfolio_entry("payment", "Payment Services", "Payment gateway and transaction APIs", 8, 850_000, 99.2),
        portfolio_entry("auth", "Authentication", "User authentication and authorization", 5, 200_000, 99.8),
        portfolio_entry("inventory", "Inventory Management", "Product and stock management APIs", 6, 150_000, 97.5),
        portfolio_entry("analytics", "Analytics", "Data analysis and reporting APIs", 6, 50_000, 98.9),
    ]
}

/// Per-API statistics, stamped as updated at `now`
pub fn api_stats(now: DateTime<Utc>) -> Vec<ApiStats> {
    let last_updated = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let api = |id: &str,
               name: &str,
               endpoint: &str,
               portfolio: &str,
               (success_rate, total_requests, total_errors): (f64, u64, u64),
               (avg_response_time, p95_response_time): (u32, u32),
               [success, redirect, client_error, server_error]: [u64; 4],
               uptime: f64| ApiStats {
        id: id.to_string(),
        name: name.to_string(),
        endpoint: endpoint.to_string(),
        portfolio: portfolio.to_string(),
        success_rate,
        total_requests,
        total_errors,
        avg_response_time,
        p95_response_time,
        status_codes: StatusCodeDistribution {
            success,
            redirect,
            client_error,
            server_error,
        },
        last_updated: last_updated.clone(),
        uptime,
    };

    vec![
        api(
            "api-001",
            "Process Payment",
            "/api/v1/payments/process",
            "payment",
            (99.5, 450_000, 2250),
            (145, 320),
            [447_750, 0, 1800, 450],
            99.9,
        ),
        api(
            "api-002",
            "User Login",
            "/api/v1/auth/login",
            "auth",
            (99.8, 120_000, 240),
            (85, 210),
            [119_760, 0, 192, 48],
            99.95,
        ),
        api(
            "api-003",
            "Get Product Details",
            "/api/v1/products/{id}",
            "inventory",
            (97.2, 80_000, 2240),
            (65, 180),
            [77_760, 0, 1792, 448],
            99.2,
        ),
        api(
            "api-004",
            "Generate Report",
            "/api/v1/analytics/report",
            "analytics",
            (98.7, 25_000, 325),
            (420, 980),
            [24_675, 0, 260, 65],
            98.5,
        ),
    ]
}

/// Build a dashboard snapshot for `range` ending at `now`.
///
/// `portfolio` narrows the API list; `None` and `"all"` keep every API.
pub fn generate<R: Rng + ?Sized>(
    range: TimeRange,
    portfolio: Option<&str>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<DashboardData, DashboardError> {
    let portfolios = portfolios();
    let selected = portfolio.filter(|id| *id != ALL_PORTFOLIOS);
    if let Some(id) = selected {
        if !portfolios.iter().any(|p| p.id == id) {
            return Err(DashboardError::UnknownPortfolio(id.to_string()));
        }
    }

    let api_list: Vec<ApiStats> = api_stats(now)
        .into_iter()
        .filter(|api| selected.map_or(true, |id| api.portfolio == id))
        .collect();

    let stamps = timestamps(range, now);
    let response_times = stamps
        .iter()
        .map(|timestamp| TimeRangeData {
            timestamp: timestamp.clone(),
            avg_response_time: rng.gen_range(50..250),
            p95: rng.gen_range(150..650),
            total_requests: rng.gen_range(100..1100),
            errors: rng.gen_range(0..20),
            success_rate: 95.0 + rng.gen::<f64>() * 4.0,
        })
        .collect();

    let throughput = stamps
        .into_iter()
        .map(|timestamp| ThroughputData {
            timestamp,
            requests_per_minute: rng.gen_range(200..1000),
            errors_per_minute: rng.gen_range(0..10),
        })
        .collect();

    let mut heatmap_data = Vec::with_capacity(DAYS.len() * 24);
    for day in DAYS {
        for hour in 0..24 {
            // Business hours carry more traffic
            let base = if (9..=17).contains(&hour) { 500 } else { 100 };
            heatmap_data.push(HeatmapData {
                hour,
                day: day.to_string(),
                value: rng.gen_range(0..1000) + base,
            });
        }
    }

    let status_codes = StatusCodeDistribution {
        success: rng.gen_range(80_000..170_000),
        redirect: rng.gen_range(0..5000),
        client_error: rng.gen_range(1000..4000),
        server_error: rng.gen_range(100..600),
    };

    debug!(
        "Generated {} dashboard data for portfolio {}",
        range,
        selected.unwrap_or(ALL_PORTFOLIOS)
    );

    Ok(DashboardData {
        summary: DashboardSummary::from_status_codes(&status_codes),
        portfolios,
        api_list,
        response_times,
        status_codes,
        throughput,
        heatmap_data,
    })
}

/// [`generate`] with the thread-local RNG at the current time
pub fn generate_dashboard_data(range: TimeRange, portfolio: Option<&str>) -> Result<DashboardData, DashboardError> {
    generate(range, portfolio, Utc::now(), &mut rand::thread_rng())
}
