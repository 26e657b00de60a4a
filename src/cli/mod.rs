// ABOUTME: CLI argument parsing and command routing for gatewise
//
// Drives the onboarding wizard against the durable store:
// - Inspecting steps and records (steps, show, template)
// - Editing records (set)
// - Moving through the wizard (next, prev, goto)
// - Finishing (review, deploy)
// - Session handling (login, logout, reset)
// - Demo traffic analytics (dashboard)

pub mod dashboard;
pub mod form;
pub mod navigate;
pub mod review;
pub mod session;
pub mod steps;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use gatewise::auth::{AuthGate, SessionAuth};
use gatewise::config::AppConfig;
use gatewise::dashboard::TimeRange;
use gatewise::routing::Router;
use gatewise::store::SharedStore;
use gatewise::wizard::{FlowController, StepId};

/// Gateway onboarding wizard
#[derive(Parser)]
#[command(name = "gatewise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the wizard steps with their completion state
    Steps,

    /// Print the stored record for a step
    Show(StepArgs),

    /// Print the initial record for a step
    Template(StepArgs),

    /// Store a record for a step
    Set(SetArgs),

    /// Submit the stored record and advance
    Next(LocationArgs),

    /// Go back one step
    Prev(LocationArgs),

    /// Navigate directly to a location
    Goto(GotoArgs),

    /// Summarise the configuration before deployment
    Review,

    /// Run the deployment and complete the final step
    Deploy,

    /// Sign in
    Login(LoginArgs),

    /// Sign out and clear all wizard state
    Logout,

    /// Clear all wizard state but keep the session
    Reset,

    /// Show demo traffic analytics for the gateway
    Dashboard(DashboardArgs),
}

/// A single step, given as `3`, `step3` or `/onboard/step3`
#[derive(clap::Args)]
pub struct StepArgs {
    pub step: StepId,
}

/// Arguments for the set command
#[derive(clap::Args)]
#[command(group(clap::ArgGroup::new("source").required(true).args(["json", "file"])))]
pub struct SetArgs {
    pub step: StepId,

    /// Record as inline JSON
    #[arg(long)]
    pub json: Option<String>,

    /// Read the record from a JSON file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Current location for next/prev
#[derive(clap::Args)]
pub struct LocationArgs {
    /// Location the wizard is currently at
    #[arg(long, default_value = "/onboard/step1")]
    pub at: String,
}

#[derive(clap::Args)]
pub struct GotoArgs {
    pub path: String,
}

#[derive(clap::Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct DashboardArgs {
    /// live, daily, weekly, monthly or yearly
    #[arg(long, default_value = "daily")]
    pub range: TimeRange,

    /// Only list APIs in this portfolio
    #[arg(long)]
    pub portfolio: Option<String>,
}

/// Everything a command needs, built once per invocation
pub struct CliContext {
    pub config: AppConfig,
    pub store: SharedStore,
}

impl CliContext {
    pub const fn new(config: AppConfig, store: SharedStore) -> Self {
        Self { config, store }
    }

    pub fn controller(&self) -> FlowController {
        FlowController::from_store(self.store.clone(), self.config.wizard.navigation)
    }

    pub fn auth(&self) -> SessionAuth {
        SessionAuth::new(self.store.clone(), self.config.wizard.login_delay())
    }

    pub const fn router(&self) -> Router {
        Router::new(self.config.wizard.require_auth)
    }

    /// Refuse wizard changes without a session when login gating is on
    pub fn ensure_session(&self) -> Result<()> {
        if self.config.wizard.require_auth && !self.auth().is_authenticated() {
            bail!("Not signed in. Run 'gatewise login --email <email> --password <password>' first.");
        }
        Ok(())
    }
}

/// Dispatch a parsed command
pub async fn execute(ctx: &CliContext, command: Commands, format: OutputFormat) -> Result<()> {
    match command {
        Commands::Steps => steps::execute(ctx, format),
        Commands::Show(args) => form::show(ctx, &args, format),
        Commands::Template(args) => form::template(&args, format),
        Commands::Set(args) => form::set(ctx, args, format),
        Commands::Next(args) => navigate::next(ctx, &args, format).await,
        Commands::Prev(args) => navigate::prev(ctx, &args, format),
        Commands::Goto(args) => navigate::goto(ctx, &args, format),
        Commands::Review => review::execute(ctx, format),
        Commands::Deploy => review::deploy(ctx, format).await,
        Commands::Login(args) => session::login(ctx, &args, format).await,
        Commands::Logout => session::logout(ctx, format),
        Commands::Reset => session::reset(ctx, format),
        Commands::Dashboard(args) => dashboard::execute(&args, format),
    }
}

/// Pretty-print any serializable value
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_step_argument_forms() {
        for arg in ["3", "step3", "/onboard/step3"] {
            let cli = Cli::try_parse_from(["gatewise", "show", arg]).unwrap();
            match cli.command {
                Commands::Show(args) => assert_eq!(args.step, StepId::AuthSetup),
                _ => panic!("expected show"),
            }
        }
        assert!(Cli::try_parse_from(["gatewise", "show", "7"]).is_err());
    }

    #[test]
    fn test_set_requires_a_source() {
        assert!(Cli::try_parse_from(["gatewise", "set", "1"]).is_err());
        assert!(Cli::try_parse_from(["gatewise", "set", "1", "--json", "{}", "--file", "x"]).is_err());
        assert!(Cli::try_parse_from(["gatewise", "set", "1", "--json", "{}"]).is_ok());
    }

    #[test]
    fn test_global_format_and_default_location() {
        let cli = Cli::try_parse_from(["gatewise", "next", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Next(args) => assert_eq!(args.at, "/onboard/step1"),
            _ => panic!("expected next"),
        }
    }

    #[test]
    fn test_parse_dashboard_range() {
        let cli = Cli::try_parse_from(["gatewise", "dashboard"]).unwrap();
        match cli.command {
            Commands::Dashboard(args) => {
                assert_eq!(args.range, TimeRange::Daily);
                assert_eq!(args.portfolio, None);
            }
            _ => panic!("expected dashboard"),
        }

        let cli = Cli::try_parse_from(["gatewise", "dashboard", "--range", "live", "--portfolio", "payment"]).unwrap();
        match cli.command {
            Commands::Dashboard(args) => {
                assert_eq!(args.range, TimeRange::Live);
                assert_eq!(args.portfolio.as_deref(), Some("payment"));
            }
            _ => panic!("expected dashboard"),
        }
        assert!(Cli::try_parse_from(["gatewise", "dashboard", "--range", "custom"]).is_err());
    }

    #[test]
    fn test_ensure_session_respects_gating() {
        let (_, mut ctx) = test_support::context();
        assert!(ctx.ensure_session().is_err());

        ctx.config.wizard.require_auth = false;
        assert!(ctx.ensure_session().is_ok());

        let (_, ctx) = test_support::signed_in();
        assert!(ctx.ensure_session().is_ok());
    }
}
