// ABOUTME: CLI session commands - login, logout and reset

use anyhow::{bail, Result};
use serde_json::json;

use super::{print_json, CliContext, LoginArgs, OutputFormat};
use gatewise::auth::AuthGate;

pub async fn login(ctx: &CliContext, args: &LoginArgs, format: OutputFormat) -> Result<()> {
    let auth = ctx.auth();
    if !auth.login(&args.email, &args.password).await {
        bail!("Login failed. Please try again.");
    }

    match format {
        OutputFormat::Json => print_json(&json!({ "email": auth.user() }))?,
        OutputFormat::Text => println!("Signed in as {}", args.email.trim()),
    }
    Ok(())
}

pub fn logout(ctx: &CliContext, format: OutputFormat) -> Result<()> {
    let auth = ctx.auth();
    auth.logout();

    match format {
        OutputFormat::Json => print_json(&json!({ "authenticated": auth.is_authenticated() }))?,
        OutputFormat::Text => println!("Signed out. Wizard progress cleared."),
    }
    Ok(())
}

pub fn reset(ctx: &CliContext, format: OutputFormat) -> Result<()> {
    ctx.controller().forms().clear_all();

    match format {
        OutputFormat::Json => print_json(&json!({ "cleared": true }))?,
        OutputFormat::Text => println!("Wizard progress cleared."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support;
    use gatewise::store::{KeyValueStore, STEPS_KEY};

    #[tokio::test]
    async fn test_login_then_logout() {
        let (store, ctx) = test_support::context();
        let args = LoginArgs {
            email: "ops@example.com".to_string(),
            password: "secret".to_string(),
        };
        login(&ctx, &args, OutputFormat::Json).await.unwrap();
        assert!(ctx.ensure_session().is_ok());

        store.set("formState_step1", "{}").unwrap();
        logout(&ctx, OutputFormat::Json).unwrap();

        assert!(ctx.ensure_session().is_err());
        assert!(store.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_with_blank_password_fails() {
        let (_, ctx) = test_support::context();
        let args = LoginArgs {
            email: "ops@example.com".to_string(),
            password: String::new(),
        };
        assert!(login(&ctx, &args, OutputFormat::Text).await.is_err());
    }

    #[test]
    fn test_reset_keeps_session() {
        let (store, ctx) = test_support::signed_in();
        store.set("formState_step2", "{}").unwrap();
        store.set(STEPS_KEY, "[]").unwrap();

        reset(&ctx, OutputFormat::Text).unwrap();

        assert!(ctx.ensure_session().is_ok());
        assert!(store.get("formState_step2").unwrap().is_none());
        assert!(store.get(STEPS_KEY).unwrap().is_none());
    }
}
