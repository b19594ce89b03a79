//! `gondor login` — exchange a username and password for API tokens.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Username; prompted for when omitted
    #[arg(long, short, env = "GONDOR_USERNAME")]
    pub username: Option<String>,
}

/// Prompt for credentials and store the issued tokens.
///
/// # Errors
///
/// Returns an error if a user is already logged in, a prompt fails, or the
/// identity host rejects the credentials.
pub async fn run(app: &AppContext, args: LoginArgs) -> Result<ExitCode> {
    let mut creds = app.credentials().await;
    if creds.is_authenticated() {
        anyhow::bail!(
            "already logged in as {}; run 'gondor logout' first",
            creds.username
        );
    }

    let username = match args.username {
        Some(name) => name,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .context("reading username")?,
    };
    let password = dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .context("reading password")?;

    app.identity
        .authenticate(&mut creds, &username, &password)
        .await?;
    *app.credentials.write().await = creds;

    app.output.success(&format!("Logged in as {username}"));
    Ok(ExitCode::SUCCESS)
}
