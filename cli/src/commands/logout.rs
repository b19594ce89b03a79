//! `gondor logout` — revoke the access token and forget stored credentials.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Revoke the current token.
///
/// # Errors
///
/// Returns an error if nobody is logged in or the identity host refuses the
/// revocation.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let mut creds = app.credentials.write().await;
    if !creds.is_authenticated() {
        anyhow::bail!("not logged in");
    }
    let username = creds.username.clone();
    app.identity.revoke(&mut creds).await?;
    app.output.success(&format!("Logged out {username}"));
    Ok(ExitCode::SUCCESS)
}
