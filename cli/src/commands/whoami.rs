//! `gondor whoami`

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Print the logged-in username.
///
/// # Errors
///
/// Returns an error if nobody is logged in.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let creds = app.credentials().await;
    if !creds.is_authenticated() {
        anyhow::bail!("not logged in");
    }
    println!("{}", creds.username);
    Ok(ExitCode::SUCCESS)
}
