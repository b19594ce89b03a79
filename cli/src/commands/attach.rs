//! `gondor attach` — attach to an already-issued execution endpoint.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::commands::finish_attach;

/// Arguments for the attach command.
#[derive(Args)]
pub struct AttachArgs {
    /// Execution endpoint (host[:port])
    pub endpoint: String,

    /// Do not allocate a TTY even when stdin is a terminal
    #[arg(long)]
    pub no_tty: bool,
}

/// Attach and exit with the remote process's exit code.
///
/// # Errors
///
/// Attach failures are reported and mapped to an exit code; this never
/// returns `Err`.
pub async fn run(app: &AppContext, args: AttachArgs) -> Result<ExitCode> {
    let outcome = app
        .attach_orchestrator()
        .run(&args.endpoint, !args.no_tty)
        .await;
    Ok(finish_attach(&app.output, &outcome))
}
