//! Serve command implementation

use crate::cli::ServeArgs;
use crate::config::Settings;
use crate::server;

/// Run the API server until interrupted
pub async fn run_serve(args: &ServeArgs, settings: &Settings) -> anyhow::Result<()> {
    server::serve(settings, args.bind.as_deref()).await?;
    Ok(())
}
