//! Exam portal API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p portal-api
//! ```
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honored in development).

use portal_common::{try_init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Run the server
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first; tracing verbosity depends on the environment
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    if let Err(e) = try_init_tracing(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        address = %config.server.address(),
        "Configuration loaded"
    );

    portal_api::run(config).await?;

    Ok(())
}
