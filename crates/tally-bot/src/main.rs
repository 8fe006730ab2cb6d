//! Reaction tally agent entry point
//!
//! Run with:
//! ```bash
//! cargo run -p tally-bot
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use tally_common::{try_init_tracing_with_config, AppConfig, AppError, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env();

    // Initialize tracing
    let tracing_config = config.as_ref().map_or_else(
        |_| TracingConfig::default(),
        |c| TracingConfig::for_environment(c.app.env),
    );
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            let e = AppError::from(e);
            error!(error = %e, code = e.error_code(), "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        env = ?config.app.env,
        domain = %config.instance.domain,
        "Configuration loaded"
    );

    tokio::select! {
        result = tally_bot::run(config) => {
            if let Err(e) = result {
                error!(error = %e, code = e.error_code(), "Agent stopped");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }
}
