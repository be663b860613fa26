//! `fieldcrypt-svc`: service binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured JSON logging.
//! 3. Resolve the master key; any key error aborts startup.
//! 4. Run the encryption self-test and build the status report.
//! 5. Build the Axum router and start the HTTP server.

mod config;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use fieldcrypt::{status_report, KeyProvider};
use tracing::{error, info};

use crate::config::Config;
use crate::server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        app_env = %cfg.app_env,
        node_env = cfg.node_env.as_deref().unwrap_or(""),
        "fieldcrypt-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Master key
    // -----------------------------------------------------------------------
    let provider = Arc::new(KeyProvider::new(cfg.key_settings()));
    let cipher = provider
        .cipher()
        .context("master encryption key unavailable")?;

    // -----------------------------------------------------------------------
    // 4. Self-test + status report
    // -----------------------------------------------------------------------
    let status = {
        let provider = Arc::clone(&provider);
        tokio::task::spawn_blocking(move || status_report(&provider))
            .await
            .context("status report task failed")?
    };
    if status.self_test_passed {
        info!(
            enabled = status.enabled,
            key_configured = status.key_configured,
            "encryption self-test passed"
        );
    } else {
        error!("encryption self-test failed; service will report not ready");
    }

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(cipher, status);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
