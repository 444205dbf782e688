//! Upkeep - A maintenance window alert engine.
//!
//! Upkeep watches the scheduled maintenance windows of an application and
//! decides, on an adaptive polling schedule, which of them must currently
//! be surfaced as alerts, whether those alerts can be dismissed, and
//! whether the application must be fully locked.
//!
//! # Overview
//!
//! The engine periodically fetches maintenance window records from a
//! remote maintenance service and evaluates them against the current time
//! and the locally stored dismissal history. The outcome of each cycle is
//! an [`alerts::EvaluationResult`]: the ordered set of visible alerts plus
//! the maintenance, system-maintenance, full-lock, and dismissibility
//! flags a presentation layer needs to render the alert surface.
//!
//! # Features
//!
//! - **Adaptive Polling**: evaluates every 5 minutes for the first half
//!   hour after startup, then every 30 minutes
//! - **Lock Enforcement**: an active, non-dismissible, system-scoped
//!   window fully locks the application and cannot be dismissed
//! - **Dismissal Frequencies**: per-record `Every Visit`, `Daily`, and
//!   `Weekly` re-alert policies, compared at calendar-date granularity
//! - **Durable Dismissals**: last-dismissed dates survive restarts via a
//!   JSON file in the data directory
//! - **Fail-Soft Fetching**: an unreachable service or a malformed record
//!   degrades the surface, never the process
//! - **YAML Configuration**: simple configuration file with environment
//!   variable overrides
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! source:
//!   url: "https://ops.example.com"
//!   api_key: "abc123xyz"
//!
//! app:
//!   context: "Sales"
//!   home: "Welcome"
//! ```
//!
//! Override any value with `UPKEEP_`-prefixed environment variables:
//!
//! ```bash
//! export UPKEEP_SOURCE__API_KEY="abc123xyz"
//! ```
//!
//! # Usage
//!
//! ```bash
//! upkeep --config config.yaml --data ./upkeep-data
//! ```
//!
//! # Architecture
//!
//! - [`alerts`] - evaluation pipeline, dismissal store, poll scheduler,
//!   and the engine facade
//! - [`config`] - YAML configuration with environment variable support
//! - [`maintenance`] - maintenance service API client and record
//!   conversion
//! - [`utils`] - path handling helpers
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use crate::{
    alerts::MaintenanceEngine, config::Config, maintenance::MaintenanceRequester, utils::get_path,
};

mod alerts;
mod config;
mod maintenance;
mod utils;

/// Command-line arguments for the upkeep engine.
///
/// Most configuration is done through the YAML file (see [`config::Config`]).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// The configuration file contains the maintenance service settings
    /// and the application identity. See the [`config`] module for the
    /// expected format.
    #[arg(short, long)]
    config: String,

    /// Path to the directory for storing persistent data.
    ///
    /// This directory will contain:
    /// - `dismissals` - JSON file with last-dismissed dates per window
    #[arg(short, long)]
    data: String,
}

/// Main entry point for the upkeep engine.
///
/// Initializes logging, loads the configuration, builds the engine, and
/// runs it until the process receives Ctrl-C. Configuration errors are
/// logged and abort startup; runtime fetch errors are logged by the
/// engine and never stop it.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting upkeep {}...", env!("CARGO_PKG_VERSION"));

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration from YAML file with environment variable overrides
    let mut config: Config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    // Normalize service URL by removing trailing slash if present
    if config.source.url.ends_with('/') {
        config.source.url.pop();
    }

    let requester = MaintenanceRequester::new(&config.source.url, &config.source.api_key);
    let mut engine = MaintenanceEngine::new(
        requester,
        config.app.clone(),
        get_path(&args.data, "dismissals"),
    )
    .await;

    // Surface every published evaluation in the log; a real host
    // application would render this instead
    engine.start(|result| {
        if result.visible.is_empty() {
            info!("no maintenance alerts to surface");
            return;
        }
        info!(
            "{}: {} alert(s), in_maintenance={}, full_lock={}, dismissible={}",
            result.title,
            result.visible.len(),
            result.is_in_maintenance,
            result.is_full_lock,
            result.is_dismissible
        );
        for alert in &result.visible {
            info!(
                "  [{}] {} ({} -> {}) dismissible={} {}",
                alert.window.id,
                alert.window.subject,
                alert.start_label,
                alert.end_label,
                alert.dismissible,
                alert.badge_label
            );
        }
    });

    // Warm up navigation so an unresolved home application shows up in
    // the log at startup rather than on first use
    match engine.navigate().await {
        Ok(app_id) => info!("home application resolved to {}", app_id),
        Err(e) => warn!("navigation unavailable: {}", e),
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    let result = engine.current().await;
    info!(
        "shutting down with {} visible alert(s)",
        result.visible.len()
    );
    engine.stop();
}
