// SPDX-License-Identifier: MIT OR Apache-2.0
//! `splicer`: JSON line host for the Splicer scheduler and sequencer.
//!
//! Usage: `splicer [CONFIG.ron]`. Commands are read from stdin, one JSON
//! object per line; each gets one JSON reply on stdout. Logs go to stderr.

use splicer_host::{start_session, Dispatcher, HostConfig};
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    let config_path = std::env::args_os().nth(1);
    let loaded = match &config_path {
        Some(path) => HostConfig::load(Path::new(path)),
        None => Ok(HostConfig::default()),
    };

    let directive = match &loaded {
        Ok(config) => config.log_filter.as_str(),
        Err(_) => splicer_host::DEFAULT_LOG_FILTER,
    };
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    match directive.parse() {
        Ok(directive) => env_filter = env_filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring log filter {directive:?}: {e}"),
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Splicer v{}", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    let base_dir = config_path
        .as_deref()
        .and_then(|path| Path::new(path).parent())
        .unwrap_or_else(|| Path::new("."));

    let session = match start_session(&config, base_dir) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Failed to start session: {e}");
            std::process::exit(1);
        }
    };

    let mut dispatcher = Dispatcher::new(session);
    let stdin = std::io::stdin();
    match splicer_host::serve(&mut dispatcher, stdin.lock(), std::io::stdout().lock()) {
        Ok(handled) => tracing::info!(handled, "Input closed, shutting down"),
        Err(e) => {
            tracing::error!("I/O failure: {e}");
            std::process::exit(1);
        }
    }
}
