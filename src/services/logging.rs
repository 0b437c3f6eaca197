// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Tracing setup and log redaction helpers.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Map a `-v` count to the default tracing level. `RUST_LOG` still wins.
pub const fn verbosity_level(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Install the global tracing subscriber.
pub fn init(verbosity: u8) -> Result<()> {
    let fmt_layer = fmt::layer().with_target(false);

    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(verbosity_level(verbosity).into())
        .from_env_lossy();

    let subscriber = Registry::default().with(fmt_layer).with(env_filter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}

/// Redact a username for logging.
/// Shows the first character and hides the rest: "a***"
pub fn redact_username(username: &str) -> String {
    match username.chars().next() {
        Some(first) => format!("{first}***"),
        None => "***".to_string(),
    }
}
