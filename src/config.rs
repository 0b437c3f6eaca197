// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Process configuration from command-line flags and environment variables.

use crate::app::VERSION;
use crate::services::auth::AuthConfig;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::env;
use std::time::Duration;

/// `DATABASE_URL` value that selects the in-memory user store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// Longest accepted session lifetime, in days.
pub const MAX_SESSION_MAX_AGE_DAYS: u64 = 3650;

const PRODUCTION: &str = "production";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "local-login",
    version = VERSION,
    about = "Username/password login demo with server-side sessions"
)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// PostgreSQL connection string, or `memory://` for an in-process store
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Deployment environment; `production` skips `.env` and marks cookies Secure
    #[arg(long, env = "APP_ENV", default_value = "development")]
    pub app_env: String,

    /// Session lifetime in days
    #[arg(
        long,
        env = "SESSION_MAX_AGE_DAYS",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..=MAX_SESSION_MAX_AGE_DAYS)
    )]
    pub session_max_age_days: u64,

    /// How often expired sessions are pruned, in seconds
    #[arg(
        long,
        env = "SESSION_PRUNE_INTERVAL_SECS",
        default_value_t = 600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub session_prune_interval_secs: u64,

    /// Verbosity: -v for DEBUG, -vv for TRACE (default: INFO). RUST_LOG overrides.
    #[arg(short, long = "verbose", action = ArgAction::Count)]
    pub verbosity: u8,
}

/// Where users are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres(String),
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.app_env == PRODUCTION
    }

    pub fn store_backend(&self) -> StoreBackend {
        if self.database_url == MEMORY_DATABASE_URL {
            StoreBackend::Memory
        } else {
            StoreBackend::Postgres(self.database_url.clone())
        }
    }

    pub fn session_prune_interval(&self) -> Duration {
        Duration::from_secs(self.session_prune_interval_secs)
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            session_max_age_days: self.session_max_age_days,
            secure_cookies: self.is_production(),
        }
    }
}

/// Load `.env` into the process environment unless `APP_ENV` is `production`.
/// Runs before flag parsing so `.env` values act as environment fallbacks.
/// A missing `.env` file is not an error.
pub fn load_dotenv() -> Result<()> {
    if env::var("APP_ENV").is_ok_and(|v| v == PRODUCTION) {
        return Ok(());
    }

    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["local-login"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).expect("Failed to parse arguments")
    }

    #[test]
    fn test_explicit_flags() {
        let config = parse(&[
            "--port",
            "8080",
            "--database-url",
            "postgres://user:pw@localhost/app",
            "--app-env",
            "production",
            "--session-max-age-days",
            "7",
            "--session-prune-interval-secs",
            "30",
            "-vv",
        ]);

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.store_backend(),
            StoreBackend::Postgres("postgres://user:pw@localhost/app".to_string())
        );
        assert!(config.is_production());
        assert_eq!(config.session_prune_interval(), Duration::from_secs(30));
        assert_eq!(config.verbosity, 2);

        let auth = config.auth_config();
        assert_eq!(auth.session_max_age_days, 7);
        assert!(auth.secure_cookies);
    }

    #[test]
    fn test_memory_backend() {
        let config = parse(&["--database-url", "memory://", "--app-env", "development"]);
        assert_eq!(config.store_backend(), StoreBackend::Memory);
        assert!(!config.is_production());
        assert!(!config.auth_config().secure_cookies);
    }

    #[test]
    fn test_zero_prune_interval_is_rejected() {
        let result = Config::try_parse_from([
            "local-login",
            "--database-url",
            "memory://",
            "--session-prune-interval-secs",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_session_max_age_days_bounds() {
        let parse_max_age = |days: &str| {
            Config::try_parse_from([
                "local-login",
                "--database-url",
                "memory://",
                "--session-max-age-days",
                days,
            ])
        };

        assert!(parse_max_age("0").is_err());
        assert!(parse_max_age("200000000000").is_err());
        assert!(parse_max_age(&(MAX_SESSION_MAX_AGE_DAYS + 1).to_string()).is_err());

        let config = parse_max_age(&MAX_SESSION_MAX_AGE_DAYS.to_string()).unwrap();
        assert_eq!(
            config.auth_config().session_max_age_millis(),
            MAX_SESSION_MAX_AGE_DAYS as i64 * 86_400_000
        );
    }

    #[test]
    fn test_environment_variable_names() {
        use clap::CommandFactory;

        let command = Config::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|name| name.to_string_lossy().into_owned())
        };

        assert_eq!(env_of("database_url").as_deref(), Some("DATABASE_URL"));
        assert_eq!(env_of("app_env").as_deref(), Some("APP_ENV"));
        assert_eq!(env_of("port").as_deref(), Some("PORT"));
    }

    #[test]
    fn test_command_metadata() {
        use clap::CommandFactory;

        let command = Config::command();
        assert_eq!(command.get_name(), "local-login");
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(VERSION.to_string())
        );
        command.debug_assert();
    }
}
