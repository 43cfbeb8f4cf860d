use std::{env, time::Duration};

use anyhow::Context as _;

use rusty_interactivity::{CleanupPolicy, WrapPolicy};
use rusty_utils::parse::convert_or;

/// Default timeout for pagination and collection sessions.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Runtime settings read from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    /// Discord bot token (`DISCORD_TOKEN`).
    pub token: String,
    /// Idle timeout for pagination sessions (`PAGINATION_TIMEOUT_SECS`).
    pub pagination_timeout: Duration,
    /// Default wrap policy (`PAGINATION_WRAP`).
    pub wrap: WrapPolicy,
    /// Default cleanup policy (`PAGINATION_CLEANUP`).
    pub cleanup: CleanupPolicy,
}

impl Config {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = lookup("DISCORD_TOKEN").context("DISCORD_TOKEN is not set")?;

        let raw_timeout = lookup("PAGINATION_TIMEOUT_SECS");
        let timeout_secs = convert_or(raw_timeout.as_deref(), DEFAULT_TIMEOUT_SECS)
            .filter(|secs| *secs > 0)
            .with_context(|| {
                format!(
                    "PAGINATION_TIMEOUT_SECS must be a positive integer, got `{}`",
                    raw_timeout.as_deref().unwrap_or_default()
                )
            })?;

        let wrap = match lookup("PAGINATION_WRAP") {
            Some(raw) => raw.parse::<WrapPolicy>().context("invalid PAGINATION_WRAP")?,
            None => WrapPolicy::default(),
        };

        let cleanup = match lookup("PAGINATION_CLEANUP") {
            Some(raw) => raw.parse::<CleanupPolicy>().context("invalid PAGINATION_CLEANUP")?,
            None => CleanupPolicy::default(),
        };

        Ok(Self {
            token,
            pagination_timeout: Duration::from_secs(timeout_secs),
            wrap,
            cleanup,
        })
    }
}
