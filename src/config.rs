//! Server configuration loaded from the environment.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `METRYCS_PORT` | `3000` | TCP port to listen on |
//! | `METRYCS_SEED` | unset | Fixed RNG seed; every request then returns the same figures |
//! | `METRYCS_DEMO_EVENTS` | `true` | Seed the registry with demo events at startup |

use std::env;

use anyhow::Context;

/// Default port if not specified via environment variable.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub seed: Option<u64>,
    pub demo_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            seed: None,
            demo_events: true,
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup, for testing.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("METRYCS_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("METRYCS_PORT is not a valid port: {raw}"))?,
            None => defaults.port,
        };

        let seed = lookup("METRYCS_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("METRYCS_SEED is not a valid u64: {raw}"))
            })
            .transpose()?;

        let demo_events = match lookup("METRYCS_DEMO_EVENTS") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("METRYCS_DEMO_EVENTS is not a boolean: {raw}"))?,
            None => defaults.demo_events,
        };

        Ok(Self {
            port,
            seed,
            demo_events,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
