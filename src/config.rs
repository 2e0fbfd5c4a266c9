//! Process configuration for the epitaph service.
//! Loaded once at startup from [`Args`] and shared read-only with every
//! request handler.

use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Args;

/// Values accepted as "enabled" for boolean switches, compared case-insensitively.
pub const TRUTHY: [&str; 6] = ["1", "true", "on", "yes", "y", "sim"];

/// Name reported by `/.well-known/meta`.
pub const SERVICE_NAME: &str = "gerador-lapide";

/// Default evaluation budget for challenge-mode templates.
pub const DEFAULT_FUEL: u64 = 5_000;

/// Default wall-clock limit for one challenge-mode evaluation, in milliseconds.
pub const DEFAULT_RENDER_TIMEOUT_MS: u64 = 2_000;

/// Interprets a switch value such as `CHALLENGE_MODE`.
pub fn parse_switch(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    TRUTHY.contains(&value.as_str())
}

/// Release metadata exposed to templates and health endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meta {
    pub release: String,
    pub support: String,
}

/// Immutable service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub challenge_mode: bool,
    pub meta: Meta,
    pub users_path: PathBuf,
    pub fuel: u64,
    pub render_timeout: Duration,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            bind: args.bind,
            challenge_mode: args.challenge_mode,
            meta: Meta {
                release: args.release.clone(),
                support: args.support.clone(),
            },
            users_path: args.users.clone(),
            fuel: args.fuel,
            render_timeout: Duration::from_millis(args.render_timeout_ms),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            challenge_mode: true,
            meta: Meta {
                release: String::new(),
                support: "suporte@example.com".to_string(),
            },
            users_path: PathBuf::from("data/users.json"),
            fuel: DEFAULT_FUEL,
            render_timeout: Duration::from_millis(DEFAULT_RENDER_TIMEOUT_MS),
        }
    }
}
