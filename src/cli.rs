//! Command-line interface implementation for epitaph.
//! Every option can also be supplied through the environment, which is how
//! the service is configured when deployed for a challenge session.

use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::config::{parse_switch, DEFAULT_FUEL, DEFAULT_RENDER_TIMEOUT_MS};

/// Command-line arguments structure for epitaph.
#[derive(Parser, Debug)]
#[command(author, version, about = "epitaph: tombstone preview service", long_about = None)]
pub struct Args {
    /// Address the HTTP server listens on
    #[arg(long, env = "EPITAPH_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Evaluate submitted epitaphs as templates (1, true, on, yes, y, sim)
    #[arg(
        long,
        env = "CHALLENGE_MODE",
        default_value = "on",
        action = ArgAction::Set,
        value_parser = parse_challenge_mode
    )]
    pub challenge_mode: bool,

    /// Release identifier reported by /healthz and /.well-known/meta
    #[arg(long, env = "RELEASE_SHA", default_value = "")]
    pub release: String,

    /// Support contact reported by /.well-known/meta
    #[arg(long, env = "SUPPORT_EMAIL", default_value = "suporte@example.com")]
    pub support: String,

    /// Path to the user store (JSON or YAML list of users)
    #[arg(long, env = "EPITAPH_USERS", default_value = "data/users.json")]
    pub users: PathBuf,

    /// Evaluation budget for challenge-mode templates
    #[arg(long, env = "EPITAPH_FUEL", default_value_t = DEFAULT_FUEL)]
    pub fuel: u64,

    /// Wall-clock limit for one challenge-mode evaluation, in milliseconds
    #[arg(
        long,
        env = "EPITAPH_RENDER_TIMEOUT_MS",
        default_value_t = DEFAULT_RENDER_TIMEOUT_MS
    )]
    pub render_timeout_ms: u64,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_challenge_mode(value: &str) -> Result<bool, String> {
    Ok(parse_switch(value))
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if an argument is invalid and help was printed
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::ValueValidation {
                eprintln!("{e}");
                let _ = Args::command().print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
