//! Error handling for the epitaph service.
//! Defines the error types and result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// Errors raised inside the epitaph service.
///
/// Only startup surfaces these to the operator. Per-request failures
/// (`UserNotFound`, `StoreUnavailable`, `TemplateError`) are recovered into
/// literal fallback output by the component that observes them.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// The user store is missing or could not be parsed
    #[error("User store unavailable: {0}.")]
    StoreUnavailable(String),

    /// No stored record matches the requested username
    #[error("User not found: '{0}'.")]
    UserNotFound(String),

    /// Template compilation or evaluation failed
    #[error("Template error: {0}.")]
    TemplateError(#[from] minijinja::Error),

    /// Invalid process configuration
    #[error("Configuration error: {0}.")]
    ConfigError(String),
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
