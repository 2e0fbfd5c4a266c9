//! Epitaph renders custom tombstone epitaphs into an HTML preview page.
//! By default the submitted epitaph is shown as literal text. In challenge mode
//! it is evaluated as a template behind a deliberately incomplete blocklist,
//! as a target for template-injection exercises.

/// Command-line and environment configuration
pub mod cli;

/// Immutable process configuration
pub mod config;

/// Evaluation context exposed to epitaph templates
pub mod context;

/// Error types and handling for the epitaph service
pub mod error;

/// Blocklist filter applied before template evaluation
pub mod filter;

/// Logger setup
pub mod logger;

/// Page templates
pub mod pages;

/// Safe and challenge-mode epitaph rendering
pub mod preview;

/// Bounded template evaluation
pub mod renderer;

/// HTTP routes and middleware
pub mod server;

/// User store adapter
pub mod store;
