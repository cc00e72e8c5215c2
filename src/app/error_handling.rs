//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use tracing::error;

use crate::app::config::AppConfig;
use crate::error::Error;

/// Exit code for invalid arguments or configuration
pub const CONFIG_ERROR: i32 = 2;

/// Exit code for every other failure
pub const GENERAL_ERROR: i32 = 1;

/// Exit code matching the kind of `error`
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<Error>() {
        Some(err) if err.is_config() => CONFIG_ERROR,
        _ => GENERAL_ERROR,
    }
}

/// Handle fatal errors and exit with appropriate status code
///
/// A single message is printed; the error chain is added in verbose mode.
pub fn handle_fatal_error(error: anyhow::Error, config: &AppConfig) -> ! {
    error!("Fatal error: {:#}", error);

    eprintln!("Error: {error:#}");

    if config.show_error_chain() {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(exit_code(&error))
}
