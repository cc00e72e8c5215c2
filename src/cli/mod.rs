//! CLI command handlers
//!
//! This module contains all CLI-related functionality including:
//! - Argument parsing structures
//! - The `create` command implementation
//! - Command routing

pub mod args;
pub mod create;
pub mod router;

// Re-export the main CLI structures for convenience
pub use args::{Cli, Commands, CreateArgs};
pub use router::execute_command;
