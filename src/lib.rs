//! # insights-report
//!
//! Builds periodic reports from a monitoring API hook. Events and metrics are
//! paged through concurrently, folded into running statistics globally and per
//! tag or footprint, and rendered through a template.
//!
//! ## Usage
//!
//! ```bash
//! insights-report create --start 2024/01/01 [--end 2024/01/31] --hook <url> [-T weekly.html] [-o out.txt]
//! ```
//!
//! ## Modules
//!
//! - `app` - Application configuration, logging and fatal error handling
//! - `cli` - Command-line arguments and the `create` command
//! - `error` - Error type shared by the library
//! - `monitor` - Pagination, aggregation, report assembly and rendering
pub mod app;
pub mod cli;
pub mod error;
pub mod monitor;
