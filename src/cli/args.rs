//! CLI argument structures
//!
//! This module defines the command-line interface of the report generator.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::monitor::{EVENTS_PAGE_SIZE, METRICS_PAGE_SIZE};

/// Generate event and metric reports from a monitoring API hook
#[derive(Parser)]
#[command(name = "insights-report")]
#[command(about = "insights-report - Aggregate monitoring events and metrics into a report", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Creates a report
    #[command(name = "create")]
    Create(CreateArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct CreateArgs {
    /// The start date in the YYYY/MM/DD format
    #[arg(short = 's', long)]
    pub start: String,

    /// The end date in the YYYY/MM/DD format (defaults to today)
    #[arg(short = 'e', long)]
    pub end: Option<String>,

    /// The monitoring API hook URL
    #[arg(short = 'k', long)]
    pub hook: String,

    /// The template file name within the templates directory
    #[arg(short = 'T', long)]
    pub template: Option<PathBuf>,

    /// Directory templates are looked up in
    #[arg(long, default_value = "templates")]
    pub templates_dir: PathBuf,

    /// Output file name
    #[arg(short = 'o', long, default_value = "out.txt")]
    pub output: PathBuf,

    /// Number of events requested per page
    #[arg(long, default_value_t = EVENTS_PAGE_SIZE)]
    pub events_page_size: usize,

    /// Number of metrics requested per page
    #[arg(long, default_value_t = METRICS_PAGE_SIZE)]
    pub metrics_page_size: usize,
}
