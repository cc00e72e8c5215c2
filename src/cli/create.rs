//! The `create` command
//!
//! Validates the arguments into a [`ReportConfig`], assembles the report
//! and writes it out.

use anyhow::{Context, Result};
use chrono::Local;
use std::sync::Arc;

use crate::cli::args::CreateArgs;
use crate::monitor::export::{render_report, write_output};
use crate::monitor::{HttpInsightsApi, InsightsApi, ReportAssembler, ReportConfig, TimeFrame};

/// Turns `create` arguments into a validated configuration
pub fn build_config(args: &CreateArgs) -> crate::error::Result<ReportConfig> {
    let today = Local::now().date_naive();
    let timeframe = TimeFrame::parse(&args.start, args.end.as_deref(), today)?;

    ReportConfig::new(timeframe, &args.hook, args.output.clone())?
        .with_template(args.templates_dir.clone(), args.template.clone())
        .with_page_sizes(args.events_page_size, args.metrics_page_size)
}

/// Runs `create` against the HTTP API named by the hook
pub async fn run_create(args: CreateArgs) -> Result<()> {
    let config = build_config(&args)?;
    let api = Arc::new(HttpInsightsApi::new(&config.hook));
    create_report(api, &config).await
}

/// Assembles, renders and writes one report.
///
/// Write failures are logged only and do not fail the command.
pub async fn create_report(api: Arc<dyn InsightsApi>, config: &ReportConfig) -> Result<()> {
    let report = ReportAssembler::new(api)
        .assemble(config)
        .await
        .context("Failed to collect report data")?;

    let content = render_report(&report, &config.templates_dir, config.template.as_deref())
        .await
        .context("Failed to render report")?;

    write_output(&config.output, &content).await;

    Ok(())
}
