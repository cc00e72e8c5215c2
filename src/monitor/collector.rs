//! Report assembly
//!
//! Runs the project lookup and both aggregation pipelines concurrently and
//! merges them into a [`Report`]. The three operations share nothing but
//! the read-only time frame.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use super::client::InsightsApi;
use super::events::{collect_events, EVENTS_PAGE_SIZE};
use super::metrics::{collect_metrics, METRICS_PAGE_SIZE};
use super::pipeline::Pagination;
use super::report::Report;
use super::TimeFrame;
use crate::error::Result;

/// Immutable settings of one `create` run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub timeframe: TimeFrame,
    pub hook: Url,
    pub events: Pagination,
    pub metrics: Pagination,
    pub templates_dir: PathBuf,
    pub template: Option<PathBuf>,
    pub output: PathBuf,
}

impl ReportConfig {
    pub fn new(timeframe: TimeFrame, hook: &str, output: PathBuf) -> Result<Self> {
        Ok(Self {
            timeframe,
            hook: Url::parse(hook)?,
            events: Pagination::new(timeframe, EVENTS_PAGE_SIZE)?,
            metrics: Pagination::new(timeframe, METRICS_PAGE_SIZE)?,
            templates_dir: PathBuf::from("templates"),
            template: None,
            output,
        })
    }

    /// Template file name, resolved against `templates_dir` when rendering
    pub fn with_template(mut self, templates_dir: PathBuf, template: Option<PathBuf>) -> Self {
        self.templates_dir = templates_dir;
        self.template = template;
        self
    }

    pub fn with_page_sizes(mut self, events: usize, metrics: usize) -> Result<Self> {
        self.events = Pagination::new(self.timeframe, events)?;
        self.metrics = Pagination::new(self.timeframe, metrics)?;
        Ok(self)
    }
}

pub struct ReportAssembler {
    api: Arc<dyn InsightsApi>,
}

impl ReportAssembler {
    pub fn new(api: Arc<dyn InsightsApi>) -> Self {
        Self { api }
    }

    /// Collects everything for `config` and merges it.
    ///
    /// Fails as soon as any of the three operations fails; no partial
    /// report is produced.
    pub async fn assemble(&self, config: &ReportConfig) -> Result<Report> {
        info!(
            "Collecting data between {} and {}",
            config.timeframe.start, config.timeframe.end
        );

        let api = self.api.as_ref();
        let (name, events, metrics) = tokio::try_join!(
            api.project_name(),
            collect_events(api, &config.events),
            collect_metrics(api, &config.metrics)
        )?;

        debug!(
            "Collected {} events over {} tags and {} metrics over {} footprints for '{}'",
            events.global().successes + events.global().failures,
            events.registry().len(),
            metrics.global().successes + metrics.global().failures,
            metrics.registry().len(),
            name
        );

        Ok(Report::new(config.timeframe, name, events, metrics))
    }
}
