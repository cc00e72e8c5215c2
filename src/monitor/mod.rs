use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

pub mod aggregate;
pub mod client;
pub mod collector;
pub mod events;
pub mod export;
pub mod metrics;
pub mod pipeline;
pub mod registry;
pub mod report;

pub use aggregate::{Bucket, EventBucket, MetricBucket};
pub use client::{HttpInsightsApi, InsightsApi, MockInsightsApi};
pub use collector::{ReportAssembler, ReportConfig};
pub use events::{EventAggregation, EventRecord, EVENTS_PAGE_SIZE, UNTAGGED};
pub use metrics::{MetricAggregation, MetricCode, MetricRecord, METRICS_PAGE_SIZE};
pub use pipeline::{PageRequest, Pagination};
pub use registry::KeyedRegistry;
pub use report::{Report, ReportView};

use crate::error::{Error, Result};

/// Date format used on the command line and in rendered reports
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Collection window shared read-only by every fetch of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeFrame {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeFrame {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::Config(format!(
                "Start date {} is after end date {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            )));
        }

        Ok(Self { start, end })
    }

    /// Parses `YYYY/MM/DD` bounds, using `today` when no end is given
    pub fn parse(start: &str, end: Option<&str>, today: NaiveDate) -> Result<Self> {
        let start = parse_date(start)?;
        let end = match end {
            Some(end) => parse_date(end)?,
            None => today,
        };

        Self::new(start, end)
    }

    /// Start bound as epoch milliseconds (UTC midnight)
    pub fn from_millis(&self) -> i64 {
        self.start.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }

    /// End bound as epoch milliseconds (UTC midnight)
    pub fn to_millis(&self) -> i64 {
        self.end.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::Config(format!("Invalid date '{value}', expected YYYY/MM/DD: {e}")))
}
