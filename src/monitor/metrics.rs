//! Metric aggregation
//!
//! Metrics are counted globally and per footprint, with running means of
//! fetch and latency times kept in every bucket.

use serde::{Deserialize, Deserializer};

use super::aggregate::MetricBucket;
use super::client::InsightsApi;
use super::pipeline::{paginate, Aggregation, Pagination};
use super::registry::KeyedRegistry;
use crate::error::Result;

/// Default number of metrics requested per page
pub const METRICS_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct MetricRecord {
    pub success: bool,
    #[serde(default)]
    pub code: MetricCode,
    pub fetch: f64,
    pub latency: f64,
    pub footprint: String,
}

impl MetricRecord {
    pub fn is_critical(&self) -> bool {
        self.code.is_critical()
    }
}

/// Response code reported by the API.
///
/// The API is loose about the type: integers, floats and numeric strings
/// are all read as an integer code. Anything else is `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetricCode {
    Code(i64),
    #[default]
    Unknown,
}

impl MetricCode {
    /// Codes of zero or below mean the call never produced a response
    pub fn is_critical(&self) -> bool {
        matches!(self, MetricCode::Code(code) if *code <= 0)
    }
}

impl From<i64> for MetricCode {
    fn from(code: i64) -> Self {
        MetricCode::Code(code)
    }
}

impl<'de> Deserialize<'de> for MetricCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(code) => MetricCode::Code(code),
                None => number
                    .as_f64()
                    .filter(|code| code.is_finite())
                    .map_or(MetricCode::Unknown, |code| MetricCode::Code(code.trunc() as i64)),
            },
            serde_json::Value::String(text) => text
                .trim()
                .parse::<i64>()
                .map_or(MetricCode::Unknown, MetricCode::Code),
            _ => MetricCode::Unknown,
        })
    }
}

/// Metric statistics globally and per footprint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricAggregation {
    registry: KeyedRegistry<MetricBucket>,
}

impl MetricAggregation {
    pub fn global(&self) -> &MetricBucket {
        self.registry.global()
    }

    pub fn footprint(&self, footprint: &str) -> Option<&MetricBucket> {
        self.registry.get(footprint)
    }

    pub fn registry(&self) -> &KeyedRegistry<MetricBucket> {
        &self.registry
    }

    pub fn into_registry(self) -> KeyedRegistry<MetricBucket> {
        self.registry
    }
}

impl Aggregation for MetricAggregation {
    type Record = MetricRecord;

    fn fold(&mut self, record: &MetricRecord) {
        self.registry.apply_keyed(&record.footprint, record);
    }
}

/// Pages through the metrics endpoint and aggregates every metric
pub async fn collect_metrics<A>(api: &A, pagination: &Pagination) -> Result<MetricAggregation>
where
    A: InsightsApi + ?Sized,
{
    paginate("Metrics", pagination, |request| api.fetch_metrics(request)).await
}
