//! Running-statistics buckets
//!
//! A bucket folds records one at a time and never keeps them around. Both
//! the event and the metric pipelines fold into buckets of their own kind.

use serde::Serialize;

use super::events::EventRecord;
use super::metrics::MetricRecord;

/// Accumulator folded over a stream of records
pub trait Bucket: Default {
    type Record;

    /// Folds one record into this bucket
    fn record(&mut self, record: &Self::Record);

    /// Number of records folded so far
    fn count(&self) -> u64;

    /// Folds a record into an optional bucket, creating a zeroed one when absent
    fn fold(bucket: Option<Self>, record: &Self::Record) -> Self {
        let mut bucket = bucket.unwrap_or_default();
        bucket.record(record);
        bucket
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventBucket {
    pub successes: u64,
    pub failures: u64,
    pub criticals: u64,
}

impl Bucket for EventBucket {
    type Record = EventRecord;

    fn record(&mut self, record: &EventRecord) {
        if record.failures_count > 0 {
            self.failures += 1;
        } else {
            self.successes += 1;
        }

        if !record.critical_failures.is_empty() {
            self.criticals += 1;
        }
    }

    fn count(&self) -> u64 {
        self.successes + self.failures
    }
}

/// Metric counters plus online mean of fetch and latency times
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricBucket {
    pub successes: u64,
    pub failures: u64,
    pub criticals: u64,
    pub mean_fetch: f64,
    pub mean_latency: f64,
    #[serde(skip)]
    total_fetch: f64,
    #[serde(skip)]
    total_latency: f64,
}

impl Bucket for MetricBucket {
    type Record = MetricRecord;

    fn record(&mut self, record: &MetricRecord) {
        if record.success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }

        if record.is_critical() {
            self.criticals += 1;
        }

        self.total_fetch += record.fetch;
        self.total_latency += record.latency;

        // count() is at least one here
        let count = self.count() as f64;
        self.mean_fetch = self.total_fetch / count;
        self.mean_latency = self.total_latency / count;
    }

    fn count(&self) -> u64 {
        self.successes + self.failures
    }
}
