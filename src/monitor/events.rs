//! Event aggregation
//!
//! Events are counted globally and per tag. An event without tags is
//! counted under [`UNTAGGED`].

use serde::{Deserialize, Deserializer};

use super::aggregate::EventBucket;
use super::client::InsightsApi;
use super::pipeline::{paginate, Aggregation, Pagination};
use super::registry::KeyedRegistry;
use crate::error::Result;

/// Default number of events requested per page
pub const EVENTS_PAGE_SIZE: usize = 500;

/// Key collecting events that carry no tags
pub const UNTAGGED: &str = "untagged";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default, deserialize_with = "lenient_count")]
    pub failures_count: i64,
    #[serde(default)]
    pub critical_failures: Vec<serde_json::Value>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl EventRecord {
    /// Tag keys this event is counted under
    pub fn keys(&self) -> Vec<&str> {
        match self.tags.as_deref() {
            Some(tags) if !tags.is_empty() => tags.iter().map(String::as_str).collect(),
            _ => vec![UNTAGGED],
        }
    }
}

/// Reads a failure count sent as an integer, a float or a numeric string.
///
/// Fractions round up so any positive value still marks a failure. Null and
/// non-numeric values count as zero.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let count = match value {
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(count) => Some(count),
            None => number.as_f64().and_then(round_up),
        },
        serde_json::Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(round_up))
        }
        _ => None,
    };
    Ok(count.unwrap_or(0))
}

fn round_up(count: f64) -> Option<i64> {
    count.is_finite().then(|| count.ceil() as i64)
}

/// Event statistics globally and per tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventAggregation {
    registry: KeyedRegistry<EventBucket>,
}

impl EventAggregation {
    pub fn global(&self) -> &EventBucket {
        self.registry.global()
    }

    pub fn tag(&self, tag: &str) -> Option<&EventBucket> {
        self.registry.get(tag)
    }

    pub fn registry(&self) -> &KeyedRegistry<EventBucket> {
        &self.registry
    }

    pub fn into_registry(self) -> KeyedRegistry<EventBucket> {
        self.registry
    }
}

impl Aggregation for EventAggregation {
    type Record = EventRecord;

    fn fold(&mut self, record: &EventRecord) {
        self.registry.apply(record.keys(), record);
    }
}

/// Pages through the events endpoint and aggregates every event
pub async fn collect_events<A>(api: &A, pagination: &Pagination) -> Result<EventAggregation>
where
    A: InsightsApi + ?Sized,
{
    paginate("Event", pagination, |request| api.fetch_events(request)).await
}
