use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::aggregate::{EventBucket, MetricBucket};
use super::events::EventAggregation;
use super::metrics::MetricAggregation;
use super::{TimeFrame, DATE_FORMAT};

/// Merged result of one collection run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub name: String,
    pub events: EventSummary,
    pub metrics: MetricSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub global: EventBucket,
    pub tags: BTreeMap<String, EventBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub global: MetricBucket,
    pub footprints: BTreeMap<String, MetricBucket>,
}

impl Report {
    pub fn new(
        timeframe: TimeFrame,
        name: String,
        events: EventAggregation,
        metrics: MetricAggregation,
    ) -> Self {
        let (event_global, tags) = events.into_registry().into_parts();
        let (metric_global, footprints) = metrics.into_registry().into_parts();

        Self {
            start: timeframe.start,
            end: timeframe.end,
            name,
            events: EventSummary {
                global: event_global,
                tags,
            },
            metrics: MetricSummary {
                global: metric_global,
                footprints,
            },
        }
    }

    /// Template-facing view of this report
    pub fn view(&self) -> ReportView<'_> {
        ReportView {
            start: self.start.format(DATE_FORMAT).to_string(),
            end: self.end.format(DATE_FORMAT).to_string(),
            name: self.name.as_str(),
            events: SectionView {
                global: &self.events.global,
                tags: entries(&self.events.tags),
            },
            metrics: MetricSectionView {
                global: &self.metrics.global,
                footprints: entries(&self.metrics.footprints),
            },
        }
    }
}

/// Key/value pair of a keyed registry, iterable from templates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry<'a, B> {
    pub key: &'a str,
    pub value: &'a B,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView<'a> {
    pub global: &'a EventBucket,
    pub tags: Vec<Entry<'a, EventBucket>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricSectionView<'a> {
    pub global: &'a MetricBucket,
    pub footprints: Vec<Entry<'a, MetricBucket>>,
}

/// Report as seen by templates: formatted dates and registries as ordered lists
#[derive(Debug, Clone, Serialize)]
pub struct ReportView<'a> {
    pub start: String,
    pub end: String,
    pub name: &'a str,
    pub events: SectionView<'a>,
    pub metrics: MetricSectionView<'a>,
}

fn entries<B>(map: &BTreeMap<String, B>) -> Vec<Entry<'_, B>> {
    map.iter()
        .map(|(key, value)| Entry {
            key: key.as_str(),
            value,
        })
        .collect()
}
