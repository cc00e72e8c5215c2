//! Monitoring API access
//!
//! [`InsightsApi`] is the seam between the aggregation pipelines and the
//! remote API. [`HttpInsightsApi`] talks to a real hook over HTTP and
//! [`MockInsightsApi`] serves scripted pages for tests.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use super::events::EventRecord;
use super::metrics::MetricRecord;
use super::pipeline::PageRequest;
use crate::error::{Error, Result};

#[async_trait]
pub trait InsightsApi: Send + Sync {
    /// Name of the project behind the hook
    async fn project_name(&self) -> Result<String>;

    /// One page of events
    async fn fetch_events(&self, request: PageRequest) -> Result<Vec<EventRecord>>;

    /// One page of metrics
    async fn fetch_metrics(&self, request: PageRequest) -> Result<Vec<MetricRecord>>;
}

#[derive(Debug, Deserialize)]
struct Project {
    name: String,
}

/// HTTP client for an API hook
#[derive(Debug, Clone)]
pub struct HttpInsightsApi {
    client: Client,
    hook: String,
}

impl HttpInsightsApi {
    pub fn new(hook: &Url) -> Self {
        Self::with_client(Client::new(), hook)
    }

    pub fn with_client(client: Client, hook: &Url) -> Self {
        Self {
            client,
            hook: hook.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn hook(&self) -> &str {
        &self.hook
    }

    fn insights_url(&self, endpoint: &str) -> String {
        format!("{}/insights/{}", self.hook, endpoint)
    }

    async fn get<T>(&self, url: &str, query: Option<PageRequest>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self.client.get(url);

        if let Some(page) = query {
            request = request.query(&[
                ("offset", page.offset.to_string()),
                ("limit", page.limit.to_string()),
                ("from", page.from.to_string()),
                ("to", page.to.to_string()),
            ]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus(format!(
                "GET {} failed with status: {}",
                url,
                response.status()
            )));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::Deserialization(format!("Failed to parse response of {url}: {e}")))
    }
}

#[async_trait]
impl InsightsApi for HttpInsightsApi {
    async fn project_name(&self) -> Result<String> {
        debug!("Fetching project details from {}", self.hook);
        let project: Project = self.get(&self.hook, None).await?;
        Ok(project.name)
    }

    async fn fetch_events(&self, request: PageRequest) -> Result<Vec<EventRecord>> {
        self.get(&self.insights_url("events"), Some(request)).await
    }

    async fn fetch_metrics(&self, request: PageRequest) -> Result<Vec<MetricRecord>> {
        self.get(&self.insights_url("metrics"), Some(request)).await
    }
}

type Pages<T> = Arc<Mutex<VecDeque<Result<Vec<T>>>>>;

/// Scripted [`InsightsApi`] for tests.
///
/// Pages are served in the order they were added. An endpoint with no
/// scripted page left answers with an empty page.
#[derive(Clone)]
pub struct MockInsightsApi {
    name: Arc<Mutex<Option<Result<String>>>>,
    events: Pages<EventRecord>,
    metrics: Pages<MetricRecord>,
    event_requests: Arc<Mutex<Vec<PageRequest>>>,
    metric_requests: Arc<Mutex<Vec<PageRequest>>>,
}

impl MockInsightsApi {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::new(Mutex::new(Some(Ok(name.to_string())))),
            events: Arc::default(),
            metrics: Arc::default(),
            event_requests: Arc::default(),
            metric_requests: Arc::default(),
        }
    }

    /// Makes the project lookup fail
    pub async fn fail_project(&self, error: Error) {
        *self.name.lock().await = Some(Err(error));
    }

    pub async fn add_event_page(&self, page: Vec<EventRecord>) {
        self.events.lock().await.push_back(Ok(page));
    }

    pub async fn add_event_error(&self, error: Error) {
        self.events.lock().await.push_back(Err(error));
    }

    pub async fn add_metric_page(&self, page: Vec<MetricRecord>) {
        self.metrics.lock().await.push_back(Ok(page));
    }

    pub async fn add_metric_error(&self, error: Error) {
        self.metrics.lock().await.push_back(Err(error));
    }

    pub async fn event_requests(&self) -> Vec<PageRequest> {
        self.event_requests.lock().await.clone()
    }

    pub async fn metric_requests(&self) -> Vec<PageRequest> {
        self.metric_requests.lock().await.clone()
    }
}

#[async_trait]
impl InsightsApi for MockInsightsApi {
    async fn project_name(&self) -> Result<String> {
        let mut name = self.name.lock().await;
        match name.take() {
            Some(Ok(value)) => {
                *name = Some(Ok(value.clone()));
                Ok(value)
            }
            Some(Err(error)) => Err(error),
            None => Err(Error::HttpStatus("project lookup already failed".into())),
        }
    }

    async fn fetch_events(&self, request: PageRequest) -> Result<Vec<EventRecord>> {
        self.event_requests.lock().await.push(request);
        self.events
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_metrics(&self, request: PageRequest) -> Result<Vec<MetricRecord>> {
        self.metric_requests.lock().await.push(request);
        self.metrics
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
