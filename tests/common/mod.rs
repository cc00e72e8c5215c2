//! Common test utilities and helpers

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Query parameters sent to the paginated endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    pub offset: usize,
    pub limit: usize,
    pub from: i64,
    pub to: i64,
}

#[derive(Default)]
struct FakeState {
    name: String,
    events: Vec<Value>,
    metrics: Vec<Value>,
    event_queries: Vec<PageQuery>,
    metric_queries: Vec<PageQuery>,
    failing_metrics: bool,
    malformed_events: bool,
}

/// Monitoring API served from memory on a local port, mounted under `/hook`
#[derive(Clone)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn new(name: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                name: name.to_string(),
                ..FakeState::default()
            })),
        }
    }

    pub fn with_events(self, events: Vec<Value>) -> Self {
        self.state.lock().unwrap().events = events;
        self
    }

    pub fn with_metrics(self, metrics: Vec<Value>) -> Self {
        self.state.lock().unwrap().metrics = metrics;
        self
    }

    pub fn failing_metrics(self) -> Self {
        self.state.lock().unwrap().failing_metrics = true;
        self
    }

    pub fn malformed_events(self) -> Self {
        self.state.lock().unwrap().malformed_events = true;
        self
    }

    pub fn event_queries(&self) -> Vec<PageQuery> {
        self.state.lock().unwrap().event_queries.clone()
    }

    pub fn metric_queries(&self) -> Vec<PageQuery> {
        self.state.lock().unwrap().metric_queries.clone()
    }

    /// Starts serving and returns the hook URL
    pub async fn serve(&self) -> String {
        let app = Router::new()
            .route("/hook", get(project))
            .route("/hook/insights/events", get(events))
            .route("/hook/insights/metrics", get(metrics))
            .with_state(self.state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}/hook")
    }
}

type Shared = Arc<Mutex<FakeState>>;

async fn project(State(state): State<Shared>) -> Json<Value> {
    let name = state.lock().unwrap().name.clone();
    Json(json!({ "name": name, "id": 42 }))
}

fn page(records: &[Value], query: &PageQuery) -> Vec<Value> {
    records
        .iter()
        .skip(query.offset)
        .take(query.limit)
        .cloned()
        .collect()
}

async fn events(State(state): State<Shared>, Query(query): Query<PageQuery>) -> Response {
    let mut state = state.lock().unwrap();
    state.event_queries.push(query.clone());

    if state.malformed_events {
        return "<html>not json</html>".into_response();
    }
    Json(page(&state.events, &query)).into_response()
}

async fn metrics(State(state): State<Shared>, Query(query): Query<PageQuery>) -> Response {
    let mut state = state.lock().unwrap();
    state.metric_queries.push(query.clone());

    if state.failing_metrics {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(page(&state.metrics, &query)).into_response()
}

pub fn event(failures_count: i64, criticals: usize, tags: Option<&[&str]>) -> Value {
    let mut value = json!({
        "failuresCount": failures_count,
        "criticalFailures": vec!["critical"; criticals],
    });
    if let Some(tags) = tags {
        value["tags"] = json!(tags);
    }
    value
}

pub fn metric(success: bool, code: i64, fetch: f64, latency: f64, footprint: &str) -> Value {
    json!({
        "success": success,
        "code": code,
        "fetch": fetch,
        "latency": latency,
        "footprint": footprint,
    })
}
