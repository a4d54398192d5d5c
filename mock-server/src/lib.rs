use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};

/// Server plugins the mock database answers for.
pub const PLUGINS: &[&str] = &[
    "sourceJsons",
    "studyJsons",
    "treeJsons",
    "ConfigurationPlugins",
    "Indexing",
];

/// Body returned by every successful plugin call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PluginReply {
    pub plugin: String,
    pub method: String,
    pub params: Value,
}

/// One POST as the server saw it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecordedCall {
    pub plugin: String,
    pub method: String,
    pub content_type: Option<String>,
    pub accept: Option<String>,
}

pub type Calls = Arc<RwLock<Vec<RecordedCall>>>;

pub fn app() -> Router {
    let calls: Calls = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/db/data/ext/{plugin}/graphdb/{method}", post(call_plugin))
        .route("/calls", get(list_calls))
        .with_state(calls)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn call_plugin(
    State(calls): State<Calls>,
    Path((plugin, method)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<PluginReply>, StatusCode> {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    calls.write().await.push(RecordedCall {
        plugin: plugin.clone(),
        method: method.clone(),
        content_type: header_value(header::CONTENT_TYPE),
        accept: header_value(header::ACCEPT),
    });

    if !PLUGINS.contains(&plugin.as_str()) {
        tracing::debug!(%plugin, %method, "unknown plugin");
        return Err(StatusCode::NOT_FOUND);
    }

    let params = if body.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(%plugin, %method, error = %e, "rejecting non-JSON body");
            StatusCode::BAD_REQUEST
        })?
    };
    tracing::info!(%plugin, %method, "plugin call");
    Ok(Json(PluginReply {
        plugin,
        method,
        params,
    }))
}

async fn list_calls(State(calls): State<Calls>) -> Json<Vec<RecordedCall>> {
    Json(calls.read().await.clone())
}
