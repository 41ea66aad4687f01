use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
};
use chrono::Utc;
use hr_core::{generate, iso_timestamp, NewsPayload};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, JsonResponse};
use crate::state::DeploymentView;
use crate::{AppState, ENDPOINTS};

pub const ALLOWED_METHODS: [&str; 2] = ["GET", "OPTIONS"];

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub preset: Option<String>,
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NewsQuery>, QueryRejection>,
) -> Result<JsonResponse<NewsPayload>, ApiError> {
    let Query(query) = query?;
    let preset = match query.preset.as_deref() {
        Some(name) => state.registry.get(name)?,
        None => state.registry.default_preset(),
    };

    let now = Utc::now();
    let batch_size = state.config.batch_size;
    let batch = match state.config.seed {
        Some(seed) => generate(&mut StdRng::seed_from_u64(seed), batch_size, now, preset)?,
        None => generate(&mut rand::thread_rng(), batch_size, now, preset)?,
    };

    Ok(JsonResponse::ok(NewsPayload::from_batch(&batch, now)))
}

#[derive(Serialize)]
pub struct TestPayload {
    success: bool,
    message: &'static str,
    timestamp: String,
    version: &'static str,
    presets: Vec<String>,
    endpoints: BTreeMap<&'static str, &'static str>,
}

pub async fn api_test(State(state): State<Arc<AppState>>) -> JsonResponse<TestPayload> {
    JsonResponse::ok(TestPayload {
        success: true,
        message: "HR News API is working!",
        timestamp: iso_timestamp(Utc::now()),
        version: env!("CARGO_PKG_VERSION"),
        presets: state.registry.names().into_iter().map(String::from).collect(),
        endpoints: BTreeMap::from(ENDPOINTS),
    })
}

#[derive(Serialize)]
pub struct RequestEcho {
    method: String,
    url: String,
    headers: BTreeMap<String, String>,
    query: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub struct DiagnosticsPayload {
    success: bool,
    timestamp: String,
    environment: DeploymentView,
    request: RequestEcho,
    api_status: &'static str,
    message: &'static str,
}

pub async fn deployment_diagnostics(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> Result<JsonResponse<DiagnosticsPayload>, ApiError> {
    let Query(query) = query?;
    let mut echoed: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers.iter() {
        let value = String::from_utf8_lossy(value.as_bytes());
        echoed
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }

    Ok(JsonResponse::ok(DiagnosticsPayload {
        success: true,
        timestamp: iso_timestamp(Utc::now()),
        environment: state.config.deployment.view(),
        request: RequestEcho {
            method: method.to_string(),
            url: uri.to_string(),
            headers: echoed,
            query,
        },
        api_status: "working",
        message: "Deployment diagnostics endpoint is working correctly",
    }))
}

#[derive(Serialize)]
pub struct HealthPayload {
    status: &'static str,
    timestamp: String,
    message: &'static str,
}

pub async fn health() -> JsonResponse<HealthPayload> {
    JsonResponse::ok(HealthPayload {
        status: "OK",
        timestamp: iso_timestamp(Utc::now()),
        message: "HR News local server is running!",
    })
}

#[derive(Serialize)]
pub struct MethodNotAllowed {
    error: &'static str,
    #[serde(rename = "allowedMethods")]
    allowed_methods: [&'static str; 2],
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> JsonResponse<MethodNotAllowed> {
    tracing::warn!("{} {} is not allowed", method, uri.path());
    JsonResponse::new(
        StatusCode::METHOD_NOT_ALLOWED,
        MethodNotAllowed {
            error: "Method not allowed",
            allowed_methods: ALLOWED_METHODS,
        },
    )
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
