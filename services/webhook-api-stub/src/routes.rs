//! HTTP surface of the stub.
//!
//! Implements the webhook admin REST API over the in-memory store, with the
//! permissive CORS the browser console needs during development.

use crate::store::{Store, StoreError};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use nf_api_types::{
    MessageState, WebhookReference, WebhookSettings, WebhookTemplate,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::info;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone)]
struct ApiState {
    store: Arc<RwLock<Store>>,
}

/// Build the stub application with an empty store.
pub fn app() -> Router {
    let state = ApiState {
        store: Arc::new(RwLock::new(Store::default())),
    };

    Router::new()
        .route("/api/v1/webhooks", get(list_webhooks).post(create_webhook))
        .route("/api/v1/webhooks/", post(create_webhook))
        .route("/api/v1/webhooks/{hook}", delete(remove_webhook))
        .route("/api/v1/webhooks/{hook}/messages", get(list_messages))
        .route("/api/v1/webhooks/{hook}/messages/{event}", get(read_message))
        .route(
            "/api/v1/webhooks/{hook}/messages/{event}/_retry",
            post(retry_message),
        )
        .route("/api/v1/webhooks/{hook}/_enable", post(enable_webhook))
        .route("/api/v1/webhooks/{hook}/_disable", post(disable_webhook))
        .route("/api/v1/webhooks/{hook}/_reset", post(reset_webhook))
        .route("/api/v1/webhooks/{hook}/_retry", post(retry_webhook))
        .route(
            "/api/v1/webhooks/{hook}/{scope}",
            get(read_scope).put(write_scope),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Collection ──

#[derive(Debug, Deserialize)]
struct ListQuery {
    filter: Option<String>,
}

async fn list_webhooks(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<WebhookReference>> {
    let store = state.store.read().await;
    Json(store.list(query.filter.as_deref()))
}

async fn create_webhook(
    State(state): State<ApiState>,
    Json(settings): Json<WebhookSettings>,
) -> ApiResult<(StatusCode, Json<WebhookReference>)> {
    let mut store = state.store.write().await;
    let reference = store.create(settings).map_err(error_response)?;
    info!("webhook {} created", reference.hook_name.0);
    Ok((StatusCode::CREATED, Json(reference)))
}

// ── Entity scopes ──

async fn read_scope(
    State(state): State<ApiState>,
    Path((hook, scope)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let store = state.store.read().await;
    let value = match scope.as_str() {
        "settings" => to_value(store.settings(&hook).map_err(error_response)?)?,
        "template" => to_value(store.template(&hook).map_err(error_response)?)?,
        "statistics" => to_value(store.statistics(&hook).map_err(error_response)?)?,
        _ => return Err(not_found(&scope)),
    };
    Ok(Json(value))
}

async fn write_scope(
    State(state): State<ApiState>,
    Path((hook, scope)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    match scope.as_str() {
        "settings" => {
            let settings: WebhookSettings =
                serde_json::from_value(payload).map_err(bad_payload)?;
            store
                .save_settings(&hook, settings)
                .map_err(error_response)?;
        }
        "template" => {
            let template: WebhookTemplate =
                serde_json::from_value(payload).map_err(bad_payload)?;
            store
                .save_template(&hook, template)
                .map_err(error_response)?;
        }
        _ => return Err(not_found(&scope)),
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_webhook(
    State(state): State<ApiState>,
    Path(hook): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    store.remove(&hook).map_err(error_response)?;
    info!("webhook {hook} removed");
    Ok(StatusCode::NO_CONTENT)
}

// ── Lifecycle ──

async fn enable_webhook(
    State(state): State<ApiState>,
    Path(hook): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    if store.enable(&hook).map_err(error_response)? {
        info!("webhook {hook} enabled");
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn disable_webhook(
    State(state): State<ApiState>,
    Path(hook): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    if store.disable(&hook).map_err(error_response)? {
        info!("webhook {hook} disabled");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct ResetQuery {
    event_id: Option<String>,
}

async fn reset_webhook(
    State(state): State<ApiState>,
    Path(hook): Path<String>,
    Query(query): Query<ResetQuery>,
) -> ApiResult<StatusCode> {
    let event = query
        .event_id
        .filter(|event| !event.is_empty())
        .ok_or_else(|| bad_request("event_id is required"))?;
    let mut store = state.store.write().await;
    store.reset(&hook, &event).map_err(error_response)?;
    info!("webhook {hook} reset to event {event}");
    Ok(StatusCode::NO_CONTENT)
}

async fn retry_webhook(
    State(state): State<ApiState>,
    Path(hook): Path<String>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    let requeued = store.retry_failed(&hook).map_err(error_response)?;
    info!("webhook {hook}: {requeued} failed messages requeued");
    Ok(StatusCode::NO_CONTENT)
}

// ── Message queue ──

#[derive(Debug, Deserialize)]
struct MessagesQuery {
    state: Option<String>,
    #[serde(rename = "correlationId")]
    correlation_id: Option<String>,
    offset: Option<String>,
    limit: Option<String>,
}

async fn list_messages(
    State(state): State<ApiState>,
    Path(hook): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> ApiResult<Json<Value>> {
    let wanted_state = match non_empty(query.state) {
        Some(raw) => Some(
            MessageState::parse(&raw)
                .ok_or_else(|| bad_request(&format!("unknown message state {raw}")))?,
        ),
        None => None,
    };
    let correlation_id = non_empty(query.correlation_id);
    let offset = parse_index(query.offset, 0)?;
    let limit = parse_index(query.limit, 100)?;

    let store = state.store.read().await;
    let messages = store
        .messages(&hook, wanted_state, correlation_id.as_deref(), offset, limit)
        .map_err(error_response)?;
    Ok(Json(to_value(messages)?))
}

async fn read_message(
    State(state): State<ApiState>,
    Path((hook, event)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let store = state.store.read().await;
    let message = store.message(&hook, &event).map_err(error_response)?;
    Ok(Json(to_value(message)?))
}

async fn retry_message(
    State(state): State<ApiState>,
    Path((hook, event)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let mut store = state.store.write().await;
    store.retry_message(&hook, &event).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Helpers ──

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn parse_index(value: Option<String>, default: usize) -> ApiResult<usize> {
    match non_empty(value) {
        Some(raw) => raw
            .parse()
            .map_err(|_| bad_request(&format!("invalid number {raw}"))),
        None => Ok(default),
    }
}

fn to_value<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|err| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
    })
}

fn error_response(err: StoreError) -> ApiError {
    let status = match err {
        StoreError::HookNotFound | StoreError::MessageNotFound => StatusCode::NOT_FOUND,
        StoreError::DuplicateName => StatusCode::CONFLICT,
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_owned(),
        }),
    )
}

fn bad_payload(err: serde_json::Error) -> ApiError {
    bad_request(&format!("malformed payload: {err}"))
}

fn not_found(scope: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("unknown scope {scope}"),
        }),
    )
}
