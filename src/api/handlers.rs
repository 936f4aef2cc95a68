use anyhow::anyhow;
use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use super::middleware::RequestId;
use crate::boundary::with_http_errors;
use crate::errors::{HttpError, ProblemKind, ProxyResponse, ValidationErrors};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub instance_id: String,
}

/// What the sample handler receives for one invocation
#[derive(Debug, Clone)]
pub struct InvocationEvent {
    pub method: String,
    pub raw_path: String,
    pub raw_query_string: String,
    pub body: String,
}

/// Ambient invocation data handed to the handler alongside the event
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: String,
    pub instance_id: String,
}

/// One entry of the problem taxonomy
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDescriptor {
    /// Machine-readable kind
    pub kind: ProblemKind,
    /// HTTP status code
    pub status: u16,
    /// Stable problem title
    pub title: String,
}

/// Sample request handler hosted behind the error boundary.
///
/// The event body selects the outcome, which makes every boundary path
/// reachable over HTTP.
pub async fn sample_handler(
    event: InvocationEvent,
    context: InvocationContext,
) -> anyhow::Result<ProxyResponse> {
    debug!(
        request_id = %context.request_id,
        path = %event.raw_path,
        "Sample handler invoked"
    );

    match event.body.trim() {
        "bad-request" => Err(HttpError::bad_request(
            "Validation failed",
            ValidationErrors::new().with("field_path", "field_path is required"),
        )
        .into()),
        "unauthorized" => Err(HttpError::unauthorized("Invalid token").into()),
        "forbidden" => Err(HttpError::forbidden("Access denied").into()),
        "not-found" => Err(HttpError::not_found("Resource not found").into()),
        "too-many-requests" => Err(HttpError::too_many_requests("Rate limit exceeded").into()),
        "internal-server-error" => Err(anyhow!("uh oh!")),
        "panic" => panic!("sample handler panicked"),
        _ => Ok(ProxyResponse::json(
            200,
            &serde_json::json!({ "message": "Hello, world!" }),
        )?),
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "problem-boundary",
        "version": env!("CARGO_PKG_VERSION"),
        "instance_id": state.instance_id,
        "uptime_seconds": START_TIME.elapsed().as_secs(),
    }))
}

/// Invoke the sample handler through the error boundary
#[utoipa::path(
    post,
    path = "/invoke",
    tag = "invoke",
    request_body(content = String, description = "Event body, selects the handler outcome", content_type = "text/plain"),
    responses(
        (status = 200, description = "Handler succeeded", body = serde_json::Value),
        (status = 400, description = "Validation failed", body = Problem),
        (status = 401, description = "Unauthorized", body = Problem),
        (status = 403, description = "Forbidden", body = Problem),
        (status = 404, description = "Not found", body = Problem),
        (status = 429, description = "Rate limited", body = Problem),
        (status = 500, description = "Unexpected failure", body = Problem)
    )
)]
pub async fn invoke(
    State(state): State<AppState>,
    request_id: Option<axum::Extension<RequestId>>,
    method: Method,
    uri: Uri,
    body: String,
) -> ProxyResponse {
    let request_id = request_id
        .map(|axum::Extension(RequestId(id))| id)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let event = InvocationEvent {
        method: method.to_string(),
        raw_path: uri.path().to_string(),
        raw_query_string: uri.query().unwrap_or("").to_string(),
        body,
    };
    let context = InvocationContext {
        request_id,
        instance_id: state.instance_id.clone(),
    };

    let response = with_http_errors(sample_handler).call(event, context).await;
    info!(status = response.status_code, "Invocation finished");
    response
}

/// List the problem taxonomy
#[utoipa::path(
    get,
    path = "/problems",
    tag = "problems",
    responses(
        (status = 200, description = "Every problem kind with its status and title", body = [ProblemDescriptor])
    )
)]
pub async fn list_problems() -> Json<Vec<ProblemDescriptor>> {
    Json(
        ProblemKind::ALL
            .into_iter()
            .map(|kind| ProblemDescriptor {
                kind,
                status: kind.status_code(),
                title: kind.title().to_string(),
            })
            .collect(),
    )
}

/// Fallback for unknown routes
pub async fn route_not_found(uri: Uri) -> HttpError {
    HttpError::not_found(format!("No route for {}", uri.path()))
}
