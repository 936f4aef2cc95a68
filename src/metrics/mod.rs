pub mod middleware;
pub mod registry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder};

use crate::errors::ProblemKind;

/// Handler for the /metrics endpoint
/// Returns metrics in Prometheus exposition format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => {
            let body = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (
                StatusCode::OK,
                [("Content-Type", encoder.format_type())],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// Count one problem response leaving the boundary
pub fn record_problem(kind: ProblemKind) {
    PROBLEMS_EMITTED_TOTAL
        .with_label_values(&[&kind.status_code().to_string(), kind.title()])
        .inc();
}

/// Count one failure the taxonomy did not recognize
pub fn record_unclassified(cause: &str) {
    UNCLASSIFIED_FAILURES_TOTAL.with_label_values(&[cause]).inc();
}

// Re-export commonly used metrics for convenience
pub use registry::{
    HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS, PROBLEMS_EMITTED_TOTAL,
    UNCLASSIFIED_FAILURES_TOTAL,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_problem_labels_by_status_and_title() {
        let counter = PROBLEMS_EMITTED_TOTAL.with_label_values(&["404", "Not Found"]);
        let before = counter.get();
        record_problem(ProblemKind::NotFound);
        assert!(counter.get() > before);
    }

    #[tokio::test]
    async fn test_metrics_handler_exposes_problem_counter() {
        record_problem(ProblemKind::Forbidden);
        let response = metrics_handler().await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("problems_emitted_total"));
    }
}
