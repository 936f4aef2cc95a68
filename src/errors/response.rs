use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::problem::HttpError;

/// Content type of problem bodies
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Transport envelope returned to the invocation runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// HTTP status code
    pub status_code: u16,
    /// Response body, already encoded
    pub body: String,
}

impl ProxyResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// Encode `value` as the JSON body
    pub fn json<T: Serialize>(status_code: u16, value: &T) -> serde_json::Result<Self> {
        Ok(Self::new(status_code, serde_json::to_string(value)?))
    }
}

impl From<&HttpError> for ProxyResponse {
    fn from(error: &HttpError) -> Self {
        Self::new(error.status(), error.to_json())
    }
}

impl From<HttpError> for ProxyResponse {
    fn from(error: HttpError) -> Self {
        Self::from(&error)
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            self.body,
        )
            .into_response()
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_CONTENT_TYPE))],
            self.to_json(),
        )
            .into_response()
    }
}
