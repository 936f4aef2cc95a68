use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use utoipa::ToSchema;

use super::codes::ProblemKind;

/// Detail of every Internal Server Error. Never caller-supplied so nothing
/// internal can leak through it.
pub const INTERNAL_SERVER_ERROR_DETAIL: &str = "An unexpected error occurred. Please try again.";

/// Serialized problem object, the wire form of an [`HttpError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Problem {
    /// HTTP status code
    pub status: u16,
    /// Short summary of the problem type, stable across occurrences
    pub title: String,
    /// Explanation specific to this occurrence
    pub detail: String,
    /// Occurrence specific context, omitted when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ValidationErrors>,
}

/// Context of a Bad Request: field path mapped to what is wrong with it.
/// Paths serialize in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrors {
    pub errors: IndexMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ValidationErrors::insert`]
    pub fn with(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(path, message);
        self
    }

    /// Record an error for `path`, replacing any earlier one
    pub fn insert(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(path.into(), message.into());
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<P, M> FromIterator<(P, M)> for ValidationErrors
where
    P: Into<String>,
    M: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, M)>>(iter: I) -> Self {
        Self {
            errors: iter
                .into_iter()
                .map(|(path, message)| (path.into(), message.into()))
                .collect(),
        }
    }
}

/// Client-safe error raised by request handlers.
///
/// Status and title are fixed by the variant. Only `detail` (and the Bad
/// Request context) vary per occurrence. Variants are built through the
/// constructors below; their fields cannot be set from outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    #[error("Bad Request: {detail}")]
    #[non_exhaustive]
    BadRequest {
        detail: String,
        context: ValidationErrors,
    },

    #[error("Unauthorized: {detail}")]
    #[non_exhaustive]
    Unauthorized { detail: String },

    #[error("Forbidden: {detail}")]
    #[non_exhaustive]
    Forbidden { detail: String },

    #[error("Not Found: {detail}")]
    #[non_exhaustive]
    NotFound { detail: String },

    #[error("Too Many Requests: {detail}")]
    #[non_exhaustive]
    TooManyRequests { detail: String },

    #[error("Internal Server Error")]
    #[non_exhaustive]
    InternalServerError {},
}

impl HttpError {
    pub fn bad_request(detail: impl Into<String>, context: ValidationErrors) -> Self {
        Self::BadRequest {
            detail: non_blank(detail.into(), ProblemKind::BadRequest),
            context,
        }
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized {
            detail: non_blank(detail.into(), ProblemKind::Unauthorized),
        }
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::Forbidden {
            detail: non_blank(detail.into(), ProblemKind::Forbidden),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: non_blank(detail.into(), ProblemKind::NotFound),
        }
    }

    pub fn too_many_requests(detail: impl Into<String>) -> Self {
        Self::TooManyRequests {
            detail: non_blank(detail.into(), ProblemKind::TooManyRequests),
        }
    }

    /// The only Internal Server Error there is; its detail is fixed
    pub fn internal() -> Self {
        Self::InternalServerError {}
    }

    pub fn kind(&self) -> ProblemKind {
        match self {
            Self::BadRequest { .. } => ProblemKind::BadRequest,
            Self::Unauthorized { .. } => ProblemKind::Unauthorized,
            Self::Forbidden { .. } => ProblemKind::Forbidden,
            Self::NotFound { .. } => ProblemKind::NotFound,
            Self::TooManyRequests { .. } => ProblemKind::TooManyRequests,
            Self::InternalServerError { .. } => ProblemKind::InternalServerError,
        }
    }

    pub fn status(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn title(&self) -> &'static str {
        self.kind().title()
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::BadRequest { detail, .. }
            | Self::Unauthorized { detail, .. }
            | Self::Forbidden { detail, .. }
            | Self::NotFound { detail, .. }
            | Self::TooManyRequests { detail, .. } => detail,
            Self::InternalServerError { .. } => INTERNAL_SERVER_ERROR_DETAIL,
        }
    }

    pub fn context(&self) -> Option<&ValidationErrors> {
        match self {
            Self::BadRequest { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Build the problem object for this error
    pub fn serialize(&self) -> Problem {
        Problem {
            status: self.status(),
            title: self.title().to_string(),
            detail: self.detail().to_string(),
            context: self.context().cloned(),
        }
    }

    /// JSON text of [`HttpError::serialize`]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.serialize()).unwrap_or_else(|e| {
            tracing::error!(error = %e, title = self.title(), "Failed to encode problem");
            internal_problem_json()
        })
    }
}

/// JSON of the Internal Server Error problem, written out by hand so that
/// producing it can never fail
pub(crate) fn internal_problem_json() -> String {
    format!(
        r#"{{"status":500,"title":"Internal Server Error","detail":"{}"}}"#,
        INTERNAL_SERVER_ERROR_DETAIL
    )
}

fn non_blank(detail: String, kind: ProblemKind) -> String {
    if detail.trim().is_empty() {
        kind.title().to_string()
    } else {
        detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn every_variant() -> Vec<HttpError> {
        vec![
            HttpError::bad_request(
                "Request failed validation",
                ValidationErrors::new().with("required_field", "required_field is required"),
            ),
            HttpError::unauthorized("Invalid token"),
            HttpError::forbidden("Access denied"),
            HttpError::not_found("Resource not found"),
            HttpError::too_many_requests("Rate limit exceeded"),
            HttpError::internal(),
        ]
    }

    #[test]
    fn test_serialize_every_variant() {
        let expected = vec![
            json!({
                "status": 400,
                "title": "Bad Request",
                "detail": "Request failed validation",
                "context": { "errors": { "required_field": "required_field is required" } }
            }),
            json!({ "status": 401, "title": "Unauthorized", "detail": "Invalid token" }),
            json!({ "status": 403, "title": "Forbidden", "detail": "Access denied" }),
            json!({ "status": 404, "title": "Not Found", "detail": "Resource not found" }),
            json!({ "status": 429, "title": "Too Many Requests", "detail": "Rate limit exceeded" }),
            json!({
                "status": 500,
                "title": "Internal Server Error",
                "detail": "An unexpected error occurred. Please try again."
            }),
        ];

        for (error, expected) in every_variant().iter().zip(expected) {
            let value = serde_json::to_value(error.serialize()).unwrap();
            assert_eq!(value, expected, "variant {:?}", error.kind());
        }
    }

    #[test]
    fn test_context_key_absent_without_context() {
        for error in every_variant() {
            let value: Value = serde_json::from_str(&error.to_json()).unwrap();
            let has_context = value.as_object().unwrap().contains_key("context");
            assert_eq!(has_context, error.kind() == ProblemKind::BadRequest);
            assert!(!error.to_json().contains("null"));
        }
    }

    #[test]
    fn test_status_and_title_fixed_per_variant() {
        let first = HttpError::not_found("first");
        let second = HttpError::not_found("second");
        assert_eq!(first.status(), second.status());
        assert_eq!(first.title(), second.title());
        assert_ne!(first.detail(), second.detail());
    }

    #[test]
    fn test_internal_detail_is_fixed() {
        let error = HttpError::internal();
        assert_eq!(error.detail(), INTERNAL_SERVER_ERROR_DETAIL);
        assert_eq!(
            error.detail(),
            "An unexpected error occurred. Please try again."
        );
        assert!(error.context().is_none());
    }

    #[test]
    fn test_to_json_is_byte_stable() {
        let error = HttpError::bad_request(
            "Validation failed",
            ValidationErrors::new()
                .with("b.path", "second")
                .with("a.path", "first"),
        );
        assert_eq!(error.to_json(), error.to_json());
        assert_eq!(
            error.to_json(),
            r#"{"status":400,"title":"Bad Request","detail":"Validation failed","context":{"errors":{"b.path":"second","a.path":"first"}}}"#
        );
    }

    #[test]
    fn test_context_keeps_insertion_order() {
        let error = HttpError::bad_request(
            "Validation failed",
            ValidationErrors::new().with("zeta", "z").with("alpha", "a"),
        );
        assert!(error
            .to_json()
            .ends_with(r#""context":{"errors":{"zeta":"z","alpha":"a"}}}"#));
    }

    #[test]
    fn test_detail_with_quotes_and_unicode_round_trips() {
        let error = HttpError::not_found("No \"café\" here");
        let problem: Problem = serde_json::from_str(&error.to_json()).unwrap();
        assert_eq!(problem, error.serialize());
        assert_eq!(problem.detail, "No \"café\" here");
    }

    #[test]
    fn test_internal_problem_json_matches_serializer() {
        assert_eq!(HttpError::internal().to_json(), internal_problem_json());
    }

    #[test]
    fn test_blank_detail_falls_back_to_title() {
        assert_eq!(HttpError::forbidden("").detail(), "Forbidden");
        assert_eq!(HttpError::unauthorized("   ").detail(), "Unauthorized");
        assert_eq!(
            HttpError::bad_request("", ValidationErrors::new()).detail(),
            "Bad Request"
        );
    }

    #[test]
    fn test_display_includes_title_and_detail() {
        assert_eq!(
            HttpError::not_found("Record abc123").to_string(),
            "Not Found: Record abc123"
        );
        assert_eq!(HttpError::internal().to_string(), "Internal Server Error");
    }

    #[test]
    fn test_problem_deserializes_without_context() {
        let problem: Problem =
            serde_json::from_str(r#"{"status":404,"title":"Not Found","detail":"gone"}"#).unwrap();
        assert_eq!(problem, HttpError::not_found("gone").serialize());
    }

    #[test]
    fn test_validation_errors_builder() {
        let mut errors: ValidationErrors = [("name", "name is required")].into_iter().collect();
        errors.insert("age", "age must be positive");
        errors.insert("name", "name is too long");

        assert_eq!(errors.len(), 2);
        assert!(!errors.is_empty());
        assert_eq!(
            errors.errors.get("name").map(String::as_str),
            Some("name is too long")
        );
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"errors":{"name":"name is too long","age":"age must be positive"}}"#
        );
    }
}
