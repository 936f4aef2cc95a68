use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Tag of every problem type the service can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemKind {
    /// Request is malformed or failed validation
    BadRequest,

    /// Authentication is missing or invalid
    Unauthorized,

    /// Authenticated but not allowed
    Forbidden,

    /// Resource does not exist
    NotFound,

    /// Client exceeded its rate limit
    TooManyRequests,

    /// Anything unexpected
    InternalServerError,
}

impl ProblemKind {
    /// Every kind, in ascending status order
    pub const ALL: [ProblemKind; 6] = [
        Self::BadRequest,
        Self::Unauthorized,
        Self::Forbidden,
        Self::NotFound,
        Self::TooManyRequests,
        Self::InternalServerError,
    ];

    /// Get HTTP status code for this problem
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::TooManyRequests => 429,
            Self::InternalServerError => 500,
        }
    }

    /// Stable problem title. Monitoring keys on this, never change it.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_kind_status_codes() {
        assert_eq!(ProblemKind::BadRequest.status_code(), 400);
        assert_eq!(ProblemKind::Unauthorized.status_code(), 401);
        assert_eq!(ProblemKind::Forbidden.status_code(), 403);
        assert_eq!(ProblemKind::NotFound.status_code(), 404);
        assert_eq!(ProblemKind::TooManyRequests.status_code(), 429);
        assert_eq!(ProblemKind::InternalServerError.status_code(), 500);
    }

    #[test]
    fn test_problem_kind_titles() {
        assert_eq!(ProblemKind::BadRequest.title(), "Bad Request");
        assert_eq!(ProblemKind::Unauthorized.title(), "Unauthorized");
        assert_eq!(ProblemKind::Forbidden.title(), "Forbidden");
        assert_eq!(ProblemKind::NotFound.title(), "Not Found");
        assert_eq!(ProblemKind::TooManyRequests.title(), "Too Many Requests");
        assert_eq!(
            ProblemKind::InternalServerError.title(),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_titles_match_canonical_reason_phrases() {
        for kind in ProblemKind::ALL {
            let status = axum::http::StatusCode::from_u16(kind.status_code()).unwrap();
            assert_eq!(status.canonical_reason(), Some(kind.title()));
        }
    }

    #[test]
    fn test_only_internal_is_server_error() {
        let server: Vec<_> = ProblemKind::ALL
            .into_iter()
            .filter(ProblemKind::is_server_error)
            .collect();
        assert_eq!(server, vec![ProblemKind::InternalServerError]);
    }

    #[test]
    fn test_display_is_title() {
        assert_eq!(ProblemKind::NotFound.to_string(), "Not Found");
    }
}
