use utoipa::OpenApi;

use crate::api::handlers::ProblemDescriptor;
use crate::errors::{Problem, ProblemKind, ProxyResponse, ValidationErrors};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Problem Boundary",
        version = "0.1.0",
        description = "Hosts a request handler behind an error boundary. Every failure is answered with a problem object carrying a fixed status and title; unexpected failures never leak their internals.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::invoke,
        crate::api::handlers::list_problems,
    ),
    components(
        schemas(
            Problem,
            ValidationErrors,
            ProblemKind,
            ProblemDescriptor,
            ProxyResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "invoke", description = "Handler invocation through the error boundary"),
        (name = "problems", description = "Problem taxonomy"),
    )
)]
pub struct ApiDoc;
