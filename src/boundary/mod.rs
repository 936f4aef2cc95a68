//! Error boundary for request handlers.
//!
//! [`with_http_errors`] wraps an async handler so that every failure it
//! raises, panics included, leaves as a well-formed problem response.
//! Successful results pass through untouched.

pub mod classify;

pub use classify::Classify;

use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, warn};

use crate::errors::{HttpError, ProxyResponse};
use crate::metrics;

/// Wrap `handler` in an error boundary
pub fn with_http_errors<H>(handler: H) -> HttpErrorBoundary<H> {
    HttpErrorBoundary { handler }
}

/// A handler whose failures are converted into problem responses
#[derive(Debug, Clone)]
pub struct HttpErrorBoundary<H> {
    handler: H,
}

impl<H> HttpErrorBoundary<H> {
    /// Invoke the wrapped handler. Never fails: handler errors and panics
    /// are turned into a response of the handler's own response type.
    pub async fn call<E, C, Fut, R, F>(&self, event: E, context: C) -> R
    where
        H: Fn(E, C) -> Fut,
        Fut: Future<Output = Result<R, F>>,
        F: Classify + fmt::Display,
        R: From<ProxyResponse>,
    {
        let invoked = panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(event, context)));
        let outcome = match invoked {
            Ok(pending) => AssertUnwindSafe(pending).catch_unwind().await,
            Err(payload) => Err(payload),
        };

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(failure)) => respond_to_failure(&failure).into(),
            Err(payload) => respond_to_panic(payload.as_ref()).into(),
        }
    }
}

/// Map a handler failure to its problem response
pub fn respond_to_failure<F>(failure: &F) -> ProxyResponse
where
    F: Classify + fmt::Display + ?Sized,
{
    let Some(error) = failure.classify() else {
        error!(
            error = %failure,
            "Unclassified handler failure, responding with Internal Server Error"
        );
        metrics::record_unclassified("error");
        return problem_response(&HttpError::internal());
    };

    if error.kind().is_server_error() {
        error!(failure = %failure, "Handler raised Internal Server Error");
    } else {
        warn!(
            status = error.status(),
            title = error.title(),
            detail = error.detail(),
            "Handler returned a client error"
        );
    }

    problem_response(error)
}

fn respond_to_panic(payload: &(dyn Any + Send)) -> ProxyResponse {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");

    error!(panic = message, "Handler panicked, responding with Internal Server Error");
    metrics::record_unclassified("panic");
    problem_response(&HttpError::internal())
}

fn problem_response(error: &HttpError) -> ProxyResponse {
    metrics::record_problem(error.kind());
    ProxyResponse::from(error)
}
