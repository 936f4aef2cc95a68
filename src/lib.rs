//! Client-safe HTTP problem responses for request handlers.
//!
//! [`errors`] holds the closed error taxonomy and its problem-object wire
//! form. [`boundary`] wraps handlers so that any failure leaves as a
//! well-formed problem response and unknown failures never leak.

pub mod api;
pub mod boundary;
pub mod config;
pub mod errors;
pub mod metrics;

pub use boundary::{with_http_errors, Classify, HttpErrorBoundary};
pub use errors::{HttpError, Problem, ProblemKind, ProxyResponse, ValidationErrors};
