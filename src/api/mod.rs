//! HTTP host that runs a sample handler behind the error boundary

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;

pub use routes::create_router;
