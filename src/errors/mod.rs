//! Client-safe error taxonomy and its wire representation

pub mod codes;
pub mod problem;
pub mod response;

pub use codes::ProblemKind;
pub use problem::{HttpError, Problem, ValidationErrors, INTERNAL_SERVER_ERROR_DETAIL};
pub use response::{ProxyResponse, PROBLEM_CONTENT_TYPE};
