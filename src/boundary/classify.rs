use std::error::Error as StdError;

use crate::errors::HttpError;

/// Recognizes failures that carry a taxonomy error.
///
/// Anything returning `None` is unclassified and gets masked as an Internal
/// Server Error at the boundary.
///
/// Implemented for `HttpError`, `anyhow::Error` and boxed std errors. A
/// handler failing with any other error type (`std::io::Error`, a crate's own
/// enum) should return `anyhow::Result` and let `?` convert; those failures
/// are then unclassified unless an `HttpError` sits in their chain.
pub trait Classify {
    fn classify(&self) -> Option<&HttpError>;
}

impl Classify for HttpError {
    fn classify(&self) -> Option<&HttpError> {
        Some(self)
    }
}

/// Finds an `HttpError` anywhere in the chain, including under `.context(..)`
impl Classify for anyhow::Error {
    fn classify(&self) -> Option<&HttpError> {
        self.downcast_ref::<HttpError>()
            .or_else(|| self.chain().find_map(|cause| cause.downcast_ref::<HttpError>()))
    }
}

impl Classify for Box<dyn StdError + Send + Sync> {
    fn classify(&self) -> Option<&HttpError> {
        let root: &(dyn StdError + 'static) = self.as_ref();
        std::iter::successors(Some(root), |cause| (*cause).source())
            .find_map(|cause| cause.downcast_ref::<HttpError>())
    }
}
