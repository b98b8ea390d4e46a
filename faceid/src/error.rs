use thiserror::Error;

use facegate_extract::ExtractError;

use crate::store::StoreError;

/// Domain errors surfaced by the enrollment and authentication services.
///
/// Every failure path is an explicit variant; the services never mask a
/// persistence failure as an authentication failure or vice versa.
#[derive(Error, Debug)]
pub enum FaceIdError {
    /// The input image carried no usable face embedding. A client-input
    /// problem, never retried automatically.
    #[error("faceid: no usable face embedding in input")]
    ExtractionFailed,

    /// The extractor itself cannot work: model never loaded or the
    /// inference sidecar is unreachable.
    #[error("faceid: extractor unavailable: {0}")]
    ExtractorUnavailable(String),

    /// The enrolled population is at capacity. A policy rejection, not
    /// a storage fault.
    #[error("faceid: capacity reached: {capacity} identities allowed")]
    CapacityExceeded { capacity: usize },

    /// Authentication was attempted against an empty population.
    #[error("faceid: no enrolled identities")]
    NoEnrolledIdentities,

    /// The store failed unexpectedly.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for FaceIdError {
    fn from(err: StoreError) -> Self {
        match err {
            // The store is the enforcement point for the capacity bound;
            // keep its rejection a policy error, not a storage fault.
            StoreError::CapacityExceeded { capacity } => FaceIdError::CapacityExceeded { capacity },
            other => FaceIdError::Store(other),
        }
    }
}

impl From<ExtractError> for FaceIdError {
    fn from(err: ExtractError) -> Self {
        FaceIdError::ExtractorUnavailable(err.to_string())
    }
}
