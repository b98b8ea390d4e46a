//! Face feature extraction contract and implementations.
//!
//! The extractor is a black box that turns encoded image bytes into a
//! fixed-dimension embedding vector, or reports that the image carries
//! no usable face. The rest of the system depends only on the
//! [`FaceExtractor`] trait:
//!
//! - [`RemoteExtractor`]: client for an inference sidecar that owns the
//!   detection and embedding models
//! - [`StubExtractor`]: in-memory table for tests

mod error;
mod extractor;
mod remote;
mod stub;

pub use error::ExtractError;
pub use extractor::FaceExtractor;
pub use remote::{DEFAULT_BASE_URL, DEFAULT_DIMENSION, RemoteExtractor};
pub use stub::StubExtractor;
