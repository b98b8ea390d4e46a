use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The extractor cannot produce embeddings at all: the model never
    /// loaded or the inference sidecar is unreachable. Distinct from a
    /// per-image "no face found", which is a `None` result, not an error.
    #[error("extract: extractor unavailable: {0}")]
    Unavailable(String),

    #[error("extract: api error: {0}")]
    Api(String),
}
