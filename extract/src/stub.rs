//! In-memory extractor implementation for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::ExtractError;
use crate::extractor::FaceExtractor;

/// A table-driven extractor for tests.
///
/// Returns the embedding registered for the exact input bytes, `None`
/// for anything unregistered, and `Unavailable` when configured to
/// simulate a dead model. Counts calls so tests can assert that a
/// short-circuit path never reached the extractor.
pub struct StubExtractor {
    dim: usize,
    entries: HashMap<Vec<u8>, Vec<f32>>,
    unavailable: Option<String>,
    calls: AtomicUsize,
}

impl StubExtractor {
    /// Create an empty stub producing vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dim: dimension,
            entries: HashMap::new(),
            unavailable: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Register an embedding for the exact image bytes.
    pub fn with(mut self, image: &[u8], embedding: Vec<f32>) -> Self {
        assert_eq!(embedding.len(), self.dim, "stub embedding dimension");
        self.entries.insert(image.to_vec(), embedding);
        self
    }

    /// Make every extraction fail with [`ExtractError::Unavailable`].
    pub fn unavailable(mut self, reason: &str) -> Self {
        self.unavailable = Some(reason.to_string());
        self
    }

    /// Number of extraction calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FaceExtractor for StubExtractor {
    async fn extract(&self, image: &[u8]) -> Result<Option<Vec<f32>>, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.unavailable {
            return Err(ExtractError::Unavailable(reason.clone()));
        }
        Ok(self.entries.get(image).cloned())
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registered_and_unregistered_images() {
        let stub = StubExtractor::new(2).with(b"alice", vec![1.0, 0.0]);

        assert_eq!(stub.extract(b"alice").await.unwrap(), Some(vec![1.0, 0.0]));
        assert_eq!(stub.extract(b"bob").await.unwrap(), None);
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let stub = StubExtractor::new(2).unavailable("model load failed");
        let err = stub.extract(b"alice").await.unwrap_err();
        assert!(matches!(err, ExtractError::Unavailable(_)));
    }
}
