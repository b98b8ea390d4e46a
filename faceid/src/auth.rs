use std::sync::Arc;

use uuid::Uuid;

use facegate_extract::FaceExtractor;

use crate::error::FaceIdError;
use crate::similarity::best_match;
use crate::store::IdentityStore;

/// Outcome of an authentication attempt that reached the decision step.
///
/// Rejection is an explicit outcome, not an error: callers must handle
/// both paths. A rejection carries only the best similarity score for
/// diagnostics, never the near-match identity, so an unauthenticated
/// caller cannot enumerate who is enrolled.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthDecision {
    Accepted { id: Uuid, similarity: f32 },
    Rejected { best_similarity: f32 },
}

/// Authenticates face images against the enrolled population.
///
/// Scans every enrolled identity per attempt (O(N·D)), acceptable at
/// the configured capacity. The scan itself lives in
/// [`crate::similarity::best_match`] so an indexed nearest-neighbor
/// structure can replace it without touching the decision logic here.
pub struct AuthenticationService {
    extractor: Arc<dyn FaceExtractor>,
    store: Arc<dyn IdentityStore>,
    default_threshold: f32,
}

impl AuthenticationService {
    pub fn new(
        extractor: Arc<dyn FaceExtractor>,
        store: Arc<dyn IdentityStore>,
        default_threshold: f32,
    ) -> Self {
        Self {
            extractor,
            store,
            default_threshold,
        }
    }

    /// Authenticate encoded image bytes against every enrolled identity.
    ///
    /// The winning record's per-identity threshold override applies when
    /// present, the system-wide default otherwise. The decision is a
    /// strict greater-than: a score exactly equal to the threshold is a
    /// rejection.
    pub async fn authenticate(&self, image: &[u8]) -> Result<AuthDecision, FaceIdError> {
        let probe = match self.extractor.extract(image).await? {
            Some(embedding) => embedding,
            None => return Err(FaceIdError::ExtractionFailed),
        };

        let records = self.store.list_all()?;
        let Some((idx, score)) = best_match(&probe, records.iter().map(|r| r.embedding.as_slice()))
        else {
            return Err(FaceIdError::NoEnrolledIdentities);
        };

        let winner = &records[idx];
        let threshold = winner.threshold.unwrap_or(self.default_threshold);
        if score > threshold {
            Ok(AuthDecision::Accepted {
                id: winner.id,
                similarity: score,
            })
        } else {
            Ok(AuthDecision::Rejected {
                best_similarity: score,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use facegate_extract::StubExtractor;

    use crate::memory::MemoryStore;

    const DIM: usize = 4;
    const THRESHOLD: f32 = 0.6;

    fn service(stub: StubExtractor, store: Arc<MemoryStore>) -> AuthenticationService {
        AuthenticationService::new(Arc::new(stub), store, THRESHOLD)
    }

    #[tokio::test]
    async fn test_exact_match_accepted() {
        let store = Arc::new(MemoryStore::new(10, DIM));
        let enrolled = store.insert(&[1.0, 0.0, 0.0, 0.0], None).unwrap();
        let stub = StubExtractor::new(DIM).with(b"alice", vec![1.0, 0.0, 0.0, 0.0]);
        let service = service(stub, store);

        match service.authenticate(b"alice").await.unwrap() {
            AuthDecision::Accepted { id, similarity } => {
                assert_eq!(id, enrolled.id);
                assert!((similarity - 1.0).abs() < 1e-6);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_below_threshold_rejected_with_score() {
        let store = Arc::new(MemoryStore::new(10, DIM));
        store.insert(&[1.0, 0.0, 0.0, 0.0], None).unwrap();
        // cos(probe, enrolled) = 0.3 exactly: [0.3, sqrt(1 - 0.09), 0, 0].
        let probe = vec![0.3, (1.0f32 - 0.09).sqrt(), 0.0, 0.0];
        let stub = StubExtractor::new(DIM).with(b"stranger", probe);
        let service = service(stub, store);

        match service.authenticate(b"stranger").await.unwrap() {
            AuthDecision::Rejected { best_similarity } => {
                assert!((best_similarity - 0.3).abs() < 1e-5);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_score_equal_to_threshold_rejected() {
        // Per-identity override equal to a perfect score: strict
        // greater-than must still reject.
        let store = Arc::new(MemoryStore::new(10, DIM));
        store.insert(&[1.0, 0.0, 0.0, 0.0], Some(1.0)).unwrap();
        let stub = StubExtractor::new(DIM).with(b"alice", vec![1.0, 0.0, 0.0, 0.0]);
        let service = service(stub, store);

        match service.authenticate(b"alice").await.unwrap() {
            AuthDecision::Rejected { best_similarity } => {
                assert!((best_similarity - 1.0).abs() < 1e-6);
            }
            other => panic!("expected rejection at the boundary, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_per_identity_threshold_override() {
        let store = Arc::new(MemoryStore::new(10, DIM));
        // Strict override: even a 0.95 similarity is not enough.
        store.insert(&[1.0, 0.0, 0.0, 0.0], Some(0.99)).unwrap();
        let probe = vec![0.95, (1.0f32 - 0.95 * 0.95).sqrt(), 0.0, 0.0];
        let stub = StubExtractor::new(DIM).with(b"alice", probe);
        let service = service(stub, store);

        assert!(matches!(
            service.authenticate(b"alice").await.unwrap(),
            AuthDecision::Rejected { .. }
        ));
    }

    #[tokio::test]
    async fn test_tie_break_first_enrolled_wins() {
        let store = Arc::new(MemoryStore::new(10, DIM));
        let first = store.insert(&[0.0, 1.0, 0.0, 0.0], None).unwrap();
        let _second = store.insert(&[0.0, 1.0, 0.0, 0.0], None).unwrap();
        let stub = StubExtractor::new(DIM).with(b"twin", vec![0.0, 1.0, 0.0, 0.0]);
        let service = service(stub, store);

        match service.authenticate(b"twin").await.unwrap() {
            AuthDecision::Accepted { id, .. } => assert_eq!(id, first.id),
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_population() {
        let store = Arc::new(MemoryStore::new(10, DIM));
        let stub = StubExtractor::new(DIM).with(b"alice", vec![1.0, 0.0, 0.0, 0.0]);
        let service = service(stub, store);

        let err = service.authenticate(b"alice").await.unwrap_err();
        assert!(matches!(err, FaceIdError::NoEnrolledIdentities));
    }

    #[tokio::test]
    async fn test_extraction_failure() {
        let store = Arc::new(MemoryStore::new(10, DIM));
        store.insert(&[1.0, 0.0, 0.0, 0.0], None).unwrap();
        let stub = StubExtractor::new(DIM);
        let service = service(stub, store);

        let err = service.authenticate(b"blurry").await.unwrap_err();
        assert!(matches!(err, FaceIdError::ExtractionFailed));
    }

    #[tokio::test]
    async fn test_stable_population_same_winner() {
        let store = Arc::new(MemoryStore::new(10, DIM));
        store.insert(&[1.0, 0.0, 0.0, 0.0], None).unwrap();
        let expected = store.insert(&[0.9, 0.1, 0.0, 0.0], None).unwrap();
        store.insert(&[0.0, 0.0, 1.0, 0.0], None).unwrap();
        let probe = vec![0.9, 0.1, 0.0, 0.0];
        let stub = StubExtractor::new(DIM).with(b"alice", probe);
        let service = service(stub, store);

        for _ in 0..3 {
            match service.authenticate(b"alice").await.unwrap() {
                AuthDecision::Accepted { id, .. } => assert_eq!(id, expected.id),
                other => panic!("expected acceptance, got {other:?}"),
            }
        }
    }
}
