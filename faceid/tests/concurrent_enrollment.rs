//! Capacity enforcement under concurrent enrollment load.
//!
//! Fires capacity + K simultaneous enrollments at an empty store and
//! asserts exactly capacity of them succeed, for both store
//! implementations.

use std::sync::Arc;

use facegate_extract::StubExtractor;
use facegate_faceid::{EnrollmentService, FaceIdError, IdentityStore, MemoryStore, RedbStore};

const DIM: usize = 8;
const CAPACITY: usize = 10;
const EXTRA: usize = 4;

fn embedding() -> Vec<f32> {
    (0..DIM).map(|i| (i as f32 + 1.0).sin()).collect()
}

async fn storm(store: Arc<dyn IdentityStore>) {
    let stub = StubExtractor::new(DIM).with(b"face", embedding());
    let service = Arc::new(EnrollmentService::new(
        Arc::new(stub),
        store.clone(),
        CAPACITY,
    ));

    let barrier = Arc::new(tokio::sync::Barrier::new(CAPACITY + EXTRA));
    let mut handles = Vec::new();
    for _ in 0..(CAPACITY + EXTRA) {
        let service = service.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            service.enroll(b"face").await
        }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(FaceIdError::CapacityExceeded { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(accepted, CAPACITY);
    assert_eq!(rejected, EXTRA);
    assert_eq!(store.count().unwrap(), CAPACITY);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_store_never_overshoots() {
    storm(Arc::new(MemoryStore::new(CAPACITY, DIM))).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redb_store_never_overshoots() {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbStore::open(dir.path().join("ids.redb"), CAPACITY, DIM).unwrap();
    storm(Arc::new(store)).await;
}
