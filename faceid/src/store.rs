use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A single enrolled identity.
///
/// Records are created by the store at insert time and never mutated
/// afterwards. There is no update or delete path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Opaque unique identifier, generated at creation, never reused.
    pub id: Uuid,

    /// Face embedding vector. Always exactly the store's configured
    /// dimension; the store rejects anything else at insert.
    pub embedding: Vec<f32>,

    /// Per-identity acceptance threshold override. `None` means the
    /// system-wide default applies.
    pub threshold: Option<f32>,

    /// Set once by the store at insert.
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur in identity store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("faceid: store at capacity: {capacity} identities allowed")]
    CapacityExceeded { capacity: usize },

    #[error("faceid: dimension mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    #[error("faceid: storage error: {0}")]
    Storage(String),

    #[error("faceid: serialization error: {0}")]
    Serialization(String),
}

/// Persistence contract for enrolled identities.
///
/// Implementations must be safe for concurrent use (Send + Sync) and
/// must enforce the capacity bound inside [`IdentityStore::insert`]
/// itself: a concurrent pair of inserts against a store with one free
/// slot admits exactly one of them. A count-then-insert sequence in the
/// caller is only ever an optimization, never the enforcement point.
pub trait IdentityStore: Send + Sync {
    /// Return the number of enrolled identities.
    fn count(&self) -> Result<usize, StoreError>;

    /// Persist a new identity and return the stored record.
    ///
    /// Fails with [`StoreError::CapacityExceeded`] when the population
    /// is full and [`StoreError::DimensionMismatch`] when the embedding
    /// length does not match the configured dimension. The write is
    /// atomic; no partial record remains on failure.
    fn insert(
        &self,
        embedding: &[f32],
        threshold: Option<f32>,
    ) -> Result<IdentityRecord, StoreError>;

    /// Return every enrolled identity in insertion order.
    ///
    /// Insertion order is part of the contract: the authentication scan
    /// breaks similarity ties in favor of the earliest record.
    fn list_all(&self) -> Result<Vec<IdentityRecord>, StoreError>;
}
