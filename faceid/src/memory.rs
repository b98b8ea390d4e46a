//! In-memory identity store implementation for testing.

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::store::{IdentityRecord, IdentityStore, StoreError};

/// An in-memory identity store backed by a Vec.
///
/// The capacity check and the append happen under one lock, so the
/// capacity bound holds under concurrent enrollment.
pub struct MemoryStore {
    capacity: usize,
    dimension: usize,
    records: Mutex<Vec<IdentityRecord>>,
}

impl MemoryStore {
    /// Create an empty store with the given capacity and embedding dimension.
    pub fn new(capacity: usize, dimension: usize) -> Self {
        Self {
            capacity,
            dimension,
            records: Mutex::new(Vec::new()),
        }
    }
}

impl IdentityStore for MemoryStore {
    fn count(&self) -> Result<usize, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(records.len())
    }

    fn insert(
        &self,
        embedding: &[f32],
        threshold: Option<f32>,
    ) -> Result<IdentityRecord, StoreError> {
        if embedding.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                got: embedding.len(),
                want: self.dimension,
            });
        }

        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        if records.len() >= self.capacity {
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let record = IdentityRecord {
            id: Uuid::new_v4(),
            embedding: embedding.to_vec(),
            threshold,
            created_at: Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<IdentityRecord>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(records.clone())
    }
}
