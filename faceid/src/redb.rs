//! Redb-based persistent identity store implementation.

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use uuid::Uuid;

use crate::store::{IdentityRecord, IdentityStore, StoreError};

// Keyed by insertion sequence number. There is no delete path, so the
// key order is exactly the enrollment order.
const IDENTITIES: TableDefinition<u64, &[u8]> = TableDefinition::new("identities");

/// A persistent identity store backed by redb.
///
/// The capacity check and the insert run inside a single write
/// transaction. Redb serializes write transactions, so the capacity
/// bound holds under concurrent enrollment.
pub struct RedbStore {
    db: Database,
    capacity: usize,
    dimension: usize,
}

impl RedbStore {
    /// Open or create a redb store at the given path.
    pub fn open<P: AsRef<Path>>(
        path: P,
        capacity: usize,
        dimension: usize,
    ) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::Storage(e.to_string()))?;

        // Create the table if it doesn't exist
        let tx = db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let _ = tx
                .open_table(IDENTITIES)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(Self {
            db,
            capacity,
            dimension,
        })
    }
}

impl IdentityStore for RedbStore {
    fn count(&self) -> Result<usize, StoreError> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = tx
            .open_table(IDENTITIES)
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let len = table
            .len()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(len as usize)
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

        let record = IdentityRecord {
            id: Uuid::new_v4(),
            embedding: embedding.to_vec(),
            threshold,
            created_at: Utc::now(),
        };
        let payload =
            serde_json::to_vec(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tx = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = tx
                .open_table(IDENTITIES)
                .map_err(|e| StoreError::Storage(e.to_string()))?;

            let len = table
                .len()
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            if len as usize >= self.capacity {
                // Dropping the uncommitted transaction aborts it.
                return Err(StoreError::CapacityExceeded {
                    capacity: self.capacity,
                });
            }

            let seq = match table
                .last()
                .map_err(|e| StoreError::Storage(e.to_string()))?
            {
                Some((key, _)) => key.value() + 1,
                None => 0,
            };
            table
                .insert(seq, payload.as_slice())
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        tx.commit().map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<IdentityRecord>, StoreError> {
        let tx = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = tx
            .open_table(IDENTITIES)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let mut records = Vec::new();
        for entry in table
            .iter()
            .map_err(|e| StoreError::Storage(e.to_string()))?
        {
            let (_, value) = entry.map_err(|e| StoreError::Storage(e.to_string()))?;
            let record: IdentityRecord = serde_json::from_slice(value.value())
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }
}
