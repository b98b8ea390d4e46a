use std::sync::Arc;

use uuid::Uuid;

use facegate_extract::FaceExtractor;

use crate::error::FaceIdError;
use crate::store::IdentityStore;

/// Enrolls new identities from face images.
///
/// Owns the enrollment invariant: the population never exceeds the
/// configured capacity, and a failed enrollment leaves no trace in the
/// store. The count check here is only a cheap short-circuit that
/// avoids an extractor call when the population is already full; the
/// store re-checks capacity inside its atomic insert, which is what
/// actually closes the check-then-act race under concurrent enrollment.
pub struct EnrollmentService {
    extractor: Arc<dyn FaceExtractor>,
    store: Arc<dyn IdentityStore>,
    capacity: usize,
}

impl EnrollmentService {
    pub fn new(
        extractor: Arc<dyn FaceExtractor>,
        store: Arc<dyn IdentityStore>,
        capacity: usize,
    ) -> Self {
        Self {
            extractor,
            store,
            capacity,
        }
    }

    /// Enroll a new identity from encoded image bytes and return its id.
    ///
    /// The identity is stored with the system-wide default threshold
    /// (no per-identity override).
    pub async fn enroll(&self, image: &[u8]) -> Result<Uuid, FaceIdError> {
        if self.store.count()? >= self.capacity {
            return Err(FaceIdError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let embedding = match self.extractor.extract(image).await? {
            Some(embedding) => embedding,
            None => return Err(FaceIdError::ExtractionFailed),
        };

        let record = self.store.insert(&embedding, None)?;
        Ok(record.id)
    }
}
