//! Port traits implemented by infrastructure.
//!
//! The orchestrator and aggregator only ever see these traits. The
//! `collaborators` crate supplies HTTP implementations; [`crate::in_memory`]
//! supplies in-process ones for tests.

use async_trait::async_trait;

use crate::{
    ClassificationResult, CollaboratorError, Complaint, NewComplaint, OwnerId, Timestamp,
};

/// The classification collaborator.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies free complaint text into an ICPC-2/ICD-10 code pair.
    ///
    /// Implementations pass the text through untouched, including empty text.
    async fn classify(&self, text: &str) -> Result<ClassificationResult, CollaboratorError>;
}

/// The storage collaborator.
///
/// `create` is not idempotent: storage assigns a fresh identifier to every
/// call, so callers must not retry it blindly.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    /// Persists a classified complaint and returns the stored record with its
    /// storage-assigned identifier and creation timestamp.
    async fn create(&self, complaint: &NewComplaint) -> Result<Complaint, CollaboratorError>;

    /// Lists an owner's complaints in storage order (oldest first).
    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Complaint>, CollaboratorError>;
}

/// Source of the reference instant for time-windowed aggregation.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// [`Clock`] backed by the system UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
