//! In-process implementations of the collaborator ports.
//!
//! These let the orchestrator, the aggregator and the HTTP surface run without
//! any network. Each fake counts its calls and can be switched into a failing
//! mode, so tests can assert both what happened and what did not.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::{
    ClassificationResult, Classifier, Clock, CollaboratorError, Complaint, ComplaintId,
    ComplaintStore, NewComplaint, OwnerId, SystemClock, Timestamp,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoredComplaints {
    records: Vec<Complaint>,
    last_id: u64,
}

/// A [`ComplaintStore`] that keeps records in a vector.
///
/// Identifiers are assigned sequentially from 1 and `created_at` is stamped
/// from the injected [`Clock`], rendered the way the storage service does.
pub struct InMemoryComplaintStore {
    complaints: Mutex<StoredComplaints>,
    clock: Arc<dyn Clock>,
    failure: Mutex<Option<CollaboratorError>>,
    create_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl InMemoryComplaintStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            complaints: Mutex::new(StoredComplaints::default()),
            clock,
            failure: Mutex::new(None),
            create_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Makes every subsequent call fail with `err` until [`Self::recover`].
    pub fn fail_with(&self, err: CollaboratorError) {
        *lock(&self.failure) = Some(err);
    }

    /// Clears a failure installed by [`Self::fail_with`].
    pub fn recover(&self) {
        *lock(&self.failure) = None;
    }

    /// Stores a record verbatim, bypassing `create`. Useful for seeding
    /// histories with arbitrary (or broken) timestamps.
    pub fn seed(&self, complaint: Complaint) {
        let mut stored = lock(&self.complaints);
        stored.last_id = stored.last_id.max(complaint.id.as_u64());
        stored.records.push(complaint);
    }

    /// Number of `create` calls received, failed ones included.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of `list_by_owner` calls received, failed ones included.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), CollaboratorError> {
        match lock(&self.failure).as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryComplaintStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl ComplaintStore for InMemoryComplaintStore {
    async fn create(&self, complaint: &NewComplaint) -> Result<Complaint, CollaboratorError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let mut stored = lock(&self.complaints);
        stored.last_id += 1;
        let record = Complaint {
            id: ComplaintId::new(stored.last_id),
            user_id: complaint.user_id.clone(),
            text: complaint.text.clone(),
            icpc_code: complaint.icpc_code.clone(),
            icd_code: complaint.icd_code.clone(),
            created_at: Some(self.clock.now().to_string()),
        };
        stored.records.push(record.clone());
        Ok(record)
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Complaint>, CollaboratorError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        Ok(lock(&self.complaints)
            .records
            .iter()
            .filter(|c| &c.user_id == owner)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A [`Classifier`] that returns a preset answer regardless of the text.
pub struct StaticClassifier {
    answer: Mutex<Result<ClassificationResult, CollaboratorError>>,
    texts: Mutex<Vec<String>>,
}

impl StaticClassifier {
    pub fn new(result: ClassificationResult) -> Self {
        Self {
            answer: Mutex::new(Ok(result)),
            texts: Mutex::new(Vec::new()),
        }
    }

    /// A classifier that always fails with `err`.
    pub fn failing(err: CollaboratorError) -> Self {
        Self {
            answer: Mutex::new(Err(err)),
            texts: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the preset answer.
    pub fn respond_with(&self, answer: Result<ClassificationResult, CollaboratorError>) {
        *lock(&self.answer) = answer;
    }

    /// Texts received so far, in call order.
    pub fn texts(&self) -> Vec<String> {
        lock(&self.texts).clone()
    }

    pub fn calls(&self) -> usize {
        lock(&self.texts).len()
    }
}

#[async_trait]
impl Classifier for StaticClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, CollaboratorError> {
        lock(&self.texts).push(text.to_owned());
        lock(&self.answer).clone()
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A [`Clock`] that stays where it is put.
pub struct FixedClock(Mutex<Timestamp>);

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: Timestamp) {
        *lock(&self.0) = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *lock(&self.0)
    }
}
