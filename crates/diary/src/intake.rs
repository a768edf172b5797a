//! Complaint creation: classify the text, then persist the classified record.
//!
//! The two steps are strictly sequential because storage needs the codes the
//! classifier returns. If classification fails, storage is never called, so a
//! degraded classifier cannot leave unclassified records behind. If storage
//! fails after a successful classification, the classification is simply
//! dropped. It has no side effects, so there is nothing to compensate.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    Classifier, Complaint, ComplaintRequest, ComplaintStore, GatewayError, NewComplaint, OwnerId,
};

/// Orchestrates complaint submission and listing over the two collaborator ports.
#[derive(Clone)]
pub struct ComplaintIntake {
    classifier: Arc<dyn Classifier>,
    store: Arc<dyn ComplaintStore>,
}

impl ComplaintIntake {
    pub fn new(classifier: Arc<dyn Classifier>, store: Arc<dyn ComplaintStore>) -> Self {
        Self { classifier, store }
    }

    /// Classifies and stores one complaint.
    ///
    /// Returns the stored record exactly as storage reported it. Either the
    /// complaint is both classified and stored, or an error is returned and
    /// nothing was written.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::ServiceUnavailable`] if either collaborator is unreachable.
    /// - [`GatewayError::ServiceError`] if classification answers with a failure.
    /// - [`GatewayError::Upstream`] carrying storage's own status if storage
    ///   rejects the write.
    #[tracing::instrument(name = "complaint.submit", skip(self, request), fields(owner = %request.user_id))]
    pub async fn submit(&self, request: ComplaintRequest) -> Result<Complaint, GatewayError> {
        let classification = self
            .classifier
            .classify(&request.text)
            .await
            .map_err(|err| {
                warn!(error = %err, "classification failed; complaint not stored");
                GatewayError::from_classification(err)
            })?;

        debug!(
            icpc_code = ?classification.icpc_code,
            icd_code = ?classification.icd_code,
            icpc_confidence = %classification.icpc_confidence,
            icd_confidence = %classification.icd_confidence,
            "complaint classified"
        );

        let record = NewComplaint::classified(request, classification);
        let stored = self.store.create(&record).await.map_err(|err| {
            warn!(error = %err, "storing classified complaint failed");
            GatewayError::from_storage(err)
        })?;

        info!(complaint_id = %stored.id, "complaint stored");
        Ok(stored)
    }

    /// Lists an owner's complaints in storage order.
    #[tracing::instrument(name = "complaint.list", skip(self))]
    pub async fn list(&self, owner: &OwnerId) -> Result<Vec<Complaint>, GatewayError> {
        self.store.list_by_owner(owner).await.map_err(|err| {
            warn!(error = %err, "listing complaints failed");
            GatewayError::from_storage(err)
        })
    }
}
