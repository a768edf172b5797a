//! [`ComplaintStore`] over the storage service's internal complaint API.
//!
//! - `POST /internal/complaints` creates one record and returns it.
//! - `GET /internal/complaints?user_id=...` lists one owner's records, oldest
//!   first. The order is storage's contract; nothing here re-sorts.

use async_trait::async_trait;
use diary::{Collaborator, CollaboratorError, Complaint, ComplaintStore, NewComplaint, OwnerId};

use crate::{CollaboratorEndpoint, RemoteClient, SetupError};

const COMPLAINTS_PATH: &str = "/internal/complaints";

/// Storage service client.
#[derive(Debug, Clone)]
pub struct HttpComplaintStore {
    client: RemoteClient,
}

impl HttpComplaintStore {
    pub fn new(endpoint: &CollaboratorEndpoint) -> Result<Self, SetupError> {
        Ok(Self {
            client: RemoteClient::new(Collaborator::Storage, endpoint)?,
        })
    }
}

#[async_trait]
impl ComplaintStore for HttpComplaintStore {
    async fn create(&self, complaint: &NewComplaint) -> Result<Complaint, CollaboratorError> {
        self.client.post_json(COMPLAINTS_PATH, complaint).await
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<Complaint>, CollaboratorError> {
        self.client
            .get_json(COMPLAINTS_PATH, &[("user_id", owner.as_str())])
            .await
    }
}
