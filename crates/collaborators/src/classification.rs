//! [`Classifier`] over the classification service's `POST /classify`.

use async_trait::async_trait;
use diary::{ClassificationResult, Classifier, Collaborator, CollaboratorError};
use serde::Serialize;

use crate::{CollaboratorEndpoint, RemoteClient, SetupError};

const CLASSIFY_PATH: &str = "/classify";

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

/// Classification service client.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: RemoteClient,
}

impl HttpClassifier {
    pub fn new(endpoint: &CollaboratorEndpoint) -> Result<Self, SetupError> {
        Ok(Self {
            client: RemoteClient::new(Collaborator::Classification, endpoint)?,
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, CollaboratorError> {
        self.client
            .post_json(CLASSIFY_PATH, &ClassifyRequest { text })
            .await
    }
}
