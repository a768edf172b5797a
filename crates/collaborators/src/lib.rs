//! Health diary collaborator adapters.
//!
//! Implements the [`diary::Classifier`] and [`diary::ComplaintStore`] ports
//! over HTTP/JSON, on top of a shared time-bounded [`RemoteClient`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport, URL construction, deadlines and response
//! decoding live here. The [`diary`] crate sees only its own port traits and
//! [`diary::CollaboratorError`]; `reqwest` types never cross this boundary.
//!
//! ## Failure classification
//!
//! | Observation | Result |
//! |-------------|--------|
//! | connect failure, DNS failure, deadline elapsed | [`diary::CollaboratorError::Unavailable`] |
//! | response with a non-2xx status | [`diary::CollaboratorError::Failed`] (status + body) |
//! | 2xx with a body that does not decode | [`diary::CollaboratorError::MalformedResponse`] |
//!
//! There are no retries at this layer.

pub mod classification;
pub mod remote;
pub mod storage;

pub use classification::HttpClassifier;
pub use remote::{CollaboratorEndpoint, RemoteClient, SetupError, DEFAULT_TIMEOUT};
pub use storage::HttpComplaintStore;
