//! Failure taxonomy for collaborator calls and the outcomes callers see.
//!
//! [`CollaboratorError`] is what a port implementation returns when a remote
//! call goes wrong. [`GatewayError`] is what the orchestrator and aggregator
//! return to the HTTP surface after applying the status policy:
//!
//! | Collaborator | Failure | Caller sees |
//! |--------------|---------|-------------|
//! | either | unreachable / timed out | 503, "<name> service unavailable" |
//! | classification | non-2xx | 503, "<name> service error" (upstream status hidden) |
//! | storage | non-2xx | upstream status and body, unchanged |
//! | classification | malformed 2xx body | 503, "<name> service error" |
//! | storage | malformed 2xx body | 502 |
//!
//! Nothing here is retried. A single failed attempt fails the whole request.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// The remote services the gateway depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    /// Free text in, ICPC-2/ICD-10 code pair out.
    Classification,
    /// Complaint persistence (create, list by owner).
    Storage,
}

impl Collaborator {
    /// Human-facing service name used in error details and log fields.
    pub fn service_name(self) -> &'static str {
        match self {
            Self::Classification => "NLP",
            Self::Storage => "Complaints",
        }
    }
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.service_name())
    }
}

// ---------------------------------------------------------------------------
// Collaborator failures
// ---------------------------------------------------------------------------

/// A failed call to a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// No response was obtained: connection refused, DNS failure, or the
    /// deadline elapsed. Timeouts are deliberately not distinguished.
    #[error("{collaborator} service unavailable: {reason}")]
    Unavailable {
        collaborator: Collaborator,
        reason: String,
    },

    /// The collaborator answered with a non-success status.
    #[error("{collaborator} service returned status {status}")]
    Failed {
        collaborator: Collaborator,
        /// Upstream HTTP status code.
        status: u16,
        /// Upstream response body, verbatim.
        body: String,
    },

    /// The collaborator answered 2xx but the body did not match its contract.
    #[error("{collaborator} service sent a malformed response: {reason}")]
    MalformedResponse {
        collaborator: Collaborator,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Caller-visible outcomes
// ---------------------------------------------------------------------------

/// A failed gateway operation, already mapped to what the caller should see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request itself was unusable; no collaborator was called.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A collaborator could not be reached.
    #[error("{0} service unavailable")]
    ServiceUnavailable(Collaborator),

    /// A collaborator answered but failed, and its detail is not forwarded.
    #[error("{0} service error")]
    ServiceError(Collaborator),

    /// Storage rejected the call; its status and body go to the caller unchanged.
    #[error("{collaborator} service error (status {status})")]
    Upstream {
        collaborator: Collaborator,
        status: u16,
        body: String,
    },

    /// A collaborator broke its response contract and the failure is surfaced
    /// as a bad gateway.
    #[error("{0} service sent an unreadable response")]
    BadGateway(Collaborator),
}

impl GatewayError {
    /// Maps a classification failure. Upstream status and body never leak.
    pub fn from_classification(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Unavailable { collaborator, .. } => {
                Self::ServiceUnavailable(collaborator)
            }
            CollaboratorError::Failed { collaborator, .. }
            | CollaboratorError::MalformedResponse { collaborator, .. } => {
                Self::ServiceError(collaborator)
            }
        }
    }

    /// Maps a storage failure. A non-success status passes through unchanged.
    pub fn from_storage(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Unavailable { collaborator, .. } => {
                Self::ServiceUnavailable(collaborator)
            }
            CollaboratorError::Failed {
                collaborator,
                status,
                body,
            } => Self::Upstream {
                collaborator,
                status,
                body,
            },
            CollaboratorError::MalformedResponse { collaborator, .. } => {
                Self::BadGateway(collaborator)
            }
        }
    }

    /// HTTP status the caller receives.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 422,
            Self::ServiceUnavailable(_) | Self::ServiceError(_) => 503,
            Self::Upstream { status, .. } => *status,
            Self::BadGateway(_) => 502,
        }
    }
}
