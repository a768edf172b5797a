//! Core domain for the health diary gateway.
//!
//! The gateway composes two remote collaborators into user-facing operations:
//! a classification service that turns complaint text into an ICPC-2/ICD-10
//! code pair, and a storage service that persists and lists complaints. This
//! crate holds every domain concept, the ports those collaborators are reached
//! through, and the two pieces of real logic that sit on top of them.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; the `collaborators` crate defines *how* to
//! reach the remote services, and the `gateway` crate exposes the result over
//! HTTP.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`OwnerId`, `ComplaintId`, `ClassificationCode`) |
//! | [`types`] | Value types (`Complaint`, `ClassificationResult`, `HealthIndicators`, ...) |
//! | [`errors`] | Collaborator failures and caller-visible outcomes |
//! | [`ports`] | `Classifier`, `ComplaintStore` and `Clock` traits |
//! | [`intake`] | Complaint creation orchestration (classify, then persist) |
//! | [`indicators`] | Health-indicator aggregation over a complaint history |
//! | [`in_memory`] | In-process port implementations for tests and local runs |

pub mod errors;
pub mod identifiers;
pub mod in_memory;
pub mod indicators;
pub mod intake;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{Collaborator, CollaboratorError, GatewayError};
pub use identifiers::{ClassificationCode, ComplaintId, OwnerId};
pub use indicators::{summarize, HealthIndicatorService, WINDOW_DAYS};
pub use intake::ComplaintIntake;
pub use ports::{Classifier, Clock, ComplaintStore, SystemClock};
pub use types::{
    ClassificationResult, Complaint, ComplaintRequest, Confidence, HealthIndicators, HealthScore,
    NewComplaint, Timestamp,
};
