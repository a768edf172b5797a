//! Health diary gateway HTTP surface.
//!
//! Exposes the [`diary`] orchestration layer to browser and mobile clients:
//!
//! | Route | Handler |
//! |-------|---------|
//! | `POST /api/complaints` | classify + store one complaint |
//! | `GET /api/complaints?user_id=` | list an owner's complaints |
//! | `GET /api/health-indicators?user_id=` | derived health score for an owner |
//! | `GET /healthz` | liveness check, touches no collaborator |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request decoding, input validation, status mapping and
//! HTTP middleware live here. Every decision about *which* status a
//! collaborator failure becomes is made in [`diary::GatewayError`]; this crate
//! only renders it.

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{router, AppState};

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

/// Serves `state` on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to finish once shutdown begins.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "gateway listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
