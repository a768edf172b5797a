//! Route table and handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use diary::{
    Complaint, ComplaintIntake, ComplaintRequest, GatewayError, HealthIndicatorService,
    HealthIndicators, OwnerId,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::ApiError;

/// Everything the handlers need. Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub intake: ComplaintIntake,
    pub indicators: HealthIndicatorService,
}

impl AppState {
    pub fn new(intake: ComplaintIntake, indicators: HealthIndicatorService) -> Self {
        Self { intake, indicators }
    }
}

/// Builds the gateway router with CORS open to any origin and per-request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/complaints", get(list_complaints).post(create_complaint))
        .route("/api/health-indicators", get(health_indicators))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Deserialize)]
struct OwnerQuery {
    user_id: Option<String>,
}

impl OwnerQuery {
    /// Storage lists every owner's complaints for an empty owner, so an empty
    /// or missing `user_id` is refused before any collaborator is called.
    fn owner(self) -> Result<OwnerId, ApiError> {
        self.user_id
            .and_then(OwnerId::new)
            .ok_or_else(|| GatewayError::InvalidRequest("user_id is required".into()).into())
    }
}

async fn create_complaint(
    State(state): State<AppState>,
    payload: Result<Json<ComplaintRequest>, JsonRejection>,
) -> Result<Json<Complaint>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| GatewayError::InvalidRequest(rejection.body_text()))?;
    Ok(Json(state.intake.submit(request).await?))
}

async fn list_complaints(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Complaint>>, ApiError> {
    let owner = query.owner()?;
    Ok(Json(state.intake.list(&owner).await?))
}

async fn health_indicators(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<HealthIndicators>, ApiError> {
    let owner = query.owner()?;
    Ok(Json(state.indicators.indicators(&owner).await?))
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
