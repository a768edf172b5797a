//! Gateway routes driven in-process against in-memory collaborators.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use diary::in_memory::{FixedClock, InMemoryComplaintStore, StaticClassifier};
use diary::{
    ClassificationCode, ClassificationResult, Collaborator, CollaboratorError, ComplaintIntake,
    Confidence, HealthIndicatorService, Timestamp,
};
use gateway::{router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestGateway {
    classifier: Arc<StaticClassifier>,
    store: Arc<InMemoryComplaintStore>,
    router: Router,
}

impl TestGateway {
    fn new() -> Self {
        let clock = Arc::new(FixedClock::new(
            Timestamp::parse("2026-10-19T08:00:00Z").unwrap(),
        ));
        let classifier = Arc::new(StaticClassifier::new(ClassificationResult {
            icpc_code: ClassificationCode::new("R05"),
            icd_code: ClassificationCode::new("R05"),
            icpc_confidence: Confidence::new(0.8).unwrap(),
            icd_confidence: Confidence::new(0.8).unwrap(),
        }));
        let store = Arc::new(InMemoryComplaintStore::new(clock.clone()));
        let state = AppState::new(
            ComplaintIntake::new(classifier.clone(), store.clone()),
            HealthIndicatorService::new(store.clone(), clock),
        );
        Self {
            classifier,
            store,
            router: router(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
        };
        (status, body)
    }

    async fn post_complaint(&self, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::post("/api/complaints")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }
}

#[tokio::test]
async fn complaint_flows_into_health_indicators() {
    let gw = TestGateway::new();

    let (status, complaint) = gw
        .post_complaint(json!({"user_id": "u1", "text": "сухий кашель вночі"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        complaint,
        json!({
            "id": 1,
            "user_id": "u1",
            "text": "сухий кашель вночі",
            "icpc_code": "R05",
            "icd_code": "R05",
            "created_at": "2026-10-19T08:00:00Z",
        })
    );

    let (status, indicators) = gw.get("/api/health-indicators?user_id=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        indicators,
        json!({
            "user_id": "u1",
            "total_complaints": 1,
            "health_score": 99,
            "last_complaint_date": "2026-10-19T08:00:00Z",
        })
    );
}

#[tokio::test]
async fn owner_without_history_gets_full_score_and_null_date() {
    let gw = TestGateway::new();

    let (status, indicators) = gw.get("/api/health-indicators?user_id=nobody").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(indicators["health_score"], json!(100));
    assert_eq!(indicators["total_complaints"], json!(0));
    assert_eq!(indicators["last_complaint_date"], Value::Null);
}

#[tokio::test]
async fn classification_failure_becomes_generic_service_error() {
    let gw = TestGateway::new();
    gw.classifier.respond_with(Err(CollaboratorError::Failed {
        collaborator: Collaborator::Classification,
        status: 400,
        body: r#"{"detail":"text too long"}"#.into(),
    }));

    let (status, body) = gw.post_complaint(json!({"user_id": "u1", "text": "кашель"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"detail": "NLP service error"}));
    assert_eq!(gw.store.create_calls(), 0);
}

#[tokio::test]
async fn unreachable_classifier_is_service_unavailable() {
    let gw = TestGateway::new();
    gw.classifier.respond_with(Err(CollaboratorError::Unavailable {
        collaborator: Collaborator::Classification,
        reason: "deadline elapsed".into(),
    }));

    let (status, body) = gw.post_complaint(json!({"user_id": "u1", "text": "кашель"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"detail": "NLP service unavailable"}));
    assert_eq!(gw.store.create_calls(), 0);
}

#[tokio::test]
async fn storage_rejection_is_forwarded_verbatim() {
    let gw = TestGateway::new();
    gw.store.fail_with(CollaboratorError::Failed {
        collaborator: Collaborator::Storage,
        status: 409,
        body: r#"{"detail":"duplicate complaint"}"#.into(),
    });

    let (status, body) = gw.post_complaint(json!({"user_id": "u1", "text": "кашель"})).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"detail": "duplicate complaint"}));
}

#[tokio::test]
async fn storage_outage_during_create_writes_nothing() {
    let gw = TestGateway::new();
    gw.store.fail_with(CollaboratorError::Unavailable {
        collaborator: Collaborator::Storage,
        reason: "connection refused".into(),
    });

    let (status, body) = gw.post_complaint(json!({"user_id": "u1", "text": "кашель"})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"detail": "Complaints service unavailable"}));

    gw.store.recover();
    let (status, complaints) = gw.get("/api/complaints?user_id=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(complaints, json!([]));
}

#[tokio::test]
async fn list_storage_failure_passes_status_through() {
    let gw = TestGateway::new();
    gw.store.fail_with(CollaboratorError::Failed {
        collaborator: Collaborator::Storage,
        status: 500,
        body: "database is locked".into(),
    });

    let (status, body) = gw.get("/api/complaints?user_id=u1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!("database is locked"));
}

#[tokio::test]
async fn missing_or_empty_owner_is_rejected_before_storage() {
    let gw = TestGateway::new();

    for uri in [
        "/api/complaints",
        "/api/complaints?user_id=",
        "/api/health-indicators",
        "/api/health-indicators?user_id=",
    ] {
        let (status, body) = gw.get(uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body, json!({"detail": "Invalid request: user_id is required"}));
    }
    assert_eq!(gw.store.list_calls(), 0);
}

#[tokio::test]
async fn malformed_complaint_body_never_reaches_classification() {
    let gw = TestGateway::new();

    for payload in [json!({"text": "кашель"}), json!({"user_id": "", "text": "кашель"})] {
        let (status, _) = gw.post_complaint(payload).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
    assert_eq!(gw.classifier.calls(), 0);
}

#[tokio::test]
async fn listing_twice_yields_identical_results() {
    let gw = TestGateway::new();
    gw.post_complaint(json!({"user_id": "u1", "text": "кашель"})).await;
    gw.post_complaint(json!({"user_id": "u1", "text": "головний біль"})).await;

    let first = gw.get("/api/complaints?user_id=u1").await;
    let second = gw.get("/api/complaints?user_id=u1").await;

    assert_eq!(first, second);
    assert_eq!(first.1.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn liveness_check_does_not_touch_collaborators() {
    let gw = TestGateway::new();

    let (status, body) = gw.get("/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    assert_eq!(gw.store.list_calls(), 0);
    assert_eq!(gw.classifier.calls(), 0);
}
