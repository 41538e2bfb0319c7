use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::registration::domain::Candidate;
use crate::registration::router::{register_handler, registration_router};
use crate::registration::domain::UserRecord;
use crate::registration::store::{InMemoryUserStore, StoreError, UserStore};
use crate::registration::{FixedClock, RegistrationService};

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

fn post_users(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/users")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn register_handler_returns_created_on_success() {
    let (service, store) = build_service();

    let response = register_handler::<InMemoryUserStore, FixedClock>(
        State(Arc::new(service)),
        axum::Json(candidate()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["outcome"], "success");
    assert_eq!(stored(&store).len(), 1);
}

#[tokio::test]
async fn register_handler_returns_conflict_on_duplicate() {
    let (service, _store) = seeded_service(vec![record("asokoIdris", "asoko@kundabox.com")]);

    let response = register_handler::<InMemoryUserStore, FixedClock>(
        State(Arc::new(service)),
        axum::Json(candidate()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["outcome"], "user_already_exists");
}

#[tokio::test]
async fn register_handler_returns_internal_error_on_store_failure() {
    let service = RegistrationService::new(Arc::new(UnavailableStore), Arc::new(FixedClock(today())));

    let response = register_handler::<UnavailableStore, FixedClock>(
        State(Arc::new(service)),
        axum::Json(candidate()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["outcome"], "internal_error");
}

struct PanickingStore;

impl UserStore for PanickingStore {
    fn load_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        panic!("store backend crashed");
    }

    fn append(&self, _record: UserRecord) -> Result<(), StoreError> {
        Ok(())
    }
}

#[tokio::test]
async fn register_handler_survives_a_crashing_store() {
    let service = RegistrationService::new(Arc::new(PanickingStore), Arc::new(FixedClock(today())));

    let response = register_handler::<PanickingStore, FixedClock>(
        State(Arc::new(service)),
        axum::Json(candidate()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["outcome"], "internal_error");
}

#[tokio::test]
async fn router_accepts_dob_alias() {
    let (service, store) = build_service();
    let app = registration_router(Arc::new(service));

    let response = app
        .oneshot(post_users(json!({
            "name": "asokoIdris",
            "dob": "1/1/2000",
            "email": "asoko@kundabox.com",
            "password": "12ABCabc",
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(stored(&store)[0].date_of_birth, "1/1/2000");
}

#[tokio::test]
async fn router_maps_non_text_name_to_unprocessable() {
    let (service, _store) = build_service();
    let app = registration_router(Arc::new(service));

    let response = app
        .oneshot(post_users(json!({
            "name": 123,
            "date_of_birth": "1/1/2000",
            "email": "asokoIdris@kundabox.com",
            "password": "12ABCabc",
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["outcome"], "name_invalid");
    assert_eq!(
        body["message"],
        "name must be text between 5 and 16 characters"
    );
}

#[tokio::test]
async fn router_treats_missing_fields_as_invalid() {
    let (service, _store) = build_service();
    let app = registration_router(Arc::new(service));

    let response = app
        .oneshot(post_users(json!({
            "name": "asokoIdris",
            "date_of_birth": "1/1/2000",
        })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["outcome"], "email_invalid");
}

#[test]
fn candidate_deserializes_mixed_field_types() {
    let candidate: Candidate = serde_json::from_value(json!({
        "name": "asokoIdris",
        "dob": "1/1/2000",
        "email": 123456789,
        "password": null,
    }))
    .expect("any json values are accepted");

    assert_eq!(candidate.name.as_text(), Some("asokoIdris"));
    assert_eq!(candidate.date_of_birth.as_text(), Some("1/1/2000"));
    assert!(!candidate.email.is_text());
    assert!(!candidate.password.is_text());
}
