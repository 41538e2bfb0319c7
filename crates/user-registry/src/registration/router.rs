use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::clock::Clock;
use super::domain::{Candidate, RegistrationOutcome};
use super::service::RegistrationService;
use super::store::UserStore;

/// Router builder exposing the registration endpoint.
pub fn registration_router<S, C>(service: Arc<RegistrationService<S, C>>) -> Router
where
    S: UserStore + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<S, C>))
        .with_state(service)
}

pub(crate) fn status_for(outcome: RegistrationOutcome) -> StatusCode {
    match outcome {
        RegistrationOutcome::Success => StatusCode::CREATED,
        RegistrationOutcome::UserAlreadyExists => StatusCode::CONFLICT,
        RegistrationOutcome::NameInvalid
        | RegistrationOutcome::DateOfBirthInvalid
        | RegistrationOutcome::EmailInvalid
        | RegistrationOutcome::PasswordInvalid => StatusCode::UNPROCESSABLE_ENTITY,
        RegistrationOutcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) async fn register_handler<S, C>(
    State(service): State<Arc<RegistrationService<S, C>>>,
    axum::Json(candidate): axum::Json<Candidate>,
) -> Response
where
    S: UserStore + 'static,
    C: Clock + 'static,
{
    // The store may touch the filesystem; keep it off the async workers.
    let outcome = match tokio::task::spawn_blocking(move || service.register(candidate)).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(error = %err, "registration task failed");
            RegistrationOutcome::InternalError
        }
    };
    let payload = json!({
        "outcome": outcome.label(),
        "message": outcome.message(),
    });
    (status_for(outcome), axum::Json(payload)).into_response()
}
