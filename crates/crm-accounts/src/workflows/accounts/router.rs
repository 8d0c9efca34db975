use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::OwnerReferenceId;
use super::repository::{AccountRepository, RepositoryError};
use super::search::{CandidateSearch, SEARCH_FAILED_MESSAGE};
use super::service::{AccountIntakeService, AccountServiceError};

/// Body shared by the name-check and create endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNameRequest {
    pub company_name: String,
    pub owner_reference_id: OwnerReferenceId,
}

/// Router builder exposing account intake endpoints.
pub fn account_router<S, R>(service: Arc<AccountIntakeService<S, R>>) -> Router
where
    S: CandidateSearch + 'static,
    R: AccountRepository + 'static,
{
    Router::new()
        .route("/api/v1/accounts/name-check", post(name_check_handler::<S, R>))
        .route(
            "/api/v1/accounts",
            post(create_handler::<S, R>).get(list_handler::<S, R>),
        )
        .with_state(service)
}

pub(crate) async fn name_check_handler<S, R>(
    State(service): State<Arc<AccountIntakeService<S, R>>>,
    Json(request): Json<AccountNameRequest>,
) -> Response
where
    S: CandidateSearch + 'static,
    R: AccountRepository + 'static,
{
    match service
        .check_name(&request.company_name, &request.owner_reference_id)
        .await
    {
        Ok(check) => (StatusCode::OK, Json(check)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<S, R>(
    State(service): State<Arc<AccountIntakeService<S, R>>>,
    Json(request): Json<AccountNameRequest>,
) -> Response
where
    S: CandidateSearch + 'static,
    R: AccountRepository + 'static,
{
    match service
        .create_account(&request.company_name, request.owner_reference_id)
        .await
    {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S, R>(
    State(service): State<Arc<AccountIntakeService<S, R>>>,
) -> Response
where
    S: CandidateSearch + 'static,
    R: AccountRepository + 'static,
{
    match service.accounts() {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AccountServiceError) -> Response {
    match error {
        AccountServiceError::Rejected(rejection) => {
            let payload = json!({
                "error": rejection.to_string(),
                "code": rejection.code(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        AccountServiceError::Search(_) => {
            let payload = json!({ "error": SEARCH_FAILED_MESSAGE });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
        AccountServiceError::OwnedByAnotherAgent { verdict } => {
            let payload = json!({
                "error": verdict.message,
                "verdict": verdict,
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        AccountServiceError::Repository(RepositoryError::Conflict { existing }) => {
            let payload = json!({
                "error": format!("account '{existing}' already exists"),
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        AccountServiceError::Repository(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
