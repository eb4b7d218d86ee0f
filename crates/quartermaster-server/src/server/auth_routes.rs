//! `/api/auth` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quartermaster_core::{Principal, Role, authorize_role};

use super::error::ApiError;
use super::state::AppState;
use crate::auth::RegistrationDraft;
use crate::storage::LedgerStore;

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Principal,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: Principal,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Principal,
}

/// `POST /api/auth/login`
#[instrument(skip_all)]
pub async fn login<S: LedgerStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;
    let (Some(username), Some(password)) = (req.username, req.password) else {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    };

    let session = state.identity.login(&username, &password).await?;
    Ok(Json(LoginResponse {
        token: session.token,
        user: session.principal,
    }))
}

/// `POST /api/auth/register` (admin only)
#[instrument(skip_all, fields(requestor = %requestor.id))]
pub async fn register<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(requestor): Extension<Principal>,
    payload: Result<Json<RegistrationDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    // A malformed body from a non-admin is still a 403.
    let draft = match payload {
        Ok(Json(draft)) => draft,
        Err(_) if !authorize_role(&requestor, &[Role::Admin]) => return Err(ApiError::Forbidden),
        Err(rejection) => return Err(rejection.into()),
    };

    let user = state.identity.register(&requestor, draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".into(),
            user,
        }),
    ))
}

/// `GET /api/auth/me`
pub async fn me(Extension(principal): Extension<Principal>) -> Json<MeResponse> {
    Json(MeResponse { user: principal })
}
