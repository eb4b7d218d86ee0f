//! Bearer credential middleware for protected routes.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use super::state::AppState;
use crate::storage::LedgerStore;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authenticate the request and attach the resolved
/// [`Principal`](quartermaster_core::Principal) to its extensions.
pub async fn require_principal<S: LedgerStore>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = bearer_token(req.headers()).map(str::to_owned);
    let principal = state.identity.authenticate(credential.as_deref()).await?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}
