//! Ledger collection handlers: `/api/assets`, `/api/purchases`,
//! `/api/transfers` and `/api/assignments`.
//!
//! Writes are gated by role, then validated, then checked against the
//! principal's base scope. Reads return the whole collection passed through
//! the visibility filter.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use tracing::{info, instrument, warn};

use quartermaster_core::records::{
    Asset, AssetDraft, Assignment, AssignmentDraft, BaseTargets, NewAsset, NewAssignment,
    NewPurchase, NewTransfer, Purchase, PurchaseDraft, Transfer, TransferDraft,
};
use quartermaster_core::{Principal, Role, authorize_base_scope, authorize_role, filter_visible};

use super::error::ApiError;
use super::state::AppState;
use crate::storage::LedgerStore;

const PROCUREMENT_ROLES: &[Role] = &[Role::Admin, Role::LogisticsOfficer];

fn ensure_role(principal: &Principal, allowed: &[Role]) -> Result<(), ApiError> {
    if authorize_role(principal, allowed) {
        Ok(())
    } else {
        warn!(user_id = %principal.id, role = %principal.role, "Role not permitted");
        Err(ApiError::Forbidden)
    }
}

/// Every base a write touches must be within the principal's scope.
fn ensure_base_scope<T: BaseTargets>(principal: &Principal, record: &T) -> Result<(), ApiError> {
    match record
        .target_bases()
        .into_iter()
        .find(|base| !authorize_base_scope(principal, base))
    {
        None => Ok(()),
        Some(base) => {
            warn!(user_id = %principal.id, target_base = base, "Write outside assigned base");
            Err(ApiError::Forbidden)
        }
    }
}

/// Unwrap the JSON body and run the draft through its validation.
fn validated<D, N>(payload: Result<Json<D>, JsonRejection>) -> Result<N, ApiError>
where
    N: TryFrom<D, Error = quartermaster_core::Error>,
{
    let Json(draft) = payload?;
    Ok(N::try_from(draft)?)
}

// === Assets ===

/// `GET /api/assets`
pub async fn list_assets<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    let assets = state.store.list_assets().await?;
    Ok(Json(filter_visible(&principal, assets)))
}

/// `POST /api/assets` (admin only)
#[instrument(skip_all, fields(user_id = %principal.id))]
pub async fn create_asset<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<AssetDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Asset>), ApiError> {
    ensure_role(&principal, &[Role::Admin])?;
    let asset: NewAsset = validated(payload)?;

    let stored = state.store.insert_asset(&asset).await?;
    info!(asset_id = stored.id, name = %stored.name, "Asset created");
    Ok((StatusCode::CREATED, Json(stored)))
}

// === Purchases ===

/// `GET /api/purchases`
pub async fn list_purchases<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Purchase>>, ApiError> {
    let purchases = state.store.list_purchases().await?;
    Ok(Json(filter_visible(&principal, purchases)))
}

/// `POST /api/purchases` (admin, logistics officer)
#[instrument(skip_all, fields(user_id = %principal.id))]
pub async fn create_purchase<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<PurchaseDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Purchase>), ApiError> {
    ensure_role(&principal, PROCUREMENT_ROLES)?;
    let purchase: NewPurchase = validated(payload)?;
    ensure_base_scope(&principal, &purchase)?;

    let stored = state.store.insert_purchase(&purchase).await?;
    info!(
        purchase_id = stored.id,
        name = %stored.name,
        quantity = stored.quantity,
        base = %stored.base_name,
        "Purchase recorded"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

// === Transfers ===

/// `GET /api/transfers`
pub async fn list_transfers<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Transfer>>, ApiError> {
    let transfers = state.store.list_transfers().await?;
    Ok(Json(filter_visible(&principal, transfers)))
}

/// `POST /api/transfers` (admin, logistics officer)
#[instrument(skip_all, fields(user_id = %principal.id))]
pub async fn create_transfer<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<TransferDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Transfer>), ApiError> {
    ensure_role(&principal, PROCUREMENT_ROLES)?;
    let transfer: NewTransfer = validated(payload)?;
    ensure_base_scope(&principal, &transfer)?;

    let stored = state.store.insert_transfer(&transfer).await?;
    info!(
        transfer_id = stored.id,
        asset = %stored.asset_name,
        quantity = stored.quantity,
        from = %stored.source_base,
        to = %stored.destination_base,
        "Transfer recorded"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

// === Assignments ===

/// `GET /api/assignments`
pub async fn list_assignments<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let assignments = state.store.list_assignments().await?;
    Ok(Json(filter_visible(&principal, assignments)))
}

/// `POST /api/assignments` (any role, within base scope)
#[instrument(skip_all, fields(user_id = %principal.id))]
pub async fn create_assignment<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<AssignmentDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    let assignment: NewAssignment = validated(payload)?;
    ensure_base_scope(&principal, &assignment)?;

    let stored = state.store.insert_assignment(&assignment).await?;
    info!(
        assignment_id = stored.id,
        asset = %stored.asset_name,
        personnel = %stored.personnel,
        base = %stored.base_name,
        "Assignment recorded"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

#[cfg(test)]
#[path = "ledger_routes_tests.rs"]
mod tests;
