//! `GET /api/dashboard`: per-asset balances over the caller's visible data.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use tracing::{debug, warn};

use quartermaster_core::{
    AssetBalance, BalancePerspective, LedgerSnapshot, Principal, authorize_base_scope,
    filter_visible, reconcile,
};

use super::error::ApiError;
use super::state::AppState;
use crate::storage::LedgerStore;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Only assets of this type.
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    /// Count movements relative to this base instead of globally.
    pub base: Option<String>,
}

impl DashboardQuery {
    fn perspective(&self) -> BalancePerspective {
        self.base
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map_or(BalancePerspective::Global, |b| {
                BalancePerspective::Base(b.to_string())
            })
    }
}

pub async fn dashboard<S: LedgerStore>(
    State(state): State<AppState<S>>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<Vec<AssetBalance>>, ApiError> {
    let Query(query) = query?;
    let perspective = query.perspective();

    if let BalancePerspective::Base(base) = &perspective
        && !authorize_base_scope(&principal, base)
    {
        warn!(user_id = %principal.id, base = %base, "Dashboard requested for foreign base");
        return Err(ApiError::Forbidden);
    }

    let store = &state.store;
    let (assets, purchases, transfers, assignments) = tokio::try_join!(
        store.list_assets(),
        store.list_purchases(),
        store.list_transfers(),
        store.list_assignments(),
    )?;

    let mut assets = filter_visible(&principal, assets);
    if let Some(wanted) = query.asset_type.as_deref().filter(|t| !t.is_empty()) {
        assets.retain(|a| a.asset_type == wanted);
    }
    let purchases = filter_visible(&principal, purchases);
    let transfers = filter_visible(&principal, transfers);
    let assignments = filter_visible(&principal, assignments);

    let snapshot = LedgerSnapshot {
        assets: &assets,
        purchases: &purchases,
        transfers: &transfers,
        assignments: &assignments,
    };
    let balances = reconcile(&snapshot, &perspective);
    debug!(assets = balances.len(), ?perspective, "Dashboard computed");

    Ok(Json(balances))
}
