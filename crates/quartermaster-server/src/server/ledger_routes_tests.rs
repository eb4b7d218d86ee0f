#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::NaiveDate;

use super::*;
use crate::auth::JwtManager;
use crate::storage::{
    AssignmentRepository, LedgerDatabase, PurchaseRepository, TransferRepository,
};

async fn state() -> AppState<LedgerDatabase> {
    let db = LedgerDatabase::open_in_memory().await.unwrap();
    AppState::new(db, Arc::new(JwtManager::new(b"test-secret", 3600)))
}

fn principal(role: Role, base: Option<&str>) -> Principal {
    Principal {
        id: format!("{role}-1"),
        username: role.to_string(),
        role,
        assigned_base: base.map(str::to_string),
    }
}

fn purchase_draft(base: &str) -> PurchaseDraft {
    PurchaseDraft {
        name: Some("Jeep".into()),
        asset_type: Some("Vehicle".into()),
        quantity: Some(10.into()),
        base_name: Some(base.into()),
        date: NaiveDate::from_ymd_opt(2025, 6, 30),
    }
}

fn transfer_draft(from: &str, to: &str) -> TransferDraft {
    TransferDraft {
        asset_name: Some("Jeep".into()),
        quantity: Some(2.into()),
        source_base: Some(from.into()),
        destination_base: Some(to.into()),
    }
}

#[tokio::test]
async fn logistics_officer_records_purchase() {
    let state = state().await;
    let officer = principal(Role::LogisticsOfficer, Some("Charlie Base"));

    let (status, Json(stored)) = create_purchase(
        State(state.clone()),
        Extension(officer),
        Ok(Json(purchase_draft("Alpha Base"))),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored.base_name, "Alpha Base");
    assert_eq!(state.store.list_purchases().await.unwrap().len(), 1);
}

#[tokio::test]
async fn commander_cannot_purchase() {
    let state = state().await;
    let commander = principal(Role::BaseCommander, Some("Alpha Base"));

    let err = create_purchase(
        State(state.clone()),
        Extension(commander),
        Ok(Json(purchase_draft("Alpha Base"))),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden));
    assert!(state.store.list_purchases().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_quantity_is_rejected_before_insert() {
    let state = state().await;
    let admin = principal(Role::Admin, None);
    let draft = PurchaseDraft {
        quantity: None,
        ..purchase_draft("Alpha Base")
    };

    let err = create_purchase(State(state.clone()), Extension(admin), Ok(Json(draft)))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(state.store.list_purchases().await.unwrap().is_empty());
}

#[tokio::test]
async fn commander_assignment_outside_base_is_forbidden() {
    let state = state().await;
    let commander = principal(Role::BaseCommander, Some("Alpha Base"));
    let draft = AssignmentDraft {
        asset_name: Some("Rifle".into()),
        personnel: Some("Squad C".into()),
        assigned_quantity: Some(5.into()),
        expended_quantity: None,
        base_name: Some("Charlie Base".into()),
    };

    let err = create_assignment(State(state.clone()), Extension(commander), Ok(Json(draft)))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden));
    assert!(state.store.list_assignments().await.unwrap().is_empty());
}

#[tokio::test]
async fn commander_assignment_at_own_base_succeeds() {
    let state = state().await;
    let commander = principal(Role::BaseCommander, Some("Alpha Base"));
    let draft = AssignmentDraft {
        asset_name: Some("Rifle".into()),
        personnel: Some("Squad C".into()),
        assigned_quantity: Some(5.into()),
        expended_quantity: None,
        base_name: Some("Alpha Base".into()),
    };

    let (status, Json(stored)) =
        create_assignment(State(state), Extension(commander), Ok(Json(draft)))
            .await
            .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored.expended_quantity, 0);
}

#[tokio::test]
async fn same_base_transfer_is_a_validation_error() {
    let state = state().await;
    let admin = principal(Role::Admin, None);

    let err = create_transfer(
        State(state.clone()),
        Extension(admin),
        Ok(Json(transfer_draft("Alpha Base", "Alpha Base"))),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(state.store.list_transfers().await.unwrap().is_empty());
}

#[tokio::test]
async fn only_admin_creates_assets() {
    let state = state().await;
    let draft = AssetDraft {
        name: Some("Tank".into()),
        asset_type: Some("Vehicle".into()),
        ..AssetDraft::default()
    };

    let err = create_asset(
        State(state.clone()),
        Extension(principal(Role::LogisticsOfficer, None)),
        Ok(Json(draft.clone())),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Forbidden));

    let (status, Json(asset)) = create_asset(
        State(state),
        Extension(principal(Role::Admin, None)),
        Ok(Json(draft)),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(asset.opening_balance, 0);
}

#[tokio::test]
async fn transfer_listing_is_filtered_for_commander() {
    let state = state().await;
    let admin = principal(Role::Admin, None);
    for (from, to) in [
        ("Alpha Base", "Bravo Base"),
        ("Alpha Base", "Charlie Base"),
        ("Bravo Base", "Charlie Base"),
    ] {
        let _ = create_transfer(
            State(state.clone()),
            Extension(admin.clone()),
            Ok(Json(transfer_draft(from, to))),
        )
        .await
        .unwrap();
    }

    let Json(visible) = list_transfers(
        State(state.clone()),
        Extension(principal(Role::BaseCommander, Some("Bravo Base"))),
    )
    .await
    .unwrap();
    assert_eq!(visible.len(), 2);
    assert!(
        visible
            .iter()
            .all(|t| t.source_base == "Bravo Base" || t.destination_base == "Bravo Base")
    );

    let Json(all) = list_transfers(State(state), Extension(admin)).await.unwrap();
    assert_eq!(all.len(), 3);
}
