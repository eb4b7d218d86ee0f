//! Demo data loaded by `--seed`.
//!
//! Principals are created only when their username is free. The catalog and
//! the sample events are loaded only into an empty catalog, so re-running
//! the seed against an existing database changes nothing.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use quartermaster_core::Role;
use quartermaster_core::records::{NewAsset, NewAssignment, NewPurchase, NewTransfer};

use crate::auth::{AuthError, IdentityService, Registration};
use crate::storage::{DatabaseError, LedgerStore};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// What a seed run actually inserted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub principals_created: usize,
    pub catalog_seeded: bool,
}

const DEFAULT_PRINCIPALS: &[(&str, &str, Role, &str)] = &[
    ("boss", "admin123", Role::Admin, "Alpha Base"),
    ("commander1", "commander123", Role::BaseCommander, "Bravo Base"),
    ("logistics1", "logistics123", Role::LogisticsOfficer, "Charlie Base"),
];

/// (name, type, opening, closing, assigned, expended)
const SAMPLE_ASSETS: &[(&str, &str, i64, i64, i64, i64)] = &[
    ("Jeep", "Vehicle", 100, 85, 10, 5),
    ("Tank", "Vehicle", 20, 18, 1, 1),
    ("Truck", "Vehicle", 50, 45, 3, 2),
    ("Rifle", "Weapon", 200, 180, 15, 5),
    ("Pistol", "Weapon", 150, 140, 7, 3),
    ("9mm Rounds", "Ammunition", 1000, 800, 150, 50),
    ("Grenades", "Ammunition", 100, 90, 5, 5),
];

const SAMPLE_PURCHASES: &[(&str, &str, i64, &str)] = &[
    ("Jeep", "Vehicle", 10, "Alpha Base"),
    ("Rifle", "Weapon", 20, "Bravo Base"),
    ("9mm Rounds", "Ammunition", 1000, "Charlie Base"),
];

const SAMPLE_TRANSFERS: &[(&str, i64, &str, &str)] = &[
    ("Jeep", 2, "Alpha Base", "Bravo Base"),
    ("Rifle", 5, "Bravo Base", "Charlie Base"),
];

/// (asset, personnel, assigned, expended, base)
const SAMPLE_ASSIGNMENTS: &[(&str, &str, i64, i64, &str)] = &[
    ("Jeep", "Squad A", 2, 0, "Alpha Base"),
    ("Rifle", "Squad B", 10, 2, "Bravo Base"),
];

pub async fn seed_defaults<S: LedgerStore>(
    store: &S,
    identity: &IdentityService<S>,
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    for &(username, password, role, base) in DEFAULT_PRINCIPALS {
        let registration = Registration {
            username: username.to_string(),
            password: password.to_string(),
            role,
            assigned_base: Some(base.to_string()),
        };
        match identity.provision(registration).await {
            Ok(principal) => {
                warn!(username = %principal.username, "Seeded principal with default password");
                report.principals_created += 1;
            }
            Err(AuthError::DuplicateUsername) => {
                info!(username, "Principal exists, not seeding");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if store.count_assets().await? > 0 {
        info!("Catalog not empty, skipping sample ledger data");
        return Ok(report);
    }

    seed_ledger(store, Utc::now().date_naive()).await?;
    report.catalog_seeded = true;
    info!(
        assets = SAMPLE_ASSETS.len(),
        purchases = SAMPLE_PURCHASES.len(),
        transfers = SAMPLE_TRANSFERS.len(),
        assignments = SAMPLE_ASSIGNMENTS.len(),
        "Sample ledger data seeded"
    );
    Ok(report)
}

async fn seed_ledger<S: LedgerStore>(store: &S, today: NaiveDate) -> Result<(), DatabaseError> {
    for &(name, asset_type, opening, closing, assigned, expended) in SAMPLE_ASSETS {
        store
            .insert_asset(&NewAsset {
                name: name.to_string(),
                asset_type: asset_type.to_string(),
                opening_balance: opening,
                closing_balance: closing,
                assigned,
                expended,
            })
            .await?;
    }

    for &(name, asset_type, quantity, base) in SAMPLE_PURCHASES {
        store
            .insert_purchase(&NewPurchase {
                name: name.to_string(),
                asset_type: asset_type.to_string(),
                quantity,
                base_name: base.to_string(),
                date: today,
            })
            .await?;
    }

    for &(asset, quantity, from, to) in SAMPLE_TRANSFERS {
        store
            .insert_transfer(&NewTransfer {
                asset_name: asset.to_string(),
                quantity,
                source_base: from.to_string(),
                destination_base: to.to_string(),
            })
            .await?;
    }

    for &(asset, personnel, assigned, expended, base) in SAMPLE_ASSIGNMENTS {
        store
            .insert_assignment(&NewAssignment {
                asset_name: asset.to_string(),
                personnel: personnel.to_string(),
                assigned_quantity: assigned,
                expended_quantity: expended,
                base_name: base.to_string(),
            })
            .await?;
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::JwtManager;
    use crate::storage::{
        AssetRepository, AssignmentRepository, LedgerDatabase, PrincipalRepository,
        PurchaseRepository, TransferRepository,
    };

    #[tokio::test]
    async fn seed_is_idempotent() {
        let db = LedgerDatabase::open_in_memory().await.unwrap();
        let identity = IdentityService::new(db.clone(), Arc::new(JwtManager::new(b"k", 60)));

        let first = seed_defaults(&db, &identity).await.unwrap();
        assert_eq!(
            first,
            SeedReport {
                principals_created: 3,
                catalog_seeded: true
            }
        );
        assert_eq!(db.count_assets().await.unwrap(), 7);
        assert_eq!(db.list_purchases().await.unwrap().len(), 3);
        assert_eq!(db.list_transfers().await.unwrap().len(), 2);
        assert_eq!(db.list_assignments().await.unwrap().len(), 2);

        let second = seed_defaults(&db, &identity).await.unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(db.count_assets().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn seeded_commander_is_confined_to_bravo() {
        let db = LedgerDatabase::open_in_memory().await.unwrap();
        let identity = IdentityService::new(db.clone(), Arc::new(JwtManager::new(b"k", 60)));
        seed_defaults(&db, &identity).await.unwrap();

        let commander = db
            .get_user_by_username("commander1")
            .await
            .unwrap()
            .unwrap()
            .to_principal()
            .unwrap();
        assert_eq!(commander.role, Role::BaseCommander);
        assert_eq!(commander.assigned_base.as_deref(), Some("Bravo Base"));
    }
}
