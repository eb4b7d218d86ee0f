//! Repository interfaces, one per entity kind.
//!
//! Services and handlers are generic over these traits; `LedgerDatabase`
//! is the production implementation.

use std::future::Future;

use quartermaster_core::records::{
    Asset, Assignment, NewAsset, NewAssignment, NewPurchase, NewTransfer, Purchase, Transfer,
};

use super::DatabaseError;
use super::models::{NewUserParams, UserRecord};

pub trait PrincipalRepository: Send + Sync {
    /// Insert a principal. A taken username yields `DatabaseError::Conflict`.
    fn create_user(
        &self,
        params: &NewUserParams<'_>,
    ) -> impl Future<Output = Result<UserRecord, DatabaseError>> + Send;

    fn get_user(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, DatabaseError>> + Send;

    /// Exact, case-sensitive lookup.
    fn get_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, DatabaseError>> + Send;
}

pub trait AssetRepository: Send + Sync {
    fn insert_asset(
        &self,
        asset: &NewAsset,
    ) -> impl Future<Output = Result<Asset, DatabaseError>> + Send;

    fn list_assets(&self) -> impl Future<Output = Result<Vec<Asset>, DatabaseError>> + Send;

    fn count_assets(&self) -> impl Future<Output = Result<i64, DatabaseError>> + Send;
}

pub trait PurchaseRepository: Send + Sync {
    fn insert_purchase(
        &self,
        purchase: &NewPurchase,
    ) -> impl Future<Output = Result<Purchase, DatabaseError>> + Send;

    fn list_purchases(&self) -> impl Future<Output = Result<Vec<Purchase>, DatabaseError>> + Send;
}

pub trait TransferRepository: Send + Sync {
    fn insert_transfer(
        &self,
        transfer: &NewTransfer,
    ) -> impl Future<Output = Result<Transfer, DatabaseError>> + Send;

    fn list_transfers(&self) -> impl Future<Output = Result<Vec<Transfer>, DatabaseError>> + Send;
}

pub trait AssignmentRepository: Send + Sync {
    fn insert_assignment(
        &self,
        assignment: &NewAssignment,
    ) -> impl Future<Output = Result<Assignment, DatabaseError>> + Send;

    fn list_assignments(
        &self,
    ) -> impl Future<Output = Result<Vec<Assignment>, DatabaseError>> + Send;
}

/// Everything the HTTP layer needs from storage.
pub trait LedgerStore:
    PrincipalRepository
    + AssetRepository
    + PurchaseRepository
    + TransferRepository
    + AssignmentRepository
    + Clone
    + 'static
{
}

impl<T> LedgerStore for T where
    T: PrincipalRepository
        + AssetRepository
        + PurchaseRepository
        + TransferRepository
        + AssignmentRepository
        + Clone
        + 'static
{
}
