//! SQLite storage for the Quartermaster ledger.
//!
//! Provides persistence for principals and the four append-only ledger
//! collections. Handlers reach storage only through the repository traits.

mod db;
mod models;
mod queries;
mod queries_ledger;
mod repository;


pub use db::LedgerDatabase;
pub use models::*;
pub use quartermaster_core::db::DatabaseError;
pub use repository::{
    AssetRepository, AssignmentRepository, LedgerStore, PrincipalRepository, PurchaseRepository,
    TransferRepository,
};
