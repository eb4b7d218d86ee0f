//! `Quartermaster` Core Library
//!
//! Domain logic shared by the ledger service:
//! - Roles and the authorization predicates that gate writes
//! - Ledger record types and payload validation
//! - Read-time visibility filtering
//! - Balance reconciliation across the event logs
//! - Configuration resolution, tracing setup, `SQLite` helpers

pub mod access;
pub mod config;
pub mod db;
pub mod error;
pub mod reconcile;
pub mod records;
pub mod role;
pub mod tracing_init;
pub mod visibility;

pub use access::{Principal, authorize_base_scope, authorize_role};
pub use config::Config;
pub use error::{Error, Result};
pub use reconcile::{AssetBalance, BalancePerspective, LedgerSnapshot, Movement, reconcile};
pub use role::Role;
pub use visibility::{RecordKind, Scoped, filter_visible};
