//! Quartermaster Ledger Server Library
//!
//! Core functionality for the ledger service:
//! - SQLite storage for principals and the four ledger collections
//! - JWT session credentials and password hashing
//! - HTTP API with role and base-scope enforcement
//! - Demo data seeding

pub mod auth;
pub mod seed;
pub mod server;
pub mod storage;
