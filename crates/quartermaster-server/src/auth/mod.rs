//! Identity & access for the ledger server.
//!
//! Provides JWT credential management, password hashing, and the identity
//! service that ties them to principal storage.

pub mod claims;
pub mod jwt;
pub mod password;
pub mod service;

pub use claims::Claims;
pub use jwt::JwtManager;
pub use service::{AuthError, IdentityService, Registration, RegistrationDraft, Session};
