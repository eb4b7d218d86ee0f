//! Data models for principal storage.
//!
//! Ledger record types live in `quartermaster_core::records`.

use quartermaster_core::{Principal, Role};

use super::DatabaseError;

/// Stored principal row. Holds the password hash, so it is never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub assigned_base: Option<String>,
    pub created_at: i64,
}

impl UserRecord {
    /// Strip credential material and parse the role.
    pub fn to_principal(&self) -> Result<Principal, DatabaseError> {
        let role: Role = self
            .role
            .parse()
            .map_err(|_| DatabaseError::Corrupt(format!("User {} has role {}", self.id, self.role)))?;
        Ok(Principal {
            id: self.id.clone(),
            username: self.username.clone(),
            role,
            assigned_base: self.assigned_base.clone(),
        })
    }
}

/// Parameters for creating a principal.
pub struct NewUserParams<'a> {
    pub id: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub assigned_base: Option<&'a str>,
}
