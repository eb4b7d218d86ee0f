//! JWT claims structure for ledger session credentials.

use serde::{Deserialize, Serialize};

use quartermaster_core::{Principal, Role};

/// JWT claims embedded in session credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID (unique per token).
    pub jti: String,
    /// Subject (principal ID).
    pub sub: String,
    /// Username.
    pub username: String,
    /// Role at issuance time.
    pub role: Role,
    /// Assigned base at issuance time.
    #[serde(default)]
    pub assigned_base: Option<String>,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn for_principal(principal: &Principal, iat: i64, exp: i64) -> Self {
        Self {
            jti: uuid::Uuid::new_v4().to_string(),
            sub: principal.id.clone(),
            username: principal.username.clone(),
            role: principal.role,
            assigned_base: principal.assigned_base.clone(),
            iat,
            exp,
        }
    }
}
