//! Principal roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Closed set of roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full read/write access across every base.
    Admin,
    /// Scoped to a single assigned base.
    BaseCommander,
    /// Read everything, record purchases and transfers anywhere.
    LogisticsOfficer,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::Admin, Self::BaseCommander, Self::LogisticsOfficer];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::BaseCommander => "base_commander",
            Self::LogisticsOfficer => "logistics_officer",
        }
    }

    /// Whether this role is confined to its assigned base.
    pub const fn is_base_scoped(self) -> bool {
        matches!(self, Self::BaseCommander)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_wire_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn rejects_unknown_and_differently_cased_names() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::LogisticsOfficer).unwrap();
        assert_eq!(json, "\"logistics_officer\"");
        let role: Role = serde_json::from_str("\"base_commander\"").unwrap();
        assert_eq!(role, Role::BaseCommander);
    }

    #[test]
    fn only_commanders_are_base_scoped() {
        assert!(Role::BaseCommander.is_base_scoped());
        assert!(!Role::Admin.is_base_scoped());
        assert!(!Role::LogisticsOfficer.is_base_scoped());
    }
}
