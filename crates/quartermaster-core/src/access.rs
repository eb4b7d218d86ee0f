//! Role and base-scope authorization predicates.
//!
//! These are pure checks. Callers decide what a denial means (usually a
//! 403 at the HTTP boundary).

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// An authenticated actor, as seen by authorization and visibility checks.
///
/// Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub assigned_base: Option<String>,
}

impl Principal {
    /// The base this principal is confined to, if its role is base-scoped.
    ///
    /// Returns `Some(None)` for a scoped principal with no assigned base,
    /// which confines it to nothing.
    pub fn confinement(&self) -> Option<Option<&str>> {
        self.role
            .is_base_scoped()
            .then(|| self.assigned_base.as_deref())
    }
}

/// True when the principal's role is one of `allowed`.
pub fn authorize_role(principal: &Principal, allowed: &[Role]) -> bool {
    allowed.contains(&principal.role)
}

/// True when the principal may act on records belonging to `target_base`.
pub fn authorize_base_scope(principal: &Principal, target_base: &str) -> bool {
    match principal.confinement() {
        None => true,
        Some(Some(base)) => base == target_base,
        Some(None) => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn principal(role: Role, base: Option<&str>) -> Principal {
        Principal {
            id: format!("{role}-id"),
            username: role.to_string(),
            role,
            assigned_base: base.map(str::to_string),
        }
    }

    #[test]
    fn role_guard_matches_membership() {
        let officer = principal(Role::LogisticsOfficer, None);
        assert!(authorize_role(
            &officer,
            &[Role::Admin, Role::LogisticsOfficer]
        ));
        assert!(!authorize_role(&officer, &[Role::Admin]));
        assert!(!authorize_role(&officer, &[]));
    }

    #[test]
    fn admin_and_logistics_pass_any_base() {
        for role in [Role::Admin, Role::LogisticsOfficer] {
            let p = principal(role, Some("Alpha Base"));
            assert!(authorize_base_scope(&p, "Alpha Base"));
            assert!(authorize_base_scope(&p, "Charlie Base"));
        }
    }

    #[test]
    fn commander_only_passes_own_base() {
        let p = principal(Role::BaseCommander, Some("Alpha Base"));
        assert!(authorize_base_scope(&p, "Alpha Base"));
        assert!(!authorize_base_scope(&p, "Charlie Base"));
        assert!(!authorize_base_scope(&p, "alpha base"));
    }

    #[test]
    fn commander_without_base_is_denied_everywhere() {
        let p = principal(Role::BaseCommander, None);
        assert!(!authorize_base_scope(&p, "Alpha Base"));
        assert!(!authorize_base_scope(&p, ""));
    }

    #[test]
    fn summary_serializes_camel_case() {
        let p = principal(Role::BaseCommander, Some("Bravo Base"));
        let json = serde_json::to_value(&p).unwrap_or_default();
        assert_eq!(json["assignedBase"], "Bravo Base");
        assert_eq!(json["role"], "base_commander");
    }
}
