//! Read-time visibility filtering.
//!
//! Admins and logistics officers see every record. Base commanders see
//! purchases and assignments recorded at their base, and transfers that
//! leave or enter it. The asset catalog is global.

use crate::access::Principal;
use crate::records::{Asset, Assignment, Purchase, Transfer};

/// Which ledger collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Asset,
    Purchase,
    Transfer,
    Assignment,
}

/// A record whose visibility may depend on a base.
pub trait Scoped {
    const KIND: RecordKind;

    /// Whether a principal confined to `base` may see this record.
    fn visible_from(&self, base: &str) -> bool;
}

impl Scoped for Asset {
    const KIND: RecordKind = RecordKind::Asset;

    fn visible_from(&self, _base: &str) -> bool {
        true
    }
}

impl Scoped for Purchase {
    const KIND: RecordKind = RecordKind::Purchase;

    fn visible_from(&self, base: &str) -> bool {
        self.base_name == base
    }
}

impl Scoped for Transfer {
    const KIND: RecordKind = RecordKind::Transfer;

    fn visible_from(&self, base: &str) -> bool {
        self.source_base == base || self.destination_base == base
    }
}

impl Scoped for Assignment {
    const KIND: RecordKind = RecordKind::Assignment;

    fn visible_from(&self, base: &str) -> bool {
        self.base_name == base
    }
}

/// Keep the records `principal` is allowed to read, preserving order.
pub fn filter_visible<T: Scoped>(principal: &Principal, mut records: Vec<T>) -> Vec<T> {
    if T::KIND == RecordKind::Asset {
        return records;
    }
    match principal.confinement() {
        None => records,
        Some(Some(base)) => {
            records.retain(|r| r.visible_from(base));
            records
        }
        Some(None) => Vec::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::access::tests::principal;
    use crate::role::Role;
    use chrono::NaiveDate;

    fn purchase(id: i64, base: &str) -> Purchase {
        Purchase {
            id,
            name: "Rifle".into(),
            asset_type: "Weapon".into(),
            quantity: 5,
            base_name: base.into(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            created_at: 0,
        }
    }

    fn transfer(id: i64, from: &str, to: &str) -> Transfer {
        Transfer {
            id,
            asset_name: "Jeep".into(),
            quantity: 1,
            source_base: from.into(),
            destination_base: to.into(),
            timestamp: 0,
        }
    }

    fn assignment(id: i64, base: &str) -> Assignment {
        Assignment {
            id,
            asset_name: "Rifle".into(),
            personnel: "Squad A".into(),
            assigned_quantity: 3,
            expended_quantity: 1,
            base_name: base.into(),
            timestamp: 0,
        }
    }

    const BASES: [&str; 4] = ["Alpha Base", "Bravo Base", "Charlie Base", "Delta Base"];

    fn mixed_purchases() -> Vec<Purchase> {
        (0..40_i64)
            .zip(BASES.iter().cycle())
            .map(|(i, base)| purchase(i, base))
            .collect()
    }

    #[test]
    fn commander_sees_only_own_base_purchases() {
        for base in BASES {
            let p = principal(Role::BaseCommander, Some(base));
            let all = mixed_purchases();
            let expected = all.iter().filter(|r| r.base_name == base).count();
            let visible = filter_visible(&p, all);
            assert_eq!(visible.len(), expected);
            assert!(visible.iter().all(|r| r.base_name == base));
        }
    }

    #[test]
    fn global_roles_see_everything_unchanged() {
        for role in [Role::Admin, Role::LogisticsOfficer] {
            let p = principal(role, Some("Alpha Base"));
            let all = mixed_purchases();
            assert_eq!(filter_visible(&p, all.clone()), all);
        }
    }

    #[test]
    fn commander_sees_transfers_in_and_out() {
        let p = principal(Role::BaseCommander, Some("Bravo Base"));
        let transfers = vec![
            transfer(1, "Alpha Base", "Bravo Base"),
            transfer(2, "Alpha Base", "Charlie Base"),
            transfer(3, "Bravo Base", "Charlie Base"),
            transfer(4, "Charlie Base", "Delta Base"),
            transfer(5, "Delta Base", "Alpha Base"),
        ];
        let ids: Vec<i64> = filter_visible(&p, transfers).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn commander_assignments_are_base_filtered() {
        let p = principal(Role::BaseCommander, Some("Alpha Base"));
        let visible = filter_visible(
            &p,
            vec![assignment(1, "Alpha Base"), assignment(2, "Bravo Base")],
        );
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn commander_sees_whole_asset_catalog() {
        let p = principal(Role::BaseCommander, Some("Alpha Base"));
        let assets = vec![Asset {
            id: 1,
            name: "Tank".into(),
            asset_type: "Vehicle".into(),
            opening_balance: 20,
            closing_balance: 18,
            assigned: 1,
            expended: 1,
            created_at: 0,
        }];
        assert_eq!(filter_visible(&p, assets.clone()), assets);
    }

    #[test]
    fn unassigned_commander_sees_no_scoped_records() {
        let p = principal(Role::BaseCommander, None);
        assert!(filter_visible(&p, mixed_purchases()).is_empty());
    }
}
