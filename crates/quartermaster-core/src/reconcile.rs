//! Balance reconciliation.
//!
//! Derives per-asset movement totals from the purchase, transfer and
//! assignment logs at read time. Nothing here is persisted; the same inputs
//! always produce the same output.
//!
//! Events are grouped by asset name in a single pass per log, then joined
//! onto the catalog. Event names with no catalog entry are ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::records::{Asset, Assignment, Purchase, Transfer};

/// Vantage point for counting transfer direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "base", rename_all = "snake_case")]
pub enum BalancePerspective {
    /// Every transfer naming an asset counts as both inbound and outbound.
    #[default]
    Global,
    /// Movements relative to one base: transfers arriving there are
    /// inbound, transfers leaving it are outbound, and only purchases and
    /// assignments recorded there are counted.
    Base(String),
}

/// Derived movement totals for one asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub purchases: i64,
    pub transfer_in: i64,
    pub transfer_out: i64,
    pub assigned: i64,
    pub expended: i64,
    pub net_movement: i64,
}

/// A catalog row enriched with its derived movement.
///
/// Serializes as one flat object: the catalog fields followed by the
/// movement totals. The derived `assigned` and `expended` replace the
/// catalog's snapshot values of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetBalance {
    pub asset: Asset,
    pub movement: Movement,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatBalance<'a> {
    id: i64,
    name: &'a str,
    #[serde(rename = "type")]
    asset_type: &'a str,
    opening_balance: i64,
    closing_balance: i64,
    created_at: i64,
    #[serde(flatten)]
    movement: &'a Movement,
}

impl Serialize for AssetBalance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FlatBalance {
            id: self.asset.id,
            name: &self.asset.name,
            asset_type: &self.asset.asset_type,
            opening_balance: self.asset.opening_balance,
            closing_balance: self.asset.closing_balance,
            created_at: self.asset.created_at,
            movement: &self.movement,
        }
        .serialize(serializer)
    }
}

/// Borrowed view over the four collections.
#[derive(Debug, Clone, Copy)]
pub struct LedgerSnapshot<'a> {
    pub assets: &'a [Asset],
    pub purchases: &'a [Purchase],
    pub transfers: &'a [Transfer],
    pub assignments: &'a [Assignment],
}

/// Compute one [`AssetBalance`] per asset, in catalog order.
pub fn reconcile(
    snapshot: &LedgerSnapshot<'_>,
    perspective: &BalancePerspective,
) -> Vec<AssetBalance> {
    let base = match perspective {
        BalancePerspective::Global => None,
        BalancePerspective::Base(b) => Some(b.as_str()),
    };
    let at_base = |b: &str| base.is_none_or(|want| want == b);

    let mut totals: HashMap<&str, Movement> = HashMap::new();

    for p in snapshot.purchases.iter().filter(|p| at_base(p.base_name.as_str())) {
        let m = totals.entry(p.name.as_str()).or_default();
        m.purchases = m.purchases.saturating_add(p.quantity);
    }

    for t in snapshot.transfers {
        let (inbound, outbound) = match base {
            None => (true, true),
            Some(b) => (t.destination_base == b, t.source_base == b),
        };
        if !inbound && !outbound {
            continue;
        }
        let m = totals.entry(t.asset_name.as_str()).or_default();
        if inbound {
            m.transfer_in = m.transfer_in.saturating_add(t.quantity);
        }
        if outbound {
            m.transfer_out = m.transfer_out.saturating_add(t.quantity);
        }
    }

    for a in snapshot.assignments.iter().filter(|a| at_base(a.base_name.as_str())) {
        let m = totals.entry(a.asset_name.as_str()).or_default();
        m.assigned = m.assigned.saturating_add(a.assigned_quantity);
        m.expended = m.expended.saturating_add(a.expended_quantity);
    }

    snapshot
        .assets
        .iter()
        .map(|asset| {
            let mut movement = totals.get(asset.name.as_str()).copied().unwrap_or_default();
            movement.net_movement = movement
                .purchases
                .saturating_add(movement.transfer_in)
                .saturating_sub(movement.transfer_out);
            AssetBalance {
                asset: asset.clone(),
                movement,
            }
        })
        .collect()
}
