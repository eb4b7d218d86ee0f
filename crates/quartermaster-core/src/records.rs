//! Ledger record types.
//!
//! Four independent, insert-only collections. Records correlate by asset
//! name only; nothing here enforces that an event names a catalogued asset.
//!
//! Each collection has three shapes: the stored record, a validated `New*`
//! value ready for insertion, and a `*Draft` that mirrors the request body
//! with every field optional so that missing fields surface as validation
//! errors instead of deserialization failures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Catalog row with snapshot balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub opening_balance: i64,
    pub closing_balance: i64,
    pub assigned: i64,
    pub expended: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub quantity: i64,
    pub base_name: String,
    pub date: NaiveDate,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: i64,
    pub asset_name: String,
    pub quantity: i64,
    pub source_base: String,
    pub destination_base: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub asset_name: String,
    pub personnel: String,
    pub assigned_quantity: i64,
    pub expended_quantity: i64,
    pub base_name: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAsset {
    pub name: String,
    pub asset_type: String,
    pub opening_balance: i64,
    pub closing_balance: i64,
    pub assigned: i64,
    pub expended: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
    pub name: String,
    pub asset_type: String,
    pub quantity: i64,
    pub base_name: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransfer {
    pub asset_name: String,
    pub quantity: i64,
    pub source_base: String,
    pub destination_base: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    pub asset_name: String,
    pub personnel: String,
    pub assigned_quantity: i64,
    pub expended_quantity: i64,
    pub base_name: String,
}

/// A count as it arrives in a request body: a JSON integer or a numeric
/// string such as `"5"`. Parsing is deferred to validation so a
/// non-numeric string is a field error, not a body rejection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Int(i64),
    Text(String),
}

impl From<i64> for Quantity {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl Quantity {
    /// `Ok(None)` for a blank string.
    fn parse(&self, field: &str) -> Result<Option<i64>> {
        match self {
            Self::Int(n) => Ok(Some(*n)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| Error::Validation(format!("{field} must be a whole number"))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDraft {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub opening_balance: Option<Quantity>,
    pub closing_balance: Option<Quantity>,
    pub assigned: Option<Quantity>,
    pub expended: Option<Quantity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDraft {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub quantity: Option<Quantity>,
    pub base_name: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDraft {
    pub asset_name: Option<String>,
    pub quantity: Option<Quantity>,
    pub source_base: Option<String>,
    pub destination_base: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDraft {
    pub asset_name: Option<String>,
    pub personnel: Option<String>,
    pub assigned_quantity: Option<Quantity>,
    pub expended_quantity: Option<Quantity>,
    pub base_name: Option<String>,
}

impl TryFrom<AssetDraft> for NewAsset {
    type Error = Error;

    fn try_from(draft: AssetDraft) -> Result<Self> {
        Ok(Self {
            name: required_text(draft.name, "name")?,
            asset_type: required_text(draft.asset_type, "type")?,
            opening_balance: count_or_zero(draft.opening_balance, "openingBalance")?,
            closing_balance: count_or_zero(draft.closing_balance, "closingBalance")?,
            assigned: count_or_zero(draft.assigned, "assigned")?,
            expended: count_or_zero(draft.expended, "expended")?,
        })
    }
}

impl TryFrom<PurchaseDraft> for NewPurchase {
    type Error = Error;

    fn try_from(draft: PurchaseDraft) -> Result<Self> {
        Ok(Self {
            name: required_text(draft.name, "name")?,
            asset_type: required_text(draft.asset_type, "type")?,
            quantity: positive(draft.quantity, "quantity")?,
            base_name: required_text(draft.base_name, "baseName")?,
            date: draft.date.ok_or_else(|| Error::missing("date"))?,
        })
    }
}

impl TryFrom<TransferDraft> for NewTransfer {
    type Error = Error;

    fn try_from(draft: TransferDraft) -> Result<Self> {
        let transfer = Self {
            asset_name: required_text(draft.asset_name, "assetName")?,
            quantity: positive(draft.quantity, "quantity")?,
            source_base: required_text(draft.source_base, "sourceBase")?,
            destination_base: required_text(draft.destination_base, "destinationBase")?,
        };
        if transfer.source_base == transfer.destination_base {
            return Err(Error::Validation(
                "Source and destination bases must differ".to_string(),
            ));
        }
        Ok(transfer)
    }
}

impl TryFrom<AssignmentDraft> for NewAssignment {
    type Error = Error;

    fn try_from(draft: AssignmentDraft) -> Result<Self> {
        let expended_quantity = count_or_zero(draft.expended_quantity, "expendedQuantity")?;
        Ok(Self {
            asset_name: required_text(draft.asset_name, "assetName")?,
            personnel: required_text(draft.personnel, "personnel")?,
            assigned_quantity: positive(draft.assigned_quantity, "assignedQuantity")?,
            expended_quantity,
            base_name: required_text(draft.base_name, "baseName")?,
        })
    }
}

/// Base identifiers a write targets, for base-scope authorization.
pub trait BaseTargets {
    fn target_bases(&self) -> Vec<&str>;
}

impl BaseTargets for NewPurchase {
    fn target_bases(&self) -> Vec<&str> {
        vec![&self.base_name]
    }
}

impl BaseTargets for NewTransfer {
    fn target_bases(&self) -> Vec<&str> {
        vec![&self.source_base, &self.destination_base]
    }
}

impl BaseTargets for NewAssignment {
    fn target_bases(&self) -> Vec<&str> {
        vec![&self.base_name]
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(Error::missing(field)),
    }
}

fn integer(value: Option<Quantity>, field: &str) -> Result<Option<i64>> {
    value.map_or(Ok(None), |q| q.parse(field))
}

fn positive(value: Option<Quantity>, field: &str) -> Result<i64> {
    match integer(value, field)? {
        Some(n) if n > 0 => Ok(n),
        Some(_) => Err(Error::Validation(format!("{field} must be positive"))),
        None => Err(Error::missing(field)),
    }
}

/// Optional non-negative count, absent means zero.
fn count_or_zero(value: Option<Quantity>, field: &str) -> Result<i64> {
    match integer(value, field)? {
        Some(n) if n < 0 => Err(Error::Validation(format!("{field} must not be negative"))),
        Some(n) => Ok(n),
        None => Ok(0),
    }
}
