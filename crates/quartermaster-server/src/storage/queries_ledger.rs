//! Ledger collection queries: single-row inserts and full scans.

use quartermaster_core::db::unix_timestamp;
use quartermaster_core::records::{
    Asset, Assignment, NewAsset, NewAssignment, NewPurchase, NewTransfer, Purchase, Transfer,
};

use super::DatabaseError;
use super::db::LedgerDatabase;
use super::repository::{
    AssetRepository, AssignmentRepository, PurchaseRepository, TransferRepository,
};

impl LedgerDatabase {
    async fn fetch_by_rowid<T>(&self, table: &str, id: i64) -> Result<T, DatabaseError>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> + Send + Unpin,
    {
        sqlx::query_as::<_, T>(&format!("SELECT * FROM {table} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{table} row {id}")))
    }
}

impl AssetRepository for LedgerDatabase {
    async fn insert_asset(&self, asset: &NewAsset) -> Result<Asset, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "INSERT INTO assets (name, asset_type, opening_balance, closing_balance, assigned, expended, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&asset.name)
        .bind(&asset.asset_type)
        .bind(asset.opening_balance)
        .bind(asset.closing_balance)
        .bind(asset.assigned)
        .bind(asset.expended)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.fetch_by_rowid("assets", result.last_insert_rowid()).await
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, DatabaseError> {
        let assets = sqlx::query_as::<_, Asset>("SELECT * FROM assets ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(assets)
    }

    async fn count_assets(&self) -> Result<i64, DatabaseError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM assets")
            .fetch_one(self.pool())
            .await?;
        Ok(row.0)
    }
}

impl PurchaseRepository for LedgerDatabase {
    async fn insert_purchase(&self, purchase: &NewPurchase) -> Result<Purchase, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "INSERT INTO purchases (name, asset_type, quantity, base_name, date, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&purchase.name)
        .bind(&purchase.asset_type)
        .bind(purchase.quantity)
        .bind(&purchase.base_name)
        .bind(purchase.date)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.fetch_by_rowid("purchases", result.last_insert_rowid())
            .await
    }

    async fn list_purchases(&self) -> Result<Vec<Purchase>, DatabaseError> {
        let purchases = sqlx::query_as::<_, Purchase>("SELECT * FROM purchases ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(purchases)
    }
}

impl TransferRepository for LedgerDatabase {
    async fn insert_transfer(&self, transfer: &NewTransfer) -> Result<Transfer, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "INSERT INTO transfers (asset_name, quantity, source_base, destination_base, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&transfer.asset_name)
        .bind(transfer.quantity)
        .bind(&transfer.source_base)
        .bind(&transfer.destination_base)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.fetch_by_rowid("transfers", result.last_insert_rowid())
            .await
    }

    async fn list_transfers(&self) -> Result<Vec<Transfer>, DatabaseError> {
        let transfers = sqlx::query_as::<_, Transfer>("SELECT * FROM transfers ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(transfers)
    }
}

impl AssignmentRepository for LedgerDatabase {
    async fn insert_assignment(
        &self,
        assignment: &NewAssignment,
    ) -> Result<Assignment, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query(
            "INSERT INTO assignments (asset_name, personnel, assigned_quantity, expended_quantity, base_name, timestamp) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&assignment.asset_name)
        .bind(&assignment.personnel)
        .bind(assignment.assigned_quantity)
        .bind(assignment.expended_quantity)
        .bind(&assignment.base_name)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.fetch_by_rowid("assignments", result.last_insert_rowid())
            .await
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>, DatabaseError> {
        let assignments = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        Ok(assignments)
    }
}
