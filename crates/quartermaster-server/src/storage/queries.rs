//! Principal queries.

use quartermaster_core::db::unix_timestamp;

use super::DatabaseError;
use super::db::LedgerDatabase;
use super::models::{NewUserParams, UserRecord};
use super::repository::PrincipalRepository;

impl PrincipalRepository for LedgerDatabase {
    async fn create_user(&self, params: &NewUserParams<'_>) -> Result<UserRecord, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO users (id, username, password_hash, role, assigned_base, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(params.id)
        .bind(params.username)
        .bind(params.password_hash)
        .bind(params.role.as_str())
        .bind(params.assigned_base)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_user(params.id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {}", params.id)))
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let user = sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }
}
