//! PostgreSQL implementation of AccountDirectory.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::account::AccountKind;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::AccountDirectory;

use super::errors::{database_error, invalid_column};

pub struct PostgresAccountDirectory {
    pool: PgPool,
}

impl PostgresAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountDirectory for PostgresAccountDirectory {
    async fn account_kind(&self, user_id: &UserId) -> Result<Option<AccountKind>, DomainError> {
        let kind: Option<String> = sqlx::query_scalar("SELECT kind FROM accounts WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("Failed to fetch account", e))?;

        kind.map(|k| k.parse().map_err(|_| invalid_column("kind", &k)))
            .transpose()
    }

    async fn promote_to_creator(&self, user_id: &UserId) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (user_id, kind, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE SET kind = EXCLUDED.kind, updated_at = NOW()
            "#,
        )
        .bind(user_id.as_str())
        .bind(AccountKind::Creator.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to promote account", e))?;

        Ok(())
    }
}
