//! PostgreSQL implementation of CreatorApplicationRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::creator_application::CreatorApplication;
use crate::domain::foundation::{
    ApplicationId, DomainError, ErrorCode, Timestamp, UserId,
};
use crate::ports::CreatorApplicationRepository;

use super::errors::{database_error, invalid_column};
use super::rows::parse_user_id;

pub struct PostgresCreatorApplicationRepository {
    pool: PgPool,
}

impl PostgresCreatorApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CreatorApplicationRow {
    id: Uuid,
    user_id: String,
    status: String,
    submitted_at: DateTime<Utc>,
    reviewed_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
}

impl TryFrom<CreatorApplicationRow> for CreatorApplication {
    type Error = DomainError;

    fn try_from(row: CreatorApplicationRow) -> Result<Self, Self::Error> {
        Ok(CreatorApplication {
            id: ApplicationId::from_uuid(row.id),
            user_id: parse_user_id("user_id", row.user_id)?,
            status: row
                .status
                .parse()
                .map_err(|_| invalid_column("status", &row.status))?,
            submitted_at: Timestamp::from_datetime(row.submitted_at),
            reviewed_at: row.reviewed_at.map(Timestamp::from_datetime),
            rejection_reason: row.rejection_reason,
        })
    }
}

const COLUMNS: &str = "id, user_id, status, submitted_at, reviewed_at, rejection_reason";

#[async_trait]
impl CreatorApplicationRepository for PostgresCreatorApplicationRepository {
    async fn save(&self, application: &CreatorApplication) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO creator_applications (
                id, user_id, status, submitted_at, reviewed_at, rejection_reason
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(application.id.as_uuid())
        .bind(application.user_id.as_str())
        .bind(application.status.as_str())
        .bind(application.submitted_at.as_datetime())
        .bind(application.reviewed_at.map(|t| *t.as_datetime()))
        .bind(&application.rejection_reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("creator_applications_one_pending_idx") {
                    return DomainError::new(
                        ErrorCode::ApplicationPending,
                        "User already has a pending application",
                    );
                }
            }
            database_error("Failed to save creator application", e)
        })?;

        Ok(())
    }

    async fn update(&self, application: &CreatorApplication) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE creator_applications SET
                status = $2,
                reviewed_at = $3,
                rejection_reason = $4
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(application.id.as_uuid())
        .bind(application.status.as_str())
        .bind(application.reviewed_at.map(|t| *t.as_datetime()))
        .bind(&application.rejection_reason)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to update creator application", e))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM creator_applications WHERE id = $1)")
                .bind(application.id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| database_error("Failed to check creator application", e))?;

        Err(if exists {
            DomainError::new(
                ErrorCode::ApplicationAlreadyReviewed,
                format!("Creator application {} has already been reviewed", application.id),
            )
        } else {
            DomainError::new(
                ErrorCode::ApplicationNotFound,
                format!("Creator application not found: {}", application.id),
            )
        })
    }

    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> Result<Option<CreatorApplication>, DomainError> {
        let row: Option<CreatorApplicationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM creator_applications WHERE id = $1",
            COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to fetch creator application", e))?;

        row.map(CreatorApplication::try_from).transpose()
    }

    async fn find_pending_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<CreatorApplication>, DomainError> {
        let row: Option<CreatorApplicationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM creator_applications WHERE user_id = $1 AND status = 'pending'",
            COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to fetch pending application", e))?;

        row.map(CreatorApplication::try_from).transpose()
    }

    async fn rejection_history(&self, user_id: &UserId) -> Result<Vec<Timestamp>, DomainError> {
        let rows: Vec<DateTime<Utc>> = sqlx::query_scalar(
            r#"
            SELECT reviewed_at FROM creator_applications
            WHERE user_id = $1 AND status = 'rejected' AND reviewed_at IS NOT NULL
            ORDER BY reviewed_at ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("Failed to load rejection history", e))?;

        Ok(rows.into_iter().map(Timestamp::from_datetime).collect())
    }
}
