use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{UserStore, duplicate_username, username_changed};
use crate::error::{Result, StorageError};
use crate::models::{TierCounts, UserRecord};

const USER_COLUMNS: &str = r#"
    user_id, display_name, external_username,
    baseline_easy, baseline_medium, baseline_hard,
    current_easy, current_medium, current_hard,
    last_synced_at, created_at
"#;

#[derive(FromRow)]
struct UserRow {
    user_id: Uuid,
    display_name: String,
    external_username: String,
    baseline_easy: i32,
    baseline_medium: i32,
    baseline_hard: i32,
    current_easy: i32,
    current_medium: i32,
    current_hard: i32,
    last_synced_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.user_id,
            display_name: row.display_name,
            external_username: row.external_username,
            baseline: TierCounts::new(row.baseline_easy, row.baseline_medium, row.baseline_hard),
            current: TierCounts::new(row.current_easy, row.current_medium, row.current_hard),
            last_synced_at: row.last_synced_at,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_write_error(error: StorageError, username: &str) -> StorageError {
        if error.is_unique_violation() {
            duplicate_username(username)
        } else {
            error
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, id: Uuid) -> Result<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM tracked_users WHERE user_id = $1"
        ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM tracked_users ORDER BY created_at, user_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn find_by_external_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM tracked_users WHERE external_username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRecord::from))
    }

    async fn insert(&self, record: &UserRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tracked_users (
                user_id, display_name, external_username,
                baseline_easy, baseline_medium, baseline_hard,
                current_easy, current_medium, current_hard,
                last_synced_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id)
        .bind(&record.display_name)
        .bind(&record.external_username)
        .bind(record.baseline.easy)
        .bind(record.baseline.medium)
        .bind(record.baseline.hard)
        .bind(record.current.easy)
        .bind(record.current.medium)
        .bind(record.current.hard)
        .bind(record.last_synced_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e.into(), &record.external_username))?;

        Ok(())
    }

    async fn update(&self, record: &UserRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tracked_users
            SET display_name = $2,
                external_username = $3,
                baseline_easy = $4,
                baseline_medium = $5,
                baseline_hard = $6,
                current_easy = $7,
                current_medium = $8,
                current_hard = $9,
                last_synced_at = $10
            WHERE user_id = $1
            "#,
        )
        .bind(record.id)
        .bind(&record.display_name)
        .bind(&record.external_username)
        .bind(record.baseline.easy)
        .bind(record.baseline.medium)
        .bind(record.baseline.hard)
        .bind(record.current.easy)
        .bind(record.current.medium)
        .bind(record.current.hard)
        .bind(record.last_synced_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_write_error(e.into(), &record.external_username))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn record_fetch(
        &self,
        id: Uuid,
        expected_username: &str,
        counts: TierCounts,
        fetched_at: DateTime<Utc>,
    ) -> Result<UserRecord> {
        // SET expressions read the old row, so the CASE sees the previous
        // last_synced_at.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE tracked_users
            SET baseline_easy = CASE WHEN last_synced_at IS NULL THEN $3 ELSE baseline_easy END,
                baseline_medium = CASE WHEN last_synced_at IS NULL THEN $4 ELSE baseline_medium END,
                baseline_hard = CASE WHEN last_synced_at IS NULL THEN $5 ELSE baseline_hard END,
                current_easy = $3,
                current_medium = $4,
                current_hard = $5,
                last_synced_at = $6
            WHERE user_id = $1 AND external_username = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected_username)
        .bind(counts.easy)
        .bind(counts.medium)
        .bind(counts.hard)
        .bind(fetched_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => {
                // Tell a renamed record apart from a deleted one
                self.get(id).await?;
                Err(username_changed(expected_username))
            }
        }
    }

    async fn reset_baseline(&self, id: Uuid) -> Result<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE tracked_users
            SET baseline_easy = current_easy,
                baseline_medium = current_medium,
                baseline_hard = current_hard
            WHERE user_id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tracked_users WHERE user_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
