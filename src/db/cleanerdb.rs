use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::cleanermodel::Cleaner;

const CLEANER_COLUMNS: &str = r#"
    id, first_name, last_name, email, phone, password, role,
    hourly_rate, commission_rate, is_active, created_at
"#;

#[async_trait]
pub trait CleanerExt {
    async fn get_cleaner(&self, cleaner_id: Uuid) -> Result<Option<Cleaner>, sqlx::Error>;

    async fn get_cleaner_by_email(&self, email: &str)
        -> Result<Option<Cleaner>, sqlx::Error>;

    async fn get_cleaners(
        &self,
        active_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Cleaner>, sqlx::Error>;
}

#[async_trait]
impl CleanerExt for DBClient {
    async fn get_cleaner(&self, cleaner_id: Uuid) -> Result<Option<Cleaner>, sqlx::Error> {
        sqlx::query_as::<_, Cleaner>(&format!(
            r#"
            SELECT {CLEANER_COLUMNS}
            FROM cleaners
            WHERE id = $1
            "#
        ))
        .bind(cleaner_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_cleaner_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Cleaner>, sqlx::Error> {
        sqlx::query_as::<_, Cleaner>(&format!(
            r#"
            SELECT {CLEANER_COLUMNS}
            FROM cleaners
            WHERE email = $1
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_cleaners(
        &self,
        active_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Cleaner>, sqlx::Error> {
        if active_only {
            sqlx::query_as::<_, Cleaner>(&format!(
                r#"
                SELECT {CLEANER_COLUMNS}
                FROM cleaners
                WHERE is_active = TRUE
                ORDER BY created_at DESC LIMIT $1 OFFSET $2
                "#
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, Cleaner>(&format!(
                r#"
                SELECT {CLEANER_COLUMNS}
                FROM cleaners
                ORDER BY created_at DESC LIMIT $1 OFFSET $2
                "#
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        }
    }
}
