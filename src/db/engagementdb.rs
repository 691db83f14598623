use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::engagementmodel::{Lead, LeadStatus, LeadTemperature, Review};

const REVIEW_COLUMNS: &str = r#"
    id, booking_id, customer_id, cleaner_id, rating, comment,
    would_recommend, is_public, is_verified, created_at
"#;

const LEAD_COLUMNS: &str = r#"
    id, name, email, phone, source, status, temperature, notes, created_at
"#;

#[async_trait]
pub trait EngagementExt {
    async fn save_review(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        cleaner_id: Option<Uuid>,
        rating: i32,
        comment: Option<String>,
        would_recommend: Option<bool>,
    ) -> Result<Review, sqlx::Error>;

    async fn get_reviews_for_cleaner(
        &self,
        cleaner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error>;

    async fn get_public_reviews(&self, limit: i64, offset: i64)
        -> Result<Vec<Review>, sqlx::Error>;

    async fn save_lead(
        &self,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        source: Option<String>,
        temperature: Option<LeadTemperature>,
        notes: Option<String>,
    ) -> Result<Lead, sqlx::Error>;

    async fn get_leads(
        &self,
        status: Option<LeadStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, sqlx::Error>;

    async fn update_lead_status(
        &self,
        lead_id: Uuid,
        status: LeadStatus,
    ) -> Result<Option<Lead>, sqlx::Error>;
}

#[async_trait]
impl EngagementExt for DBClient {
    async fn save_review(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        cleaner_id: Option<Uuid>,
        rating: i32,
        comment: Option<String>,
        would_recommend: Option<bool>,
    ) -> Result<Review, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO customer_reviews
                (booking_id, customer_id, cleaner_id, rating, comment, would_recommend)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(customer_id)
        .bind(cleaner_id)
        .bind(rating)
        .bind(comment)
        .bind(would_recommend)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_reviews_for_cleaner(
        &self,
        cleaner_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM customer_reviews
            WHERE cleaner_id = $1
            ORDER BY created_at DESC LIMIT $2 OFFSET $3
            "#
        ))
        .bind(cleaner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_public_reviews(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {REVIEW_COLUMNS}
            FROM customer_reviews
            WHERE is_public = TRUE
            ORDER BY created_at DESC LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_lead(
        &self,
        name: Option<String>,
        email: Option<String>,
        phone: Option<String>,
        source: Option<String>,
        temperature: Option<LeadTemperature>,
        notes: Option<String>,
    ) -> Result<Lead, sqlx::Error> {
        sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (name, email, phone, source, status, temperature, notes)
            VALUES ($1, $2, $3, $4, 'new'::lead_status, $5, $6)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(source)
        .bind(temperature)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_leads(
        &self,
        status: Option<LeadStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        sqlx::query_as::<_, Lead>(&format!(
            r#"
            SELECT {LEAD_COLUMNS}
            FROM leads
            WHERE ($1::lead_status IS NULL OR status = $1)
            ORDER BY created_at DESC LIMIT $2 OFFSET $3
            "#
        ))
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_lead_status(
        &self,
        lead_id: Uuid,
        status: LeadStatus,
    ) -> Result<Option<Lead>, sqlx::Error> {
        sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads
            SET status = $2
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(lead_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }
}
