use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::customermodel::{Customer, CustomerProfile};

const CUSTOMER_COLUMNS: &str = r#"
    id, first_name, last_name, email, phone, address, apt_unit, city,
    state, zip_code, source, lifetime_value, membership_tier,
    created_at, updated_at
"#;

#[async_trait]
pub trait CustomerExt {
    /// Same upsert-by-email the booking intake runs, standalone. Email wins:
    /// an existing customer keeps their id and gets the profile refreshed.
    async fn upsert_customer(&self, profile: CustomerProfile)
        -> Result<Customer, sqlx::Error>;

    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, sqlx::Error>;

    async fn get_customers(&self, limit: i64, offset: i64)
        -> Result<Vec<Customer>, sqlx::Error>;
}

#[async_trait]
impl CustomerExt for DBClient {
    async fn upsert_customer(
        &self,
        profile: CustomerProfile,
    ) -> Result<Customer, sqlx::Error> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers
                (first_name, last_name, email, phone, address, apt_unit,
                 city, state, zip_code, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'website'))
            ON CONFLICT (email) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = COALESCE(EXCLUDED.phone, customers.phone),
                address = COALESCE(EXCLUDED.address, customers.address),
                apt_unit = COALESCE(EXCLUDED.apt_unit, customers.apt_unit),
                city = COALESCE(EXCLUDED.city, customers.city),
                state = COALESCE(EXCLUDED.state, customers.state),
                zip_code = COALESCE(EXCLUDED.zip_code, customers.zip_code),
                updated_at = NOW()
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.apt_unit)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.zip_code)
        .bind(&profile.source)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE id = $1
            "#
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_customers(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            ORDER BY created_at DESC LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn profile(email: &str, phone: Option<&str>) -> CustomerProfile {
        CustomerProfile {
            first_name: "Ada".to_string(),
            last_name: "Eze".to_string(),
            email: email.to_string(),
            phone: phone.map(String::from),
            address: None,
            apt_unit: None,
            city: None,
            state: None,
            zip_code: None,
            source: None,
        }
    }

    #[sqlx::test]
    async fn upsert_by_email_reuses_the_existing_row(pool: PgPool) {
        let db = DBClient::new(pool.clone());

        let first = db
            .upsert_customer(profile("ada@eze.test", Some("0801")))
            .await
            .unwrap();

        let mut again = profile("ada@eze.test", None);
        again.first_name = "Adaeze".to_string();
        let second = db.upsert_customer(again).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.first_name, "Adaeze");
        // A null incoming phone keeps the stored one.
        assert_eq!(second.phone.as_deref(), Some("0801"));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
