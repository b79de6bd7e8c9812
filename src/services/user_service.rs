use crate::error::Result;
use crate::models::user::{SubscriptionStatus, User};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, email, created_at, updated_at, stripe_customer_id, \
     subscription_status, subscription_end_date";

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the account on first sight and returns the stored row. An
    /// existing row keeps its subscription fields; only the email is refreshed.
    pub async fn create_user(&self, id: &str, email: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
                SET email = EXCLUDED.email,
                    updated_at = NOW()
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update_subscription(
        &self,
        id: &str,
        customer_id: Option<&str>,
        status: SubscriptionStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET stripe_customer_id = COALESCE($2, stripe_customer_id),
                subscription_status = $3,
                subscription_end_date = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(status.as_str())
        .bind(end_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_subscription_by_customer(
        &self,
        customer_id: &str,
        status: SubscriptionStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET subscription_status = $2,
                subscription_end_date = $3,
                updated_at = NOW()
            WHERE stripe_customer_id = $1
            "#,
        )
        .bind(customer_id)
        .bind(status.as_str())
        .bind(end_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
