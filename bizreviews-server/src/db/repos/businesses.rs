//! Business repository
//!
//! - update/delete: existence from RETURNING / rows_affected (no pre-check)
//! - list: ORDER BY business_id with LIMIT/OFFSET

use async_trait::async_trait;
use sqlx::PgPool;

use super::{BusinessRepo, DbError, Resource};
use crate::models::{Business, NewBusiness, Page};

/// PostgreSQL-backed business repository
#[derive(Clone)]
pub struct PgBusinessRepo {
    pool: PgPool,
}

impl PgBusinessRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessRepo for PgBusinessRepo {
    async fn create(&self, new: NewBusiness) -> Result<Business, DbError> {
        let business: Business = sqlx::query_as(
            r#"
            INSERT INTO businesses (owner_id, name, street_address, city, state, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING business_id, owner_id, name, street_address, city, state, zip_code
            "#,
        )
        .bind(new.owner_id)
        .bind(&new.name)
        .bind(&new.street_address)
        .bind(&new.city)
        .bind(&new.state)
        .bind(new.zip_code)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(business_id = business.business_id, "business created");
        Ok(business)
    }

    async fn list(&self, page: Page) -> Result<Vec<Business>, DbError> {
        let businesses = sqlx::query_as(
            r#"
            SELECT business_id, owner_id, name, street_address, city, state, zip_code
            FROM businesses
            ORDER BY business_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(businesses)
    }

    async fn get(&self, business_id: i64) -> Result<Business, DbError> {
        sqlx::query_as(
            r#"
            SELECT business_id, owner_id, name, street_address, city, state, zip_code
            FROM businesses
            WHERE business_id = $1
            "#,
        )
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(Resource::Business, business_id))
    }

    async fn update(&self, business_id: i64, new: NewBusiness) -> Result<Business, DbError> {
        sqlx::query_as(
            r#"
            UPDATE businesses
            SET owner_id = $1, name = $2, street_address = $3, city = $4, state = $5, zip_code = $6
            WHERE business_id = $7
            RETURNING business_id, owner_id, name, street_address, city, state, zip_code
            "#,
        )
        .bind(new.owner_id)
        .bind(&new.name)
        .bind(&new.street_address)
        .bind(&new.city)
        .bind(&new.state)
        .bind(new.zip_code)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(Resource::Business, business_id))
    }

    async fn delete(&self, business_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM businesses WHERE business_id = $1")
            .bind(business_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(Resource::Business, business_id));
        }
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<Business>, DbError> {
        let businesses = sqlx::query_as(
            r#"
            SELECT business_id, owner_id, name, street_address, city, state, zip_code
            FROM businesses
            WHERE owner_id = $1
            ORDER BY business_id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(businesses)
    }
}
