//! Review repository
//!
//! - create: single INSERT; FK violation means the business is absent,
//!   ON CONFLICT DO NOTHING means the (user, business) pair already exists
//! - update: COALESCE keeps the stored text when none is supplied

use async_trait::async_trait;
use sqlx::PgPool;

use super::{DbError, Resource, ReviewRepo};
use crate::models::{NewReview, Review, ReviewUpdate};

/// PostgreSQL-backed review repository
#[derive(Clone)]
pub struct PgReviewRepo {
    pool: PgPool,
}

impl PgReviewRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepo for PgReviewRepo {
    async fn create(&self, new: NewReview) -> Result<Review, DbError> {
        let inserted: Option<Review> = sqlx::query_as(
            r#"
            INSERT INTO reviews (user_id, business_id, stars, review_text)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, business_id) DO NOTHING
            RETURNING review_id, business_id, user_id, stars, review_text
            "#,
        )
        .bind(new.user_id)
        .bind(new.business_id)
        .bind(new.stars)
        .bind(&new.review_text)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DbError::not_found(Resource::Business, new.business_id)
            }
            other => DbError::Sqlx(other),
        })?;

        let review = inserted.ok_or(DbError::DuplicateReview {
            user_id: new.user_id,
            business_id: new.business_id,
        })?;

        tracing::debug!(review_id = review.review_id, "review created");
        Ok(review)
    }

    async fn get(&self, review_id: i64) -> Result<Review, DbError> {
        sqlx::query_as(
            r#"
            SELECT r.review_id, r.business_id, r.user_id, r.stars, r.review_text
            FROM reviews r
            JOIN businesses b ON r.business_id = b.business_id
            WHERE r.review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(Resource::Review, review_id))
    }

    async fn update(&self, review_id: i64, update: ReviewUpdate) -> Result<Review, DbError> {
        sqlx::query_as(
            r#"
            UPDATE reviews
            SET stars = $1, review_text = COALESCE($2, review_text)
            WHERE review_id = $3
            RETURNING review_id, business_id, user_id, stars, review_text
            "#,
        )
        .bind(update.stars)
        .bind(update.review_text.as_deref())
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(Resource::Review, review_id))
    }

    async fn delete(&self, review_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(Resource::Review, review_id));
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Review>, DbError> {
        let reviews = sqlx::query_as(
            r#"
            SELECT r.review_id, r.business_id, r.user_id, r.stars, r.review_text
            FROM reviews r
            JOIN businesses b ON r.business_id = b.business_id
            WHERE r.user_id = $1
            ORDER BY r.review_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
