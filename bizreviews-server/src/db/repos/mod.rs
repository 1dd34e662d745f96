//! Repository traits and their PostgreSQL implementations
//!
//! Each repository follows these patterns:
//! - One statement per operation where the database can answer alone
//! - Existence is read from `RETURNING` / `rows_affected`, not a prior SELECT
//! - Duplicate reviews are rejected by a unique constraint (ON CONFLICT)

pub mod businesses;
pub mod reviews;

use async_trait::async_trait;

use crate::models::{Business, NewBusiness, NewReview, Page, Review, ReviewUpdate};

pub use businesses::PgBusinessRepo;
pub use reviews::PgReviewRepo;

/// Resource kind named in a not-found error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Business,
    Review,
}

impl Resource {
    /// Client-facing message for a missing row.
    pub fn not_found_message(self) -> &'static str {
        match self {
            Self::Business => "No business with this business_id exists",
            Self::Review => "No review with this review_id exists",
        }
    }
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource:?} {id}")]
    NotFound { resource: Resource, id: i64 },

    #[error("user {user_id} already reviewed business {business_id}")]
    DuplicateReview { user_id: i32, business_id: i64 },
}

impl DbError {
    pub(crate) fn not_found(resource: Resource, id: i64) -> Self {
        Self::NotFound { resource, id }
    }
}

/// Storage for the `businesses` table
#[async_trait]
pub trait BusinessRepo: Send + Sync {
    /// Insert a business and return the stored row.
    async fn create(&self, new: NewBusiness) -> Result<Business, DbError>;

    /// One page of businesses ordered by id.
    async fn list(&self, page: Page) -> Result<Vec<Business>, DbError>;

    async fn get(&self, business_id: i64) -> Result<Business, DbError>;

    /// Replace every attribute of an existing business.
    async fn update(&self, business_id: i64, new: NewBusiness) -> Result<Business, DbError>;

    /// Delete a business; its reviews go with it.
    async fn delete(&self, business_id: i64) -> Result<(), DbError>;

    /// All businesses of one owner ordered by id (possibly empty).
    async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<Business>, DbError>;
}

/// Storage for the `reviews` table
#[async_trait]
pub trait ReviewRepo: Send + Sync {
    /// Insert a review.
    ///
    /// Fails with `NotFound(Business)` when the business is absent and with
    /// `DuplicateReview` when the user already reviewed it.
    async fn create(&self, new: NewReview) -> Result<Review, DbError>;

    /// Review joined against its business.
    async fn get(&self, review_id: i64) -> Result<Review, DbError>;

    async fn update(&self, review_id: i64, update: ReviewUpdate) -> Result<Review, DbError>;

    async fn delete(&self, review_id: i64) -> Result<(), DbError>;

    /// All reviews written by one user ordered by id (possibly empty).
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Review>, DbError>;
}
