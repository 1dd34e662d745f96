//! In-memory repositories
//!
//! Mirrors the PostgreSQL behavior (serial ids, cascade delete, unique
//! (user, business) pair) for `serve --in-memory` and for router tests.
//! Both repositories share one set of tables behind a tokio RwLock.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repos::{BusinessRepo, DbError, Resource, ReviewRepo};
use crate::models::{Business, NewBusiness, NewReview, Page, Review, ReviewUpdate};

#[derive(Default)]
struct Tables {
    businesses: BTreeMap<i64, Business>,
    reviews: BTreeMap<i64, Review>,
    next_business_id: i64,
    next_review_id: i64,
}

impl Tables {
    fn next_business_id(&mut self) -> i64 {
        self.next_business_id += 1;
        self.next_business_id
    }

    fn next_review_id(&mut self) -> i64 {
        self.next_review_id += 1;
        self.next_review_id
    }
}

/// Shared handle to the in-memory tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn businesses(&self) -> MemoryBusinessRepo {
        MemoryBusinessRepo {
            store: self.clone(),
        }
    }

    pub fn reviews(&self) -> MemoryReviewRepo {
        MemoryReviewRepo {
            store: self.clone(),
        }
    }

    /// Number of stored reviews for a (user, business) pair.
    pub async fn review_count(&self, user_id: i32, business_id: i64) -> usize {
        self.tables
            .read()
            .await
            .reviews
            .values()
            .filter(|r| r.user_id == user_id && r.business_id == business_id)
            .count()
    }
}

/// In-memory business repository
#[derive(Clone)]
pub struct MemoryBusinessRepo {
    store: MemoryStore,
}

#[async_trait]
impl BusinessRepo for MemoryBusinessRepo {
    async fn create(&self, new: NewBusiness) -> Result<Business, DbError> {
        let mut tables = self.store.tables.write().await;
        let business = new.with_id(tables.next_business_id());
        tables.businesses.insert(business.business_id, business.clone());
        Ok(business)
    }

    async fn list(&self, page: Page) -> Result<Vec<Business>, DbError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .businesses
            .values()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn get(&self, business_id: i64) -> Result<Business, DbError> {
        self.store
            .tables
            .read()
            .await
            .businesses
            .get(&business_id)
            .cloned()
            .ok_or_else(|| DbError::not_found(Resource::Business, business_id))
    }

    async fn update(&self, business_id: i64, new: NewBusiness) -> Result<Business, DbError> {
        let mut tables = self.store.tables.write().await;
        let slot = tables
            .businesses
            .get_mut(&business_id)
            .ok_or_else(|| DbError::not_found(Resource::Business, business_id))?;
        *slot = new.with_id(business_id);
        Ok(slot.clone())
    }

    async fn delete(&self, business_id: i64) -> Result<(), DbError> {
        let mut tables = self.store.tables.write().await;
        if tables.businesses.remove(&business_id).is_none() {
            return Err(DbError::not_found(Resource::Business, business_id));
        }
        tables.reviews.retain(|_, r| r.business_id != business_id);
        Ok(())
    }

    async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<Business>, DbError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .businesses
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }
}

/// In-memory review repository
#[derive(Clone)]
pub struct MemoryReviewRepo {
    store: MemoryStore,
}

#[async_trait]
impl ReviewRepo for MemoryReviewRepo {
    async fn create(&self, new: NewReview) -> Result<Review, DbError> {
        // Check and insert under one write lock, like the unique constraint.
        let mut tables = self.store.tables.write().await;
        if !tables.businesses.contains_key(&new.business_id) {
            return Err(DbError::not_found(Resource::Business, new.business_id));
        }
        let duplicate = tables
            .reviews
            .values()
            .any(|r| r.user_id == new.user_id && r.business_id == new.business_id);
        if duplicate {
            return Err(DbError::DuplicateReview {
                user_id: new.user_id,
                business_id: new.business_id,
            });
        }

        let review = Review {
            review_id: tables.next_review_id(),
            business_id: new.business_id,
            user_id: new.user_id,
            stars: new.stars,
            review_text: new.review_text,
        };
        tables.reviews.insert(review.review_id, review.clone());
        Ok(review)
    }

    async fn get(&self, review_id: i64) -> Result<Review, DbError> {
        let tables = self.store.tables.read().await;
        tables
            .reviews
            .get(&review_id)
            .filter(|r| tables.businesses.contains_key(&r.business_id))
            .cloned()
            .ok_or_else(|| DbError::not_found(Resource::Review, review_id))
    }

    async fn update(&self, review_id: i64, update: ReviewUpdate) -> Result<Review, DbError> {
        let mut tables = self.store.tables.write().await;
        let review = tables
            .reviews
            .get_mut(&review_id)
            .ok_or_else(|| DbError::not_found(Resource::Review, review_id))?;
        update.apply(review);
        Ok(review.clone())
    }

    async fn delete(&self, review_id: i64) -> Result<(), DbError> {
        let mut tables = self.store.tables.write().await;
        tables
            .reviews
            .remove(&review_id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found(Resource::Review, review_id))
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Review>, DbError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .filter(|r| r.user_id == user_id && tables.businesses.contains_key(&r.business_id))
            .cloned()
            .collect())
    }
}
