//! Review records and request validation

use serde::Deserialize;
use sqlx::FromRow;

use super::validation::{max_len, required};
use super::ValidationError;

const MAX_REVIEW_TEXT_LEN: usize = 1000;

/// Review row from the `reviews` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Review {
    pub review_id: i64,
    pub business_id: i64,
    pub user_id: i32,
    pub stars: i32,
    pub review_text: String,
}

/// Body of `POST /reviews`
#[derive(Debug, Default, Deserialize)]
pub struct CreateReviewRequest {
    pub user_id: Option<i32>,
    pub business_id: Option<i64>,
    pub stars: Option<i32>,
    pub review_text: Option<String>,
}

/// Body of `PUT /reviews/{review_id}`.
///
/// `business_id` and `user_id` are ignored if sent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReviewRequest {
    pub stars: Option<i32>,
    pub review_text: Option<String>,
}

/// Validated review, ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub user_id: i32,
    pub business_id: i64,
    pub stars: i32,
    /// Empty when the body had no text
    pub review_text: String,
}

impl TryFrom<CreateReviewRequest> for NewReview {
    type Error = ValidationError;

    fn try_from(req: CreateReviewRequest) -> Result<Self, Self::Error> {
        let user_id = required(req.user_id)?;
        let business_id = required(req.business_id)?;
        let stars = required(req.stars)?;
        let review_text = req.review_text.unwrap_or_default();

        Ok(Self {
            user_id,
            business_id,
            stars,
            review_text: max_len("review_text", review_text, MAX_REVIEW_TEXT_LEN)?,
        })
    }
}

/// Validated partial update of a review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub stars: i32,
    /// `None` keeps the stored text
    pub review_text: Option<String>,
}

impl ReviewUpdate {
    /// Apply onto an existing row.
    pub fn apply(&self, review: &mut Review) {
        review.stars = self.stars;
        if let Some(text) = &self.review_text {
            review.review_text = text.clone();
        }
    }
}

impl TryFrom<UpdateReviewRequest> for ReviewUpdate {
    type Error = ValidationError;

    fn try_from(req: UpdateReviewRequest) -> Result<Self, Self::Error> {
        let stars = required(req.stars)?;
        let review_text = req
            .review_text
            .map(|text| max_len("review_text", text, MAX_REVIEW_TEXT_LEN))
            .transpose()?;

        Ok(Self { stars, review_text })
    }
}
