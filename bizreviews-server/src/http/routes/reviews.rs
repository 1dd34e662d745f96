//! Review endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, PathId, RootUrl};
use crate::http::server::AppState;
use crate::models::{CreateReviewRequest, NewReview, Review, ReviewUpdate, UpdateReviewRequest};

/// Review response; the business is linked by URL, not nested
#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub user_id: i32,
    pub business: String,
    pub stars: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
    #[serde(rename = "self")]
    pub self_url: String,
}

impl ReviewResponse {
    /// Always carries `review_text`, even when empty.
    /// Used by create, update, and list-by-user.
    pub fn full(r: Review, root: &RootUrl) -> Self {
        Self {
            id: r.review_id,
            user_id: r.user_id,
            business: root.business(r.business_id),
            stars: r.stars,
            review_text: Some(r.review_text),
            self_url: root.review(r.review_id),
        }
    }

    /// Drops `review_text` when it is empty. Used by `GET /reviews/{id}`.
    pub fn compact(r: Review, root: &RootUrl) -> Self {
        let mut response = Self::full(r, root);
        response.review_text = response.review_text.filter(|text| !text.is_empty());
        response
    }
}

/// POST /reviews - create a review of an existing business
async fn create_review(
    State(state): State<Arc<AppState>>,
    root: RootUrl,
    JsonBody(req): JsonBody<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let new = NewReview::try_from(req)?;
    let review = state.reviews.create(new).await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::full(review, &root))))
}

/// GET /reviews/{review_id} - get a single review
async fn get_review(
    State(state): State<Arc<AppState>>,
    root: RootUrl,
    PathId(review_id): PathId<i64>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review = state.reviews.get(review_id).await?;
    Ok(Json(ReviewResponse::compact(review, &root)))
}

/// PUT /reviews/{review_id} - change stars and, optionally, the text
async fn update_review(
    State(state): State<Arc<AppState>>,
    root: RootUrl,
    PathId(review_id): PathId<i64>,
    JsonBody(req): JsonBody<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let update = ReviewUpdate::try_from(req)?;
    let review = state.reviews.update(review_id, update).await?;
    Ok(Json(ReviewResponse::full(review, &root)))
}

/// DELETE /reviews/{review_id}
async fn delete_review(
    State(state): State<Arc<AppState>>,
    PathId(review_id): PathId<i64>,
) -> Result<StatusCode, ApiError> {
    state.reviews.delete(review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/{user_id}/reviews - every review written by one user
async fn list_user_reviews(
    State(state): State<Arc<AppState>>,
    root: RootUrl,
    PathId(user_id): PathId<i64>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = match i32::try_from(user_id) {
        Ok(user_id) => state.reviews.list_for_user(user_id).await?,
        Err(_) => Vec::new(),
    };
    if reviews.is_empty() {
        return Err(ApiError::NotFound {
            message: "No reviews found for this user",
        });
    }

    Ok(Json(
        reviews
            .into_iter()
            .map(|r| ReviewResponse::full(r, &root))
            .collect(),
    ))
}

/// Review routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reviews", post(create_review))
        .route(
            "/reviews/{review_id}",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/users/{user_id}/reviews", get(list_user_reviews))
}
