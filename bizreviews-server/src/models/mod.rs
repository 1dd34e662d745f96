//! Domain models with validation at construction
//!
//! Request bodies deserialize into `*Request` types with optional fields,
//! then convert into validated values via `TryFrom`.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod business;
pub mod review;
pub mod pagination;

pub use validation::ValidationError;
pub use business::{Business, BusinessRequest, NewBusiness};
pub use review::{CreateReviewRequest, NewReview, Review, ReviewUpdate, UpdateReviewRequest};
pub use pagination::{Page, PageParams, DEFAULT_LIMIT};
