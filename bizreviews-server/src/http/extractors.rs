//! Custom Axum extractors

use std::convert::Infallible;

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::{Page, ValidationError};

/// JSON body whose rejection is a 400 `ApiError` instead of axum's
/// plain-text 415/422.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: rejection.body_text(),
            })
        })?;
        Ok(Self(value))
    }
}

/// Integer path id; anything else is treated as an unmatched route (404).
pub struct PathId<T>(pub T);

impl<S, T> FromRequestParts<S> for PathId<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NoRoute)?;
        Ok(Self(id))
    }
}

/// Raw query-string pairs in request order. Repeated keys are kept, so the
/// caller decides which occurrence wins; a rejection is a JSON 400.
pub struct QueryPairs(pub Vec<(String, String)>);

impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::InvalidQuery { param: "query" }))?;
        Ok(Self(pairs))
    }
}

/// Root URL of the incoming request (`<scheme>://<host>/`), the base of
/// every `self` and `business` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootUrl(String);

impl RootUrl {
    pub fn new(scheme: &str, host: &str) -> Self {
        Self(format!("{}://{}/", scheme, host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn business(&self, business_id: i64) -> String {
        format!("{}businesses/{}", self.0, business_id)
    }

    pub fn review(&self, review_id: i64) -> String {
        format!("{}reviews/{}", self.0, review_id)
    }

    pub fn businesses_page(&self, page: Page) -> String {
        format!(
            "{}businesses?limit={}&offset={}",
            self.0, page.limit, page.offset
        )
    }
}

impl<S> FromRequestParts<S> for RootUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        // Behind a proxy the first X-Forwarded-Proto entry is the client's
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| parts.uri.scheme_str())
            .unwrap_or("http");

        Ok(Self::new(scheme, &host))
    }
}
