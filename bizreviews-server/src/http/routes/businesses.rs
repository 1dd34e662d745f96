//! Business endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, PathId, QueryPairs, RootUrl};
use crate::http::server::AppState;
use crate::models::{Business, BusinessRequest, NewBusiness, Page, PageParams};

/// Business response
#[derive(Debug, Serialize)]
pub struct BusinessResponse {
    pub id: i64,
    pub owner_id: i32,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: i32,
    #[serde(rename = "self")]
    pub self_url: String,
}

impl BusinessResponse {
    pub fn new(b: Business, root: &RootUrl) -> Self {
        Self {
            self_url: root.business(b.business_id),
            id: b.business_id,
            owner_id: b.owner_id,
            name: b.name,
            street_address: b.street_address,
            city: b.city,
            state: b.state,
            zip_code: b.zip_code,
        }
    }
}

/// One page of businesses; `next` is null once a short page is returned
#[derive(Debug, Serialize)]
pub struct BusinessPage {
    pub entries: Vec<BusinessResponse>,
    pub next: Option<String>,
}

/// POST /businesses - create a business
async fn create_business(
    State(state): State<Arc<AppState>>,
    root: RootUrl,
    JsonBody(req): JsonBody<BusinessRequest>,
) -> Result<(StatusCode, Json<BusinessResponse>), ApiError> {
    let new = NewBusiness::try_from(req)?;
    let business = state.businesses.create(new).await?;

    Ok((StatusCode::CREATED, Json(BusinessResponse::new(business, &root))))
}

/// GET /businesses?offset=&limit= - list businesses by id
async fn list_businesses(
    State(state): State<Arc<AppState>>,
    root: RootUrl,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<BusinessPage>, ApiError> {
    let page = Page::try_from(pairs.into_iter().collect::<PageParams>())?;
    let businesses = state.businesses.list(page).await?;

    let next = page.next(businesses.len()).map(|p| root.businesses_page(p));
    Ok(Json(BusinessPage {
        entries: businesses
            .into_iter()
            .map(|b| BusinessResponse::new(b, &root))
            .collect(),
        next,
    }))
}

/// GET /businesses/{id} - get a single business
async fn get_business(
    State(state): State<Arc<AppState>>,
    root: RootUrl,
    PathId(id): PathId<i64>,
) -> Result<Json<BusinessResponse>, ApiError> {
    let business = state.businesses.get(id).await?;
    Ok(Json(BusinessResponse::new(business, &root)))
}

/// PUT /businesses/{id} - replace every attribute
async fn update_business(
    State(state): State<Arc<AppState>>,
    root: RootUrl,
    PathId(id): PathId<i64>,
    JsonBody(req): JsonBody<BusinessRequest>,
) -> Result<Json<BusinessResponse>, ApiError> {
    let new = NewBusiness::try_from(req)?;
    let business = state.businesses.update(id, new).await?;
    Ok(Json(BusinessResponse::new(business, &root)))
}

/// DELETE /businesses/{id} - delete a business and its reviews
async fn delete_business(
    State(state): State<Arc<AppState>>,
    PathId(id): PathId<i64>,
) -> Result<StatusCode, ApiError> {
    state.businesses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /owners/{owner_id}/businesses - every business of one owner
async fn list_owner_businesses(
    State(state): State<Arc<AppState>>,
    root: RootUrl,
    PathId(owner_id): PathId<i64>,
) -> Result<Json<Vec<BusinessResponse>>, ApiError> {
    // owner_id is an INTEGER column; a wider id cannot match any row
    let businesses = match i32::try_from(owner_id) {
        Ok(owner_id) => state.businesses.list_for_owner(owner_id).await?,
        Err(_) => Vec::new(),
    };
    if businesses.is_empty() {
        return Err(ApiError::NotFound {
            message: "No businesses found for this owner_id",
        });
    }

    Ok(Json(
        businesses
            .into_iter()
            .map(|b| BusinessResponse::new(b, &root))
            .collect(),
    ))
}

/// Business routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/businesses", get(list_businesses).post(create_business))
        .route(
            "/businesses/{id}",
            get(get_business).put(update_business).delete(delete_business),
        )
        .route("/owners/{owner_id}/businesses", get(list_owner_businesses))
}
