//! Router-level tests over the in-memory repositories

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bizreviews_server::db::MemoryStore;
use bizreviews_server::{build_router, AppState, ServerConfig};

const HOST: &str = "api.test";

fn app() -> Router {
    build_router(AppState::in_memory(), &ServerConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri).header("host", HOST);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

fn cafe(owner_id: i64) -> Value {
    json!({
        "owner_id": owner_id,
        "name": "Cafe",
        "street_address": "1 Main St",
        "city": "X",
        "state": "CA",
        "zip_code": 90001
    })
}

async fn create_business(app: &Router, owner_id: i64) -> i64 {
    let (status, body) = send(app, "POST", "/businesses", Some(cafe(owner_id))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

// === Businesses ===

#[tokio::test]
async fn create_business_returns_record_with_self_link() {
    let app = app();
    let (status, body) = send(&app, "POST", "/businesses", Some(cafe(1))).await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("id present");
    assert_eq!(body["self"], format!("http://{HOST}/businesses/{id}"));
    assert_eq!(body["name"], "Cafe");
    assert_eq!(body["zip_code"], 90001);
}

#[tokio::test]
async fn created_business_is_retrievable_with_identical_fields() {
    let app = app();
    let (_, created) = send(&app, "POST", "/businesses", Some(cafe(1))).await;
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, "GET", &format!("/businesses/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created, fetched);
}

#[tokio::test]
async fn create_business_missing_field_is_400() {
    let app = app();
    let mut body = cafe(1);
    body.as_object_mut().unwrap().remove("city");

    let (status, body) = send(&app, "POST", "/businesses", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"Error": "The request body is missing at least one of the required attributes"})
    );
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/businesses")
        .header("host", HOST)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_missing_business_is_404() {
    let app = app();
    let (status, body) = send(&app, "GET", "/businesses/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": "No business with this business_id exists"}));
}

#[tokio::test]
async fn non_integer_id_is_404() {
    let app = app();
    let (status, _) = send(&app, "GET", "/businesses/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_business_replaces_all_fields() {
    let app = app();
    let id = create_business(&app, 1).await;

    let replacement = json!({
        "owner_id": 2,
        "name": "Bakery",
        "street_address": "9 Elm St",
        "city": "Y",
        "state": "WA",
        "zip_code": 98101
    });
    let (status, body) = send(&app, "PUT", &format!("/businesses/{id}"), Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Bakery");
    assert_eq!(body["owner_id"], 2);
    assert_eq!(body["id"], id);

    let (_, fetched) = send(&app, "GET", &format!("/businesses/{id}"), None).await;
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn update_business_validates_before_lookup() {
    let app = app();
    let (status, _) = send(&app, "PUT", "/businesses/999", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", "/businesses/999", Some(cafe(1))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_business_then_404() {
    let app = app();
    let id = create_business(&app, 1).await;

    let (status, body) = send(&app, "DELETE", &format!("/businesses/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "DELETE", &format!("/businesses/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pagination_next_advances_by_limit_until_short_page() {
    let app = app();
    for owner in 0..7 {
        create_business(&app, owner).await;
    }

    let mut uri = "/businesses?limit=3".to_string();
    let mut offsets = Vec::new();
    let mut sizes = Vec::new();
    loop {
        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        sizes.push(body["entries"].as_array().unwrap().len());

        match body["next"].as_str() {
            Some(next) => {
                let path = next.strip_prefix(&format!("http://{HOST}")).unwrap();
                offsets.push(path.rsplit('=').next().unwrap().parse::<i64>().unwrap());
                uri = path.to_string();
            }
            None => break,
        }
    }

    assert_eq!(offsets, vec![3, 6]);
    assert_eq!(sizes, vec![3, 3, 1]);
}

#[tokio::test]
async fn pagination_defaults_and_link_format() {
    let app = app();
    for owner in 0..4 {
        create_business(&app, owner).await;
    }

    let (status, body) = send(&app, "GET", "/businesses", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["id"], 1);
    assert_eq!(body["next"], format!("http://{HOST}/businesses?limit=3&offset=3"));

    let (_, body) = send(&app, "GET", "/businesses?offset=3", None).await;
    assert_eq!(body["entries"].as_array().unwrap().len(), 1);
    assert_eq!(body["next"], Value::Null);
}

#[tokio::test]
async fn pagination_rejects_bad_params() {
    let app = app();
    for uri in ["/businesses?offset=abc", "/businesses?limit=x", "/businesses?limit=0"] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({"Error": "Invalid query parameter"}));
    }
}

#[tokio::test]
async fn pagination_repeated_key_uses_first_value() {
    let app = app();
    for owner in 0..4 {
        create_business(&app, owner).await;
    }

    let (status, body) = send(&app, "GET", "/businesses?limit=2&limit=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"].as_array().unwrap().len(), 2);
    assert_eq!(body["next"], format!("http://{HOST}/businesses?limit=2&offset=2"));
}

#[tokio::test]
async fn owner_id_beyond_integer_range_is_empty_404() {
    let app = app();
    create_business(&app, 5).await;

    let (status, body) = send(&app, "GET", "/owners/3000000000/businesses", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": "No businesses found for this owner_id"}));

    let (status, body) = send(&app, "GET", "/users/3000000000/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": "No reviews found for this user"}));
}

#[tokio::test]
async fn owner_listing() {
    let app = app();
    create_business(&app, 5).await;
    create_business(&app, 6).await;
    create_business(&app, 5).await;

    let (status, body) = send(&app, "GET", "/owners/5/businesses", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body.as_array().unwrap().iter().map(|b| b["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 3]);

    let (status, body) = send(&app, "GET", "/owners/404/businesses", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": "No businesses found for this owner_id"}));
}

// === Reviews ===

async fn create_review(app: &Router, business_id: i64, user_id: i64, text: Option<&str>) -> (StatusCode, Value) {
    let mut body = json!({"user_id": user_id, "business_id": business_id, "stars": 5});
    if let Some(text) = text {
        body["review_text"] = json!(text);
    }
    send(app, "POST", "/reviews", Some(body)).await
}

#[tokio::test]
async fn create_review_links_business() {
    let app = app();
    let business_id = create_business(&app, 1).await;

    let (status, body) = create_review(&app, business_id, 9, None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["business"], format!("http://{HOST}/businesses/{business_id}"));
    assert_eq!(body["self"], format!("http://{HOST}/reviews/{id}"));
    // create always carries the text
    assert_eq!(body["review_text"], "");
}

#[tokio::test]
async fn create_review_missing_field_is_400() {
    let app = app();
    let business_id = create_business(&app, 1).await;
    let (status, _) = send(&app, "POST", "/reviews", Some(json!({"user_id": 1, "business_id": business_id}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_for_missing_business_is_404_and_not_stored() {
    let store = MemoryStore::new();
    let app = build_router(AppState::with_store(&store), &ServerConfig::default());

    let (status, body) = create_review(&app, 42, 9, Some("ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": "No business with this business_id exists"}));
    assert_eq!(store.review_count(9, 42).await, 0);
}

#[tokio::test]
async fn duplicate_review_is_409_and_leaves_one_row() {
    let store = MemoryStore::new();
    let app = build_router(AppState::with_store(&store), &ServerConfig::default());
    let business_id = create_business(&app, 1).await;

    let (status, _) = create_review(&app, business_id, 9, Some("first")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = create_review(&app, business_id, 9, Some("second")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["Error"].as_str().unwrap().contains("update your previous review"));
    assert_eq!(store.review_count(9, business_id).await, 1);
}

#[tokio::test]
async fn concurrent_duplicate_reviews_leave_one_row() {
    // One review per (user, business) holds under concurrency too.
    let store = MemoryStore::new();
    let app = build_router(AppState::with_store(&store), &ServerConfig::default());
    let business_id = create_business(&app, 1).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { create_review(&app, business_id, 9, None).await.0 })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 7);
    assert_eq!(store.review_count(9, business_id).await, 1);
}

#[tokio::test]
async fn get_review_omits_empty_text() {
    let app = app();
    let business_id = create_business(&app, 1).await;
    let (_, empty) = create_review(&app, business_id, 1, None).await;
    let (_, filled) = create_review(&app, business_id, 2, Some("Great")).await;

    let (status, body) = send(&app, "GET", &format!("/reviews/{}", empty["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("review_text").is_none());
    assert_eq!(body["stars"], 5);

    let (_, body) = send(&app, "GET", &format!("/reviews/{}", filled["id"]), None).await;
    assert_eq!(body["review_text"], "Great");
}

#[tokio::test]
async fn get_missing_review_is_404() {
    let app = app();
    let (status, body) = send(&app, "GET", "/reviews/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": "No review with this review_id exists"}));
}

#[tokio::test]
async fn update_review_preserves_text_when_omitted() {
    let app = app();
    let business_id = create_business(&app, 1).await;
    let (_, created) = create_review(&app, business_id, 9, Some("Great")).await;
    let uri = format!("/reviews/{}", created["id"]);

    let (status, body) = send(&app, "PUT", &uri, Some(json!({"stars": 4}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stars"], 4);
    assert_eq!(body["review_text"], "Great");

    let (_, body) = send(&app, "PUT", &uri, Some(json!({"stars": 2, "review_text": "Meh"}))).await;
    assert_eq!(body["review_text"], "Meh");
}

#[tokio::test]
async fn update_review_ignores_owner_fields() {
    let app = app();
    let business_id = create_business(&app, 1).await;
    let other = create_business(&app, 1).await;
    let (_, created) = create_review(&app, business_id, 9, None).await;

    let (_, body) = send(
        &app,
        "PUT",
        &format!("/reviews/{}", created["id"]),
        Some(json!({"stars": 1, "user_id": 100, "business_id": other})),
    )
    .await;
    assert_eq!(body["user_id"], 9);
    assert_eq!(body["business"], format!("http://{HOST}/businesses/{business_id}"));
}

#[tokio::test]
async fn update_review_requires_stars_and_existing_row() {
    let app = app();
    let (status, _) = send(&app, "PUT", "/reviews/1", Some(json!({"review_text": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", "/reviews/1", Some(json!({"stars": 3}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_review_then_404() {
    let app = app();
    let business_id = create_business(&app, 1).await;
    let (_, created) = create_review(&app, business_id, 9, None).await;
    let uri = format!("/reviews/{}", created["id"]);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_listing_includes_text_always() {
    let app = app();
    let first = create_business(&app, 1).await;
    let second = create_business(&app, 1).await;
    create_review(&app, first, 9, None).await;
    create_review(&app, second, 9, Some("Nice")).await;
    create_review(&app, first, 10, None).await;

    let (status, body) = send(&app, "GET", "/users/9/reviews", None).await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body.as_array().unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0]["review_text"], "");
    assert_eq!(reviews[1]["review_text"], "Nice");

    let (status, body) = send(&app, "GET", "/users/11/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": "No reviews found for this user"}));
}

#[tokio::test]
async fn deleting_business_cascades_to_reviews() {
    let app = app();
    let business_id = create_business(&app, 1).await;
    let (_, review) = create_review(&app, business_id, 9, Some("Gone soon")).await;

    let (status, _) = send(&app, "DELETE", &format!("/businesses/{business_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/reviews/{}", review["id"]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/users/9/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// === Misc ===

#[tokio::test]
async fn index_and_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Please navigate to /businesses to use this API".into()));

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = app();
    let (status, body) = send(&app, "GET", "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"Error": "Not Found"}));
}

#[tokio::test]
async fn unsupported_method_is_json_405() {
    let app = app();
    let id = create_business(&app, 1).await;

    let (status, body) = send(&app, "PATCH", &format!("/businesses/{id}"), Some(cafe(1))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"Error": "Method Not Allowed"}));

    let (status, body) = send(&app, "GET", "/reviews", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"Error": "Method Not Allowed"}));
}
