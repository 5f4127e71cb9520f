//! Storefront writes observed through the admin API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use rosa_studio_integration_tests::{Multipart, TestContext};

#[tokio::test]
async fn test_dashboard_reflects_storefront_activity() {
    let ctx = TestContext::new().await;
    let mut admin = ctx.logged_in_admin().await;

    let empty = admin.get("/api/dashboard").await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["activeCarts"], 0);
    assert_eq!(empty.body["totalRevenueDisplay"], "$0.00");

    let mut shopper = ctx.visitor();
    shopper.post_json("/api/traffic", &json!({ "path": "/" })).await;
    shopper.post_json("/api/cart/items", &json!({ "itemId": "1" })).await;

    let mut browser = ctx.visitor();
    browser.post_json("/api/cart/items", &json!({ "itemId": "2" })).await;

    let busy = admin.get("/api/dashboard").await;
    assert_eq!(busy.body["activeCarts"], 2);
    assert_eq!(busy.body["totalTraffic"], 1);

    shopper
        .post_json(
            "/api/checkout",
            &json!({
                "email": "ada@example.com",
                "shipping": {
                    "name": "Ada Lovelace",
                    "address1": "12 Loom Lane",
                    "city": "Portland",
                    "state": "OR",
                    "zip": "97201"
                }
            }),
        )
        .await;

    let after = admin.get("/api/dashboard").await;
    assert_eq!(after.body["activeCarts"], 1);
    assert_eq!(after.body["totalRevenueDisplay"], "$85.00");

    let purchases = admin.get("/api/purchases").await;
    assert_eq!(purchases.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_dashboard_fails_when_a_store_is_down() {
    let ctx = TestContext::new().await;
    let mut admin = ctx.logged_in_admin().await;
    ctx.stores.traffic.failure.set(true);

    assert_eq!(admin.get("/api/dashboard").await.status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_admin_edits_reach_storefront_after_refresh() {
    let ctx = TestContext::new().await;
    let mut admin = ctx.logged_in_admin().await;

    let form = Multipart::new()
        .text("title", "Spring Runner")
        .text("category", "Miscellaneous")
        .text("description", "Table runner")
        .text("price", "$40")
        .text("imageUrl", "https://images.test/runner.jpg");
    let created = admin.send_form(Method::POST, "/api/items", form).await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let id = created.body["id"].as_str().unwrap().to_owned();

    let mut visitor = ctx.visitor();
    assert_eq!(
        visitor.get(&format!("/api/items/{id}")).await.status,
        StatusCode::NOT_FOUND
    );

    ctx.storefront_state.catalog().refresh().await.unwrap();

    let item = visitor.get(&format!("/api/items/{id}")).await;
    assert_eq!(item.status, StatusCode::OK);
    assert_eq!(item.body["title"], "Spring Runner");
}

#[tokio::test]
async fn test_custom_requests_listed_for_admin() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();
    visitor
        .post_json(
            "/api/custom-requests",
            &json!({
                "name": "Grace",
                "email": "grace@example.com",
                "category": "Bleach Art",
                "description": "Matching hoodies"
            }),
        )
        .await;

    let mut admin = ctx.logged_in_admin().await;
    let requests = admin.get("/api/custom-requests").await;

    assert_eq!(requests.status, StatusCode::OK);
    assert_eq!(requests.body[0]["category"], "Bleach Art");
}
