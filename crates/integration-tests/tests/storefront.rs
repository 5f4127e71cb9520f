//! Visitor flows through the storefront router.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use rosa_studio_integration_tests::TestContext;

fn shipping() -> Value {
    json!({
        "name": "Ada Lovelace",
        "address1": "12 Loom Lane",
        "city": "Portland",
        "state": "OR",
        "zip": "97201"
    })
}

#[tokio::test]
async fn test_gallery_filters_by_category() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    let all = visitor.get("/api/items").await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body.as_array().unwrap().len(), 6);

    let everything = visitor.get("/api/items?category=All").await;
    assert_eq!(everything.body, all.body);

    let macrame = visitor.get("/api/items?category=Macrame").await;
    let macrame = macrame.body.as_array().unwrap();
    assert!(!macrame.is_empty());
    assert!(macrame.iter().all(|item| item["category"] == "Macrame"));

    let categories = visitor.get("/api/categories").await;
    assert_eq!(categories.body[0], "Macrame");
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    assert_eq!(visitor.get("/api/items/999").await.status, StatusCode::NOT_FOUND);
    let response = visitor.post_json("/api/cart/items", &json!({ "itemId": "999" })).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_guest_identity_is_stable_per_browser() {
    let ctx = TestContext::new().await;
    let mut first = ctx.visitor();
    let mut second = ctx.visitor();

    let a = first.get("/api/guest").await.body;
    let again = first.get("/api/guest").await.body;
    let b = second.get("/api/guest").await.body;

    assert_eq!(a, again);
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_guest_identity_outlives_an_expired_cart_session() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    let before = visitor.get("/api/guest").await.body;
    assert_eq!(before["persisted"], true);
    let cart = visitor.post_json("/api/cart/items", &json!({ "itemId": "1" })).await;
    assert_eq!(cart.body["count"], 1);

    visitor.expire_cookie("rosa_session");

    let after = visitor.get("/api/guest").await.body;
    assert_eq!(after["id"], before["id"]);
    let cart = visitor.get("/api/cart").await;
    assert_eq!(cart.body["count"], 0);
}

#[tokio::test]
async fn test_cart_keeps_duplicates_and_removes_one_at_a_time() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    visitor.post_json("/api/cart/items", &json!({ "itemId": "1" })).await;
    let cart = visitor.post_json("/api/cart/items", &json!({ "itemId": "1" })).await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body["count"], 2);
    assert_eq!(cart.body["totalDisplay"], "$170.00");
    assert_eq!(cart.body["mirror"]["status"], "mirrored");

    let cart = visitor.delete("/api/cart/items/1").await;
    assert_eq!(cart.body["count"], 1);

    let cart = visitor.delete("/api/cart").await;
    assert_eq!(cart.body["count"], 0);
    assert_eq!(cart.body["totalDisplay"], "$0.00");
}

#[tokio::test]
async fn test_removing_absent_item_leaves_cart_unchanged() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    visitor.post_json("/api/cart/items", &json!({ "itemId": "2" })).await;
    let cart = visitor.delete("/api/cart/items/1").await;

    assert_eq!(cart.body["count"], 1);
    assert_eq!(cart.body["items"][0]["id"], "2");
}

#[tokio::test]
async fn test_checkout_records_purchase_and_empties_cart() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    visitor.post_json("/api/cart/items", &json!({ "itemId": "1" })).await;
    visitor.post_json("/api/cart/items", &json!({ "itemId": "2" })).await;

    let response = visitor
        .post_json(
            "/api/checkout",
            &json!({ "email": "ada@example.com", "shipping": shipping() }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["purchase"]["customerEmail"], "ada@example.com");
    assert_eq!(
        response.body["purchase"]["items"]["products"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
    assert_eq!(response.body["cart"]["count"], 0);

    let cart = visitor.get("/api/cart").await;
    assert_eq!(cart.body["count"], 0);
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart_and_bad_input() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    let empty = visitor
        .post_json(
            "/api/checkout",
            &json!({ "email": "ada@example.com", "shipping": shipping() }),
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    visitor.post_json("/api/cart/items", &json!({ "itemId": "1" })).await;
    let bad_email = visitor
        .post_json(
            "/api/checkout",
            &json!({ "email": "not-an-email", "shipping": shipping() }),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

    let cart = visitor.get("/api/cart").await;
    assert_eq!(cart.body["count"], 1);
}

#[tokio::test]
async fn test_failed_ledger_write_keeps_cart() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    visitor.post_json("/api/cart/items", &json!({ "itemId": "1" })).await;
    ctx.stores.ledger.failure.set(true);

    let response = visitor
        .post_json(
            "/api/checkout",
            &json!({ "email": "ada@example.com", "shipping": shipping() }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(visitor.get("/api/cart").await.body["count"], 1);
}

#[tokio::test]
async fn test_mirror_failure_is_reported_but_cart_changes() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();
    ctx.stores.carts.failure.set(true);

    let cart = visitor.post_json("/api/cart/items", &json!({ "itemId": "3" })).await;

    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.body["count"], 1);
    assert_eq!(cart.body["mirror"]["status"], "failed");
}

#[tokio::test]
async fn test_custom_request_category_must_exist() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    let accepted = visitor
        .post_json(
            "/api/custom-requests",
            &json!({
                "name": "Grace",
                "email": "grace@example.com",
                "type": "Macrame",
                "description": "A wall hanging for the studio"
            }),
        )
        .await;
    assert_eq!(accepted.status, StatusCode::CREATED);

    let rejected = visitor
        .post_json(
            "/api/custom-requests",
            &json!({
                "name": "Grace",
                "email": "grace@example.com",
                "category": "Pottery",
                "description": "A vase"
            }),
        )
        .await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_traffic_beacon_always_succeeds() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    let ok = visitor.post_json("/api/traffic", &json!({ "path": "/gallery" })).await;
    assert_eq!(ok.status, StatusCode::NO_CONTENT);

    let malformed = visitor.post_json("/api/traffic", &json!({ "nope": 1 })).await;
    assert_eq!(malformed.status, StatusCode::NO_CONTENT);

    ctx.stores.traffic.failure.set(true);
    let failing = visitor.post_json("/api/traffic", &json!({ "path": "/about" })).await;
    assert_eq!(failing.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_workshop_disabled_without_key() {
    let ctx = TestContext::new().await;
    let mut visitor = ctx.visitor();

    let response = visitor
        .post_json("/api/workshop/concepts", &json!({ "prompt": "a sunset macrame" }))
        .await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}
