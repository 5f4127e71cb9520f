//! Admin session gating and catalog management.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use rosa_studio_integration_tests::{ADMIN_EMAIL, Multipart, TestContext};

fn item_form(title: &str) -> Multipart {
    Multipart::new()
        .text("title", title)
        .text("category", "Painting")
        .text("description", "Acrylic on canvas")
        .text("price", "$120")
}

#[tokio::test]
async fn test_catalog_routes_require_login() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.admin_browser();

    for uri in ["/api/items", "/api/catalog", "/api/dashboard", "/api/purchases"] {
        assert_eq!(browser.get(uri).await.status, StatusCode::UNAUTHORIZED, "{uri}");
    }
    let reset = browser
        .post_json("/api/catalog/reset", &json!({ "confirm": "RESET" }))
        .await;
    assert_eq!(reset.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_rejected() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.admin_browser();

    let response = browser
        .post_json(
            "/api/auth/login",
            &json!({ "email": ADMIN_EMAIL, "password": "wrong-password" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(browser.get("/api/session").await.body["authenticated"], false);
}

#[tokio::test]
async fn test_login_then_logout() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.logged_in_admin().await;

    let session = browser.get("/api/session").await;
    assert_eq!(session.body["authenticated"], true);
    assert_eq!(session.body["admin"]["email"], ADMIN_EMAIL);

    assert_eq!(browser.get("/api/items").await.status, StatusCode::OK);

    let logout = browser.post_json("/api/auth/logout", &json!({})).await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);
    assert_eq!(browser.get("/api/items").await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_item_with_upload() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.logged_in_admin().await;

    let form = item_form("Harbor at Dusk").file("image", "harbor.png", "image/png", &[137, 80, 78, 71]);
    let created = browser.send_form(Method::POST, "/api/items", form).await;

    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.body["title"], "Harbor at Dusk");
    let image_url = created.body["imageUrl"].as_str().unwrap();
    assert!(image_url.starts_with("https://blobs.test/site-images/"));
    assert!(image_url.ends_with(".png"));
    assert_eq!(ctx.stores.blobs.object_names().len(), 1);

    let items = browser.get("/api/items").await;
    assert_eq!(items.body[0]["title"], "Harbor at Dusk");
}

#[tokio::test]
async fn test_failed_upload_saves_nothing() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.logged_in_admin().await;
    ctx.stores.blobs.failure.set(true);

    let form = item_form("Lost Canvas").file("image", "lost.png", "image/png", &[1, 2, 3]);
    let response = browser.send_form(Method::POST, "/api/items", form).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    let items = browser.get("/api/items").await;
    assert_eq!(items.body.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_create_item_requires_image() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.logged_in_admin().await;

    let response = browser
        .send_form(Method::POST, "/api/items", item_form("No Picture"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_keeps_image_without_new_upload() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.logged_in_admin().await;
    let before = browser.get("/api/items").await.body;
    let original = before
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["id"] == "1")
        .unwrap()
        .clone();

    let updated = browser
        .send_form(Method::PUT, "/api/items/1", item_form("Luna Renamed"))
        .await;

    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.body["title"], "Luna Renamed");
    assert_eq!(updated.body["imageUrl"], original["imageUrl"]);
}

#[tokio::test]
async fn test_delete_item() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.logged_in_admin().await;

    assert_eq!(browser.delete("/api/items/1").await.status, StatusCode::NO_CONTENT);
    assert_eq!(browser.delete("/api/items/1").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories_add_is_idempotent_and_delete_reports_dangling() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.logged_in_admin().await;

    let added = browser
        .post_json("/api/categories", &json!({ "name": "Pottery" }))
        .await;
    assert_eq!(added.status, StatusCode::CREATED);
    assert_eq!(added.body["added"], true);

    let again = browser
        .post_json("/api/categories", &json!({ "name": "Pottery" }))
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["added"], false);
    assert_eq!(again.body["categories"], added.body["categories"]);

    let removed = browser.delete("/api/categories/Macrame").await;
    assert_eq!(removed.body["removed"], true);
    assert!(removed.body["danglingItems"].as_u64().unwrap() >= 1);
}

#[tokio::test]
async fn test_reset_requires_confirmation_phrase() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.logged_in_admin().await;
    browser.delete("/api/items/1").await;

    let refused = browser
        .post_json("/api/catalog/reset", &json!({ "confirm": "reset please" }))
        .await;
    assert_eq!(refused.status, StatusCode::BAD_REQUEST);
    assert_eq!(browser.get("/api/items").await.body.as_array().unwrap().len(), 5);

    let first = browser
        .post_json("/api/catalog/reset", &json!({ "confirm": "RESET" }))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let second = browser
        .post_json("/api/catalog/reset", &json!({ "confirm": "RESET" }))
        .await;

    assert_eq!(first.body["items"].as_array().unwrap().len(), 6);
    assert_eq!(first.body["items"], second.body["items"]);
    assert_eq!(first.body["categories"], second.body["categories"]);
}

#[tokio::test]
async fn test_profile_update() {
    let ctx = TestContext::new().await;
    let mut browser = ctx.logged_in_admin().await;

    let form = Multipart::new()
        .text("headline", "Handmade in Portland")
        .text("highlight", "Portland")
        .text("description", "Fiber art and painting.");
    let updated = browser.send_form(Method::PUT, "/api/profile", form).await;

    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.body["headline"], "Handmade in Portland");
    assert_eq!(browser.get("/api/profile").await.body, updated.body);
}
