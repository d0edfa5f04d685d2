//! HTTP tests against a running API server.
//!
//! Start the server first (`cargo run -p postkasir-api`) and point
//! `POSTKASIR_API_BASE_URL` at it if it is not on localhost:3000.
//!
//! Emails are uniqued per run so tests do not trip over rows left by
//! earlier runs against the same database.

#![allow(clippy::unwrap_used)]

use std::time::{SystemTime, UNIX_EPOCH};

use postkasir_integration_tests::{api_base_url, http_client};
use serde_json::{Value, json};

fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{tag}-{nanos}@toko.test")
}

async fn register(client: &reqwest::Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/register", api_base_url()))
        .json(&json!({ "email": email, "name": "Kasir", "password": password }))
        .send()
        .await
        .expect("register request failed")
}

async fn login(client: &reqwest::Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/login", api_base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed")
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health_endpoint() {
    let client = http_client();
    let response = client
        .get(format!("{}/health", api_base_url()))
        .send()
        .await
        .expect("health request failed");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_register_then_login_then_me() {
    let client = http_client();
    let email = unique_email("flow");

    let response = register(&client, &email, "password123").await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["approval_status"], "pending");
    assert!(created["store_id"].is_null());

    let response = login(&client, &email, "password123").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap();
    assert_eq!(token.len(), 43);

    let response = client
        .get(format!("{}/auth/me", api_base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("me request failed");
    assert_eq!(response.status(), 200);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["email"], email);
    assert_eq!(me["approval_status"], "pending");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_duplicate_email_conflicts() {
    let client = http_client();
    let email = unique_email("dup");

    assert_eq!(register(&client, &email, "password123").await.status(), 201);

    let response = register(&client, &email, "password456").await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_wrong_password_rejected() {
    let client = http_client();
    let email = unique_email("badpw");

    assert_eq!(register(&client, &email, "password123").await.status(), 201);

    let response = login(&client, &email, "not-the-password").await;
    assert_eq!(response.status(), 401);

    // Unknown email answers identically
    let response = login(&client, &unique_email("ghost"), "password123").await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_unprovisioned_user_blocked_from_store_data() {
    let client = http_client();
    let email = unique_email("pending");

    assert_eq!(register(&client, &email, "password123").await.status(), 201);
    let body: Value = login(&client, &email, "password123")
        .await
        .json()
        .await
        .unwrap();
    let token = body["token"].as_str().unwrap().to_owned();

    // Freshly registered: no store, so the guard holds the session back
    let response = client
        .get(format!("{}/api/products", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("products request failed");
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No store assigned");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_invalid_token_unauthorized() {
    let client = http_client();

    let response = client
        .get(format!("{}/api/products", api_base_url()))
        .bearer_auth("A".repeat(43))
        .send()
        .await
        .expect("products request failed");
    assert_eq!(response.status(), 401);

    // Missing token on an API path is JSON 401, never a redirect
    let response = client
        .get(format!("{}/api/products", api_base_url()))
        .send()
        .await
        .expect("products request failed");
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_logout_invalidates_token() {
    let client = http_client();
    let email = unique_email("logout");

    assert_eq!(register(&client, &email, "password123").await.status(), 201);
    let body: Value = login(&client, &email, "password123")
        .await
        .json()
        .await
        .unwrap();
    let token = body["token"].as_str().unwrap().to_owned();

    let response = client
        .post(format!("{}/auth/logout", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("logout request failed");
    assert_eq!(response.status(), 200);

    // Same token no longer authenticates even the holding surfaces
    let response = client
        .get(format!("{}/auth/me", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("me request failed");
    assert_ne!(response.status(), 200);
}
