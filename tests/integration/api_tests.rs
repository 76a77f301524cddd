//! API integration tests
//!
//! Need a running server with the admin account seeded by `create-admin`.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:5000/api";

fn admin_credentials() -> (String, String) {
    (
        std::env::var("LIBRARY_ADMIN__EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
        std::env::var("LIBRARY_ADMIN__PASSWORD").unwrap_or_else(|_| "change-me".to_string()),
    )
}

fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}@example.com", prefix, nanos)
}

async fn login(client: &Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request")
}

/// Helper to get an admin token
async fn admin_token(client: &Client) -> String {
    let (email, password) = admin_credentials();
    let body: Value = login(client, &email, &password)
        .await
        .json()
        .await
        .expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Register a user, approve it as admin and return (user id, token)
async fn approved_user(client: &Client, admin: &str, prefix: &str) -> (i64, String) {
    let email = unique_email(prefix);
    let body: Value = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "phoneNumber": "01010101010",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to register")
        .json()
        .await
        .expect("Failed to parse register response");
    let user_id = body["userId"].as_i64().expect("No userId in response");

    let response = client
        .put(format!("{}/users/{}/approve", BASE_URL, user_id))
        .header("x-auth-token", admin)
        .send()
        .await
        .expect("Failed to approve user");
    assert!(response.status().is_success());

    let body: Value = login(client, &email, "password123")
        .await
        .json()
        .await
        .expect("Failed to parse login response");
    (user_id, body["token"].as_str().expect("No token").to_string())
}

async fn create_book(client: &Client, admin: &str) -> i64 {
    let body: Value = client
        .post(format!("{}/books", BASE_URL))
        .header("x-auth-token", admin)
        .json(&json!({
            "title": "Test Book",
            "author": "Test Author",
            "publicationDate": "2023-01-01",
            "description": "Test Description"
        }))
        .send()
        .await
        .expect("Failed to create book")
        .json()
        .await
        .expect("Failed to parse book");
    body["id"].as_i64().expect("No book id")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_unapproved_user_cannot_log_in_until_approved() {
    let client = Client::new();
    let email = unique_email("pending");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "phoneNumber": "01010101010",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    let user_id = body["userId"].as_i64().expect("No userId");

    let response = login(&client, &email, "password123").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Your account is pending approval");

    let admin = admin_token(&client).await;
    let response = client
        .put(format!("{}/users/approve/{}", BASE_URL, user_id))
        .header("x-auth-token", &admin)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = login(&client, &email, "password123").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = login(&client, "nonexistent@example.com", "wrongpassword").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_reservation_lifecycle() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (user_id, token) = approved_user(&client, &admin, "reader").await;
    let (_, other_token) = approved_user(&client, &admin, "other").await;
    let book_id = create_book(&client, &admin).await;

    // Create
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("x-auth-token", &token)
        .json(&json!({ "bookId": book_id, "startDate": "2024-04-01", "endDate": "2024-04-15" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["user"].as_i64(), Some(user_id));
    let reservation_id = body["id"].as_i64().expect("No reservation id");

    // Owner cannot approve
    let response = client
        .put(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .header("x-auth-token", &token)
        .json(&json!({ "status": "approved" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin approves
    let response = client
        .put(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .header("x-auth-token", &admin)
        .json(&json!({ "status": "approved" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "approved");
    let start = chrono::DateTime::parse_from_rfc3339(body["startDate"].as_str().unwrap()).unwrap();
    let end = chrono::DateTime::parse_from_rfc3339(body["endDate"].as_str().unwrap()).unwrap();
    assert_eq!(end - start, chrono::Duration::days(2));

    // Owner sees populated details, another user is refused
    let response = client
        .get(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .header("x-auth-token", &token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["book"]["title"], "Test Book");

    let response = client
        .get(format!("{}/reservations/{}", BASE_URL, reservation_id))
        .header("x-auth-token", &other_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner was notified
    let response = client
        .get(format!("{}/notifications", BASE_URL))
        .header("x-auth-token", &token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body
        .as_array()
        .expect("Expected an array")
        .iter()
        .any(|n| n["reservation"].as_i64() == Some(reservation_id)));
}

#[tokio::test]
#[ignore]
async fn test_reservation_for_missing_book() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, token) = approved_user(&client, &admin, "missing-book").await;

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .header("x-auth-token", &token)
        .json(&json!({ "bookId": 999999 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
