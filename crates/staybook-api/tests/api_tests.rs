//! API Integration Tests
//!
//! Every test runs against the in-memory store, so no database is needed.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use staybook_api::auth::CreateUserRequest;
use staybook_api::state::AppState;
use staybook_api::{create_router, create_router_for_testing, create_test_state};
use tower::ServiceExt;

/// Helper to create a test request
fn create_json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    match body {
        Some(json_body) => builder
            .body(Body::from(serde_json::to_string(&json_body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Same as [`create_json_request`] with a bearer token attached
fn create_authed_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let mut request = create_json_request(method, uri, body);
    request.headers_mut().insert(
        "Authorization",
        format!("Bearer {token}").parse().unwrap(),
    );
    request
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn test_app() -> (Router, Arc<AppState>) {
    let state = create_test_state();
    (create_router(state.clone()), state)
}

async fn register(app: &Router, username: &str, email: &str) -> Value {
    let (status, body) = send(
        app,
        create_json_request(
            "POST",
            "/auth/register",
            Some(json!({ "username": username, "email": email, "password": "password123" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        create_json_request(
            "POST",
            "/auth/login",
            Some(json!({ "email": email, "password": password })),
        ),
    )
    .await
}

async fn access_token(app: &Router, email: &str) -> String {
    let (status, body) = login(app, email, "password123").await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["access_token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &Router, state: &AppState) -> String {
    state
        .auth
        .create_user(CreateUserRequest {
            username: "admin".to_string(),
            email: "admin@staybook.test".to_string(),
            password: "password123".to_string(),
            is_admin: true,
        })
        .await
        .unwrap();
    access_token(app, "admin@staybook.test").await
}

fn sample_hotel() -> Value {
    json!({
        "name": "Harbor View",
        "description": "Rooms over the water",
        "address": "1 Pier Road",
        "rating": 4.5,
        "rooms": [
            { "size": 2, "price": 100.0, "description": "Double", "facilities": ["WiFi", "TV"] },
            { "size": 4, "price": 180.0, "description": "Family", "available": false, "facilities": [] }
        ]
    })
}

/// Creates the sample hotel as admin; returns (hotel id, available room id, unavailable room id)
async fn create_sample_hotel(app: &Router, admin: &str) -> (String, String, String) {
    let (status, body) = send(
        app,
        create_authed_request("POST", "/hotels", admin, Some(sample_hotel())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create hotel failed: {body}");

    let hotel = &body["data"];
    let rooms = hotel["rooms"].as_array().unwrap();
    let room_id = |available: bool| {
        rooms
            .iter()
            .find(|r| r["available"] == available)
            .map(|r| r["id"].as_str().unwrap().to_string())
            .unwrap()
    };
    (
        hotel["id"].as_str().unwrap().to_string(),
        room_id(true),
        room_id(false),
    )
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let app = create_router_for_testing();

    let (status, json) = send(&app, create_json_request("GET", "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["auth_configured"], true);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = create_router_for_testing();

    let (status, json) = send(&app, create_json_request("GET", "/api-docs/openapi.json", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/bookings"].is_object());
}

#[tokio::test]
async fn test_unknown_route_returns_envelope() {
    let app = create_router_for_testing();

    let (status, json) = send(&app, create_json_request("GET", "/nowhere", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["path"], "/nowhere");
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[tokio::test]
async fn test_register_returns_user_without_hash() {
    let app = create_router_for_testing();

    let body = register(&app, "alice", "alice@example.com").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["status"], 200);
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["path"], "/auth/register");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["is_admin"], false);
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = create_router_for_testing();
    register(&app, "alice", "alice@example.com").await;

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/auth/register",
            Some(json!({ "username": "alice2", "email": "alice@example.com", "password": "password123" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "DUPLICATE_ENTRY");
}

#[tokio::test]
async fn test_register_invalid_input() {
    let app = create_router_for_testing();

    let (status, json) = send(
        &app,
        create_json_request(
            "POST",
            "/auth/register",
            Some(json!({ "username": "bob", "email": "not-an-email", "password": "short" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = create_router_for_testing();

    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, json) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["path"], "/auth/register");
}

#[tokio::test]
async fn test_login_issues_token_pair() {
    let app = create_router_for_testing();
    register(&app, "alice", "alice@example.com").await;

    let (status, json) = login(&app, "alice@example.com", "password123").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
    assert_ne!(json["data"]["access_token"], json["data"]["refresh_token"]);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_router_for_testing();
    register(&app, "alice", "alice@example.com").await;

    let (status, json) = login(&app, "alice@example.com", "wrong-password").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "invalid password");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = create_router_for_testing();

    let (status, json) = login(&app, "ghost@example.com", "password123").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = create_router_for_testing();
    register(&app, "alice", "alice@example.com").await;
    let (_, json) = login(&app, "alice@example.com", "password123").await;
    let refresh = json["data"]["refresh_token"].as_str().unwrap();

    let (status, json) = send(
        &app,
        create_json_request("POST", "/auth/refresh", Some(json!({ "refresh_token": refresh }))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["access_token"].is_string());
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = create_router_for_testing();
    register(&app, "alice", "alice@example.com").await;
    let access = access_token(&app, "alice@example.com").await;

    let (status, _) = send(
        &app,
        create_json_request("POST", "/auth/refresh", Some(json!({ "refresh_token": access }))),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Access Control Tests
// =============================================================================

#[tokio::test]
async fn test_booking_requires_login() {
    let app = create_router_for_testing();

    let (status, json) = send(&app, create_json_request("POST", "/bookings", Some(json!({})))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["path"], "/bookings");
}

#[tokio::test]
async fn test_booking_rejects_garbage_token() {
    let app = create_router_for_testing();

    let (status, _) = send(
        &app,
        create_authed_request("POST", "/bookings", "not.a.token", Some(json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_booking_rejects_refresh_token() {
    let app = create_router_for_testing();
    register(&app, "alice", "alice@example.com").await;
    let (_, json) = login(&app, "alice@example.com", "password123").await;
    let refresh = json["data"]["refresh_token"].as_str().unwrap();

    let (status, _) = send(
        &app,
        create_authed_request("POST", "/bookings", refresh, Some(json!({}))),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_hotel_requires_admin() {
    let app = create_router_for_testing();
    register(&app, "alice", "alice@example.com").await;
    let token = access_token(&app, "alice@example.com").await;

    let (status, json) = send(
        &app,
        create_authed_request("POST", "/hotels", &token, Some(sample_hotel())),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_create_hotel_without_token() {
    let app = create_router_for_testing();

    let (status, _) = send(&app, create_json_request("POST", "/hotels", Some(sample_hotel()))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_reads_need_no_token() {
    let app = create_router_for_testing();

    for uri in ["/hotels", "/bookings", "/users"] {
        let (status, json) = send(&app, create_json_request("GET", uri, None)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(json["data"].is_array(), "{uri}");
    }
}

// =============================================================================
// Hotel Tests
// =============================================================================

#[tokio::test]
async fn test_admin_creates_and_fetches_hotel() {
    let (app, state) = test_app();
    let admin = admin_token(&app, &state).await;
    let (hotel_id, _, _) = create_sample_hotel(&app, &admin).await;

    let (status, json) = send(&app, create_json_request("GET", &format!("/hotels/{hotel_id}"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Harbor View");
    assert_eq!(json["data"]["rooms"].as_array().unwrap().len(), 2);

    let (_, json) = send(&app, create_json_request("GET", "/hotels", None)).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_hotel_bad_id() {
    let app = create_router_for_testing();

    let (status, json) = send(&app, create_json_request("GET", "/hotels/not-a-uuid", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_hotel_unknown_id() {
    let app = create_router_for_testing();

    let (status, json) = send(
        &app,
        create_json_request("GET", "/hotels/00000000-0000-0000-0000-000000000000", None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["path"], "/hotels/00000000-0000-0000-0000-000000000000");
}

// =============================================================================
// Booking Tests
// =============================================================================

#[tokio::test]
async fn test_booking_flow() {
    let (app, state) = test_app();
    let admin = admin_token(&app, &state).await;
    let (hotel_id, room_id, _) = create_sample_hotel(&app, &admin).await;

    let user = register(&app, "alice", "alice@example.com").await;
    let user_id = user["data"]["id"].as_str().unwrap().to_string();
    let token = access_token(&app, "alice@example.com").await;

    let (status, json) = send(
        &app,
        create_authed_request(
            "POST",
            "/bookings",
            &token,
            Some(json!({
                "hotel_id": hotel_id,
                "room_id": room_id,
                "check_in_date": "2026-07-01T14:00:00Z",
                "check_out_date": "2026-07-04T14:00:00Z"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["status"], 201);
    assert_eq!(json["data"]["user_id"], user_id.as_str());
    assert_eq!(json["data"]["total_price"], 300.0);
    assert_eq!(json["data"]["is_cancelled"], false);
    let booking_id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = send(&app, create_json_request("GET", &format!("/bookings/{booking_id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["room_id"], room_id.as_str());

    let (_, json) = send(
        &app,
        create_json_request("GET", &format!("/bookings/user/{user_id}"), None),
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_booking_unavailable_room() {
    let (app, state) = test_app();
    let admin = admin_token(&app, &state).await;
    let (hotel_id, _, taken_room) = create_sample_hotel(&app, &admin).await;

    let (status, json) = send(
        &app,
        create_authed_request(
            "POST",
            "/bookings",
            &admin,
            Some(json!({
                "hotel_id": hotel_id,
                "room_id": taken_room,
                "check_in_date": "2026-07-01T14:00:00Z",
                "check_out_date": "2026-07-02T14:00:00Z"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "ROOM_UNAVAILABLE");
}

#[tokio::test]
async fn test_booking_reversed_dates() {
    let (app, state) = test_app();
    let admin = admin_token(&app, &state).await;
    let (hotel_id, room_id, _) = create_sample_hotel(&app, &admin).await;

    let (status, json) = send(
        &app,
        create_authed_request(
            "POST",
            "/bookings",
            &admin,
            Some(json!({
                "hotel_id": hotel_id,
                "room_id": room_id,
                "check_in_date": "2026-07-04T14:00:00Z",
                "check_out_date": "2026-07-01T14:00:00Z"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_booking_unknown_room() {
    let (app, state) = test_app();
    let admin = admin_token(&app, &state).await;
    let (hotel_id, _, _) = create_sample_hotel(&app, &admin).await;

    let (status, json) = send(
        &app,
        create_authed_request(
            "POST",
            "/bookings",
            &admin,
            Some(json!({
                "hotel_id": hotel_id,
                "room_id": "00000000-0000-0000-0000-000000000000",
                "check_in_date": "2026-07-01T14:00:00Z",
                "check_out_date": "2026-07-02T14:00:00Z"
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "ROOM_NOT_FOUND");
}

// =============================================================================
// User Administration Tests
// =============================================================================

#[tokio::test]
async fn test_admin_creates_admin_user() {
    let (app, state) = test_app();
    let admin = admin_token(&app, &state).await;

    let (status, json) = send(
        &app,
        create_authed_request(
            "POST",
            "/users",
            &admin,
            Some(json!({
                "username": "ops",
                "email": "ops@staybook.test",
                "password": "password123",
                "is_admin": true
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["is_admin"], true);
    let id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, json) = send(&app, create_json_request("GET", &format!("/users/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["username"], "ops");

    let (_, json) = send(&app, create_json_request("GET", "/users", None)).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_regular_user_cannot_create_users() {
    let app = create_router_for_testing();
    register(&app, "alice", "alice@example.com").await;
    let token = access_token(&app, "alice@example.com").await;

    let (status, _) = send(
        &app,
        create_authed_request(
            "POST",
            "/users",
            &token,
            Some(json!({ "username": "mallory", "email": "m@example.com", "password": "password123", "is_admin": true })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
