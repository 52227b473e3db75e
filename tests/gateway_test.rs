//! End-to-end tests for the HTTP surface: provider login, the bearer gate,
//! refresh rotation, and logout, driven through the full router.

use authgate::config::database::Database;
use authgate::dto::token_dto::TokenPairDto;
use authgate::entity::user::{AuthProvider, User, UserRole};
use authgate::response::app_response::SuccessResponse;
use authgate::routes;
use authgate::service::rotation_service::{RotationConfig, RotationService, RotationServiceTrait};
use authgate::service::token_service::{TokenConfig, TokenService, TokenServiceTrait};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";

fn token_service(secret: &str, ttl_minutes: i64) -> TokenService {
    TokenService::new(TokenConfig {
        secret: secret.to_string(),
        ttl_minutes,
        leeway_seconds: 0,
    })
    .unwrap()
}

async fn app() -> Router {
    let db = Arc::new(Database::init_with("sqlite::memory:", 1).await.unwrap());
    let service = token_service(TEST_SECRET, 10);
    let rotation = RotationService::new(
        &db,
        service.clone(),
        RotationConfig {
            refresh_token_ttl_days: 30,
            purge_retention_days: 30,
        },
    );
    routes::root::routes(db, service, rotation)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bearer_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn login(app: &Router, provider: &str, email: &str) -> TokenPairDto {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/auth/callback/{}", provider),
            json!({
                "email": email,
                "firstname": "Alice",
                "lastname": "Smith",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed: SuccessResponse<TokenPairDto> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    parsed.data
}

#[tokio::test]
async fn first_login_provisions_user_with_defaults() {
    let app = app().await;

    let pair = login(&app, "google", "alice@example.com").await;

    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert!(pair.refresh_expire_at > Utc::now());
    assert_eq!(pair.user.email, "alice@example.com");
    assert_eq!(pair.user.role, UserRole::Regular);
    assert_eq!(pair.user.auth_type, AuthProvider::Google);
}

#[tokio::test]
async fn repeat_login_reuses_account() {
    let app = app().await;

    let first = login(&app, "google", "alice@example.com").await;
    let second = login(&app, "google", "alice@example.com").await;

    assert_eq!(first.user.id, second.user.id);
    // A fresh session means fresh credentials.
    assert_ne!(first.refresh_token, second.refresh_token);
}

#[tokio::test]
async fn redirect_callback_accepts_query_string() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/callback/linkedin?email=bob%40example.com&firstname=Bob&lastname=Stone")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let parsed: SuccessResponse<TokenPairDto> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(parsed.data.user.auth_type, AuthProvider::Linkedin);
}

#[tokio::test]
async fn unknown_provider_rejected() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/callback/github",
            json!({
                "email": "alice@example.com",
                "firstname": "Alice",
                "lastname": "Smith",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn email_slug_is_not_a_provider() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/callback/email",
            json!({
                "email": "alice@example.com",
                "firstname": "Alice",
                "lastname": "Smith",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn conflicting_provider_is_rejected() {
    let app = app().await;

    let first = login(&app, "google", "alice@example.com").await;

    // Same address arriving via a different provider must not merge into or
    // take over the existing account.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/callback/microsoft",
            json!({
                "email": "alice@example.com",
                "firstname": "Alice",
                "lastname": "Smith",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The account is untouched: the original provider still signs in.
    let again = login(&app, "google", "alice@example.com").await;
    assert_eq!(again.user.id, first.user.id);
    assert_eq!(again.user.auth_type, AuthProvider::Google);
}

#[tokio::test]
async fn access_gate_answers_every_failure_identically() {
    let app = app().await;

    let user = sample_user();
    let expired = token_service(TEST_SECRET, -1).issue(&user).unwrap().token;
    let foreign = token_service("ffffffffffffffffffffffffffffffff", 10)
        .issue(&user)
        .unwrap()
        .token;
    let tampered = flip_last_char(&token_service(TEST_SECRET, 10).issue(&user).unwrap().token);

    let no_header = Request::builder()
        .uri("/api/profile")
        .body(Body::empty())
        .unwrap();
    let failures = vec![
        app.clone().oneshot(no_header).await.unwrap(),
        app.clone()
            .oneshot(bearer_request("/api/profile", ""))
            .await
            .unwrap(),
        app.clone()
            .oneshot(bearer_request("/api/profile", "not-a-token"))
            .await
            .unwrap(),
        app.clone()
            .oneshot(bearer_request("/api/profile", &expired))
            .await
            .unwrap(),
        app.clone()
            .oneshot(bearer_request("/api/profile", &foreign))
            .await
            .unwrap(),
        app.clone()
            .oneshot(bearer_request("/api/profile", &tampered))
            .await
            .unwrap(),
    ];

    let mut bodies = Vec::new();
    for response in failures {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(body_bytes(response).await);
    }

    // Missing, malformed, expired, forged, and tampered tokens are
    // indistinguishable from the outside.
    for body in &bodies[1..] {
        assert_eq!(body, &bodies[0]);
    }
}

/// Rewrites the final character of a signed token, leaving a structurally
/// valid JWT whose signature no longer matches.
fn flip_last_char(token: &str) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    let last = chars.last_mut().unwrap();
    *last = if *last == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

#[tokio::test]
async fn valid_token_passes_the_gate() {
    let app = app().await;
    let pair = login(&app, "google", "alice@example.com").await;

    let response = app
        .clone()
        .oneshot(bearer_request("/api/profile", &pair.access_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let profile: serde_json::Value =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(profile["data"]["id"], json!(pair.user.id));
    assert_eq!(profile["data"]["email"], json!("alice@example.com"));
    assert_eq!(profile["data"]["role"], json!("regular"));
}

#[tokio::test]
async fn refresh_endpoint_rotates_the_session() {
    let app = app().await;
    let pair = login(&app, "google", "alice@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            json!({ "refresh_token": pair.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let rotated: SuccessResponse<TokenPairDto> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_ne!(rotated.data.refresh_token, pair.refresh_token);
    assert_eq!(rotated.data.user.id, pair.user.id);

    // The consumed token is dead.
    let replay = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            json!({ "refresh_token": pair.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = app().await;
    let pair = login(&app, "google", "alice@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/logout",
            json!({ "refresh_token": pair.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The revoked token can no longer be exchanged.
    let refresh = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            json!({ "refresh_token": pair.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);

    // Logging out twice is rejected the same way.
    let again = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/logout",
            json!({ "refresh_token": pair.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_callback_payload_is_a_validation_error() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/callback/google",
            json!({
                "email": "not-an-email",
                "firstname": "Alice",
                "lastname": "Smith",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["errors"][0]["field"], json!("email"));
}

#[tokio::test]
async fn malformed_callback_query_gets_the_json_envelope() {
    let app = app().await;

    // A query string missing required fields is rejected before the handler
    // runs, and the rejection wears the standard error envelope.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/callback/google?firstname=Ada")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].is_string());

    // Validator rules apply to query payloads exactly as to JSON bodies.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/callback/google?email=not-an-email&firstname=Ada&lastname=Lovelace")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["errors"][0]["field"], json!("email"));
}

#[tokio::test]
async fn health_endpoint_reports_status() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["data"]["status"], json!("healthy"));
}

#[tokio::test]
async fn full_session_lifecycle() {
    let app = app().await;

    // Sign in and prove the access token works.
    let pair = login(&app, "google", "alice@example.com").await;
    let ok = app
        .clone()
        .oneshot(bearer_request("/api/profile", &pair.access_token))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    // An access token minted already expired is turned away at the gate.
    let stale = token_service(TEST_SECRET, -1)
        .issue(&sample_user())
        .unwrap()
        .token;
    let denied = app
        .clone()
        .oneshot(bearer_request("/api/profile", &stale))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    // Rotation hands back a working pair.
    let rotate = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            json!({ "refresh_token": pair.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(rotate.status(), StatusCode::OK);
    let rotated: SuccessResponse<TokenPairDto> =
        serde_json::from_slice(&body_bytes(rotate).await).unwrap();

    let ok = app
        .clone()
        .oneshot(bearer_request("/api/profile", &rotated.data.access_token))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    // The pre-rotation refresh token is gone for good.
    let replay = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            json!({ "refresh_token": pair.refresh_token }),
        ))
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

fn sample_user() -> User {
    let now = Utc::now();
    User {
        id: uuid::Uuid::now_v7().to_string(),
        email: "ghost@example.com".to_string(),
        firstname: "Ghost".to_string(),
        lastname: "User".to_string(),
        role: UserRole::Regular,
        auth_type: AuthProvider::Google,
        created_at: now,
        updated_at: now,
    }
}
