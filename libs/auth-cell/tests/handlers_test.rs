use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::json;
use tower::ServiceExt;

use auth_cell::{auth_routes, ensure_admin, user_admin_routes, SeedOutcome, SCHEMA};
use shared_database::{apply_schema, create_memory_pool, AppState};
use shared_models::auth::Role;
use shared_utils::jwt::validate_token;
use shared_utils::test_utils::{HttpTestUtils, JwtTestUtils, TestConfig, TestUser};

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    admin_id: i64,
}

impl TestApp {
    async fn new() -> Self {
        let pool = create_memory_pool().await.unwrap();
        apply_schema(&pool, SCHEMA).await.unwrap();

        let admin = match ensure_admin(&pool, "admin", "admin123").await.unwrap() {
            SeedOutcome::Created(user) => user,
            other => panic!("expected a fresh admin, got {:?}", other),
        };

        let state = AppState::new(TestConfig::default().to_arc(), pool);
        let router = Router::new()
            .nest("/auth", auth_routes(state.clone()))
            .nest("/admin", user_admin_routes(state.clone()));

        Self {
            router,
            state,
            admin_id: admin.id,
        }
    }

    fn token_for(&self, user: TestUser) -> String {
        JwtTestUtils::create_test_token(&user, &self.state.config.jwt_secret, Some(1))
    }

    fn admin_token(&self) -> String {
        self.token_for(TestUser::admin(self.admin_id))
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        HttpTestUtils::read_json(response).await
    }
}

#[tokio::test]
async fn test_login_issues_a_valid_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(HttpTestUtils::post(
            "/auth/login",
            None,
            json!({"username": "admin", "password": "admin123"}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");

    let token = body["token"].as_str().unwrap();
    let subject = validate_token(token, &app.state.config.jwt_secret).unwrap();
    assert_eq!(subject.id, app.admin_id);
    assert_eq!(subject.role, Role::Admin);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;

    let (wrong_password_status, wrong_password) = app
        .send(HttpTestUtils::post(
            "/auth/login",
            None,
            json!({"username": "admin", "password": "nope"}),
        ))
        .await;
    let (unknown_user_status, unknown_user) = app
        .send(HttpTestUtils::post(
            "/auth/login",
            None,
            json!({"username": "ghost", "password": "nope"}),
        ))
        .await;

    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);
    assert_eq!(wrong_password["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(HttpTestUtils::post("/auth/login", None, json!({"username": "admin"})))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_register_always_creates_patients() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(HttpTestUtils::post(
            "/auth/register",
            None,
            json!({"username": "maria", "password": "pw", "role": "admin"}),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "patient");
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = app
        .send(HttpTestUtils::post(
            "/auth/register",
            None,
            json!({"username": "maria", "password": "other"}),
        ))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_validate_returns_stored_subject() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(HttpTestUtils::get("/auth/validate", &app.admin_token()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["user"]["id"], app.admin_id);
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_validate_rejects_bad_credentials() {
    let app = TestApp::new().await;
    let secret = app.state.config.jwt_secret.clone();

    let expired = JwtTestUtils::create_expired_token(&TestUser::admin(app.admin_id), &secret);
    let forged = JwtTestUtils::create_invalid_signature_token(&TestUser::admin(app.admin_id));
    let orphan = app.token_for(TestUser::patient(999));

    for token in [expired, forged, orphan, JwtTestUtils::create_malformed_token()] {
        let (status, body) = app.send(HttpTestUtils::get("/auth/validate", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTHENTICATION_FAILED");
    }

    let request = HttpTestUtils::request(Method::GET, "/auth/validate", None, None);
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_user_is_admin_or_self() {
    let app = TestApp::new().await;

    let (_, body) = app
        .send(HttpTestUtils::post(
            "/auth/register",
            None,
            json!({"username": "maria", "password": "pw"}),
        ))
        .await;
    let maria_id = body["user"]["id"].as_i64().unwrap();
    let maria_token = app.token_for(TestUser::patient(maria_id));

    let (status, body) = app
        .send(HttpTestUtils::get(&format!("/auth/users/{}", maria_id), &maria_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "maria");

    let (status, _) = app
        .send(HttpTestUtils::get(&format!("/auth/users/{}", app.admin_id), &maria_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(HttpTestUtils::get("/auth/users/4242", &app.admin_token()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_creates_only_staff_roles() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let (status, _) = app
        .send(HttpTestUtils::post(
            "/admin/users",
            Some(&token),
            json!({"username": "doc", "password": "pw", "role": "clinician"}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(HttpTestUtils::post(
            "/admin/users",
            Some(&token),
            json!({"username": "desk", "password": "pw"}),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "front_desk");

    let (status, body) = app.send(HttpTestUtils::get("/admin/users", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_admin_routes_reject_other_roles() {
    let app = TestApp::new().await;
    let token = app.token_for(TestUser::front_desk(50));

    let (status, body) = app.send(HttpTestUtils::get("/admin/users", &token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_roles"], json!(["admin"]));
    assert_eq!(body["actual_role"], "front_desk");
}

#[tokio::test]
async fn test_admin_cannot_delete_itself() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    let (status, body) = app
        .send(HttpTestUtils::delete(&format!("/admin/users/{}", app.admin_id), &token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BUSINESS_RULE_VIOLATION");

    let (_, body) = app
        .send(HttpTestUtils::post(
            "/admin/users",
            Some(&token),
            json!({"username": "desk", "password": "pw"}),
        ))
        .await;
    let desk_id = body["user"]["id"].as_i64().unwrap();

    let (status, _) = app
        .send(HttpTestUtils::delete(&format!("/admin/users/{}", desk_id), &token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(HttpTestUtils::delete(&format!("/admin/users/{}", desk_id), &token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seeding_admin_twice_keeps_one_user() {
    let app = TestApp::new().await;

    let outcome = ensure_admin(&app.state.pool, "admin", "different").await.unwrap();
    assert_matches!(outcome, SeedOutcome::AlreadyPresent(user) if user.id == app.admin_id);

    let (_, body) = app
        .send(HttpTestUtils::get("/admin/users", &app.admin_token()))
        .await;
    assert_eq!(body["total"], 1);
}
