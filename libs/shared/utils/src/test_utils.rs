use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;

use shared_config::AppConfig;
use shared_models::auth::{AuthUser, Claims, Role};

pub struct TestConfig {
    pub jwt_secret: String,
    pub database_url: String,
    pub identity_service_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            database_url: "sqlite::memory:".to_string(),
            identity_service_url: "http://localhost:5001".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_identity_url(url: &str) -> Self {
        Self {
            identity_service_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            service_name: "test-service".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
            database_url: self.database_url.clone(),
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_hours: 24,
            identity_service_url: self.identity_service_url.clone(),
            identity_timeout_secs: 2,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl TestUser {
    pub fn new(id: i64, username: &str, role: Role) -> Self {
        Self {
            id,
            username: username.to_string(),
            role,
        }
    }

    pub fn admin(id: i64) -> Self {
        Self::new(id, "admin", Role::Admin)
    }

    pub fn clinician(id: i64) -> Self {
        Self::new(id, "clinician", Role::Clinician)
    }

    pub fn front_desk(id: i64) -> Self {
        Self::new(id, "frontdesk", Role::FrontDesk)
    }

    pub fn patient(id: i64) -> Self {
        Self::new(id, "patient", Role::Patient)
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(exp_hours.unwrap_or(24))).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("HMAC can take key of any size")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

/// Request builders and body readers for driving routers with `oneshot`.
pub struct HttpTestUtils;

impl HttpTestUtils {
    pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", JwtTestUtils::bearer(token));
        }

        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("valid test request"),
            None => builder.body(Body::empty()).expect("valid test request"),
        }
    }

    pub fn get(uri: &str, token: &str) -> Request<Body> {
        Self::request(Method::GET, uri, Some(token), None)
    }

    pub fn post(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        Self::request(Method::POST, uri, token, Some(body))
    }

    pub fn put(uri: &str, token: &str, body: Value) -> Request<Body> {
        Self::request(Method::PUT, uri, Some(token), Some(body))
    }

    pub fn delete(uri: &str, token: &str) -> Request<Body> {
        Self::request(Method::DELETE, uri, Some(token), None)
    }

    /// Status plus decoded JSON body (`Null` for an empty body).
    pub async fn read_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable response body");

        if bytes.is_empty() {
            return (status, Value::Null);
        }

        (status, serde_json::from_slice(&bytes).expect("JSON response body"))
    }
}
