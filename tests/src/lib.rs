//! Both services running in-process on ephemeral ports, talking real HTTP.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;

use appointment_cell::{HttpIdentityClient, IdentityClient, SchedulingState};
use shared_database::{apply_schema, create_memory_pool, AppState};
use shared_utils::test_utils::TestConfig;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestServices {
    pub identity_url: String,
    pub scheduling_url: String,
}

async fn spawn(router: Router) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(format!("http://{}", address))
}

/// Identity Service with a seeded administrator.
pub async fn spawn_identity() -> Result<String> {
    let pool = create_memory_pool().await?;
    for schema in identity_service::SCHEMAS {
        apply_schema(&pool, schema).await?;
    }

    auth_cell::ensure_admin(&pool, ADMIN_USERNAME, ADMIN_PASSWORD)
        .await
        .context("seeding admin")?;

    let state = AppState::new(TestConfig::default().to_arc(), pool);
    spawn(identity_service::create_router(state)).await
}

/// Scheduling Service resolving everything through `identity_url`.
pub async fn spawn_scheduling(identity_url: &str) -> Result<String> {
    let pool = create_memory_pool().await?;
    apply_schema(&pool, appointment_cell::SCHEMA).await?;

    let config = TestConfig::with_identity_url(identity_url);
    let identity: Arc<dyn IdentityClient> =
        Arc::new(HttpIdentityClient::new(identity_url, Duration::from_secs(2))?);

    let state = SchedulingState::new(config.to_arc(), pool, identity);
    spawn(scheduling_service::create_router(state)).await
}

impl TestServices {
    pub async fn start() -> Result<Self> {
        let identity_url = spawn_identity().await?;
        let scheduling_url = spawn_scheduling(&identity_url).await?;

        Ok(Self {
            identity_url,
            scheduling_url,
        })
    }
}

/// Thin JSON client carrying an optional bearer token.
pub struct ApiTestClient {
    client: Client,
    base_url: String,
    pub token: Option<String>,
}

impl ApiTestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            token: None,
        }
    }

    pub fn with_token(base_url: &str, token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..Self::new(base_url)
        }
    }

    /// Log in against the Identity Service and return the issued token.
    pub async fn login(identity_url: &str, username: &str, password: &str) -> Result<String> {
        let (status, body) = Self::new(identity_url)
            .post("/auth/login", &serde_json::json!({"username": username, "password": password}))
            .await?;

        anyhow::ensure!(status == StatusCode::OK, "login for {} failed: {}", username, body);
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response without token")
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, Value)> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok((status, body))
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(self.client.get(format!("{}{}", self.base_url, path))).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        self.send(self.client.post(format!("{}{}", self.base_url, path)).json(body))
            .await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<(StatusCode, Value)> {
        self.send(self.client.put(format!("{}{}", self.base_url, path)).json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(self.client.delete(format!("{}{}", self.base_url, path))).await
    }
}
