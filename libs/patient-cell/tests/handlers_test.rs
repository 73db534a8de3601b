use std::sync::Arc;

use axum::{body::Body, http::{Request, StatusCode}, Router};
use serde_json::json;
use tower::ServiceExt;

use patient_cell::patient_routes;
use shared_database::{apply_schema, create_memory_pool, AppState};
use shared_utils::test_utils::{HttpTestUtils, JwtTestUtils, TestConfig, TestUser};

struct Harness {
    router: Router,
    state: Arc<AppState>,
}

impl Harness {
    async fn new() -> Self {
        let pool = create_memory_pool().await.unwrap();
        apply_schema(&pool, auth_cell::SCHEMA).await.unwrap();
        apply_schema(&pool, patient_cell::SCHEMA).await.unwrap();

        let state = AppState::new(TestConfig::default().to_arc(), pool);
        Self {
            router: Router::new().nest("/admin", patient_routes(state.clone())),
            state,
        }
    }

    fn token(&self, user: TestUser) -> String {
        JwtTestUtils::create_test_token(&user, &self.state.config.jwt_secret, Some(1))
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        HttpTestUtils::read_json(response).await
    }

    async fn create(&self, token: &str, body: serde_json::Value) -> i64 {
        let (status, body) = self
            .send(HttpTestUtils::post("/admin/patients", Some(token), body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["patient"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_front_desk_registers_active_patient() {
    let h = Harness::new().await;
    let front_desk = h.token(TestUser::front_desk(4));

    let id = h
        .create(&front_desk, json!({"name": "Lucia Perez", "phone": "600123123"}))
        .await;

    let (status, body) = h
        .send(HttpTestUtils::get(&format!("/admin/patients/{}", id), &front_desk))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["phone"], "600123123");
}

#[tokio::test]
async fn test_create_with_credentials_links_patient_account() {
    let h = Harness::new().await;
    let admin = h.token(TestUser::admin(1));

    let id = h
        .create(&admin, json!({"name": "Lucia", "username": "lucia", "password": "pw"}))
        .await;

    let (_, body) = h
        .send(HttpTestUtils::get(&format!("/admin/patients/{}", id), &admin))
        .await;
    let user_id = body["user_id"].as_i64().unwrap();

    let role: String = sqlx::query_scalar("SELECT role FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&h.state.pool)
        .await
        .unwrap();
    assert_eq!(role, "patient");
}

#[tokio::test]
async fn test_status_accepts_only_known_values() {
    let h = Harness::new().await;
    let admin = h.token(TestUser::admin(1));
    let id = h.create(&admin, json!({"name": "Lucia"})).await;
    let uri = format!("/admin/patients/{}", id);

    let (status, body) = h
        .send(HttpTestUtils::put(&uri, &admin, json!({"status": "ARCHIVED"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");

    let (status, body) = h
        .send(HttpTestUtils::put(&uri, &admin, json!({"status": "inactive"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["patient"]["status"], "INACTIVE");
    assert_eq!(body["patient"]["name"], "Lucia");

    let (status, _) = h
        .send(HttpTestUtils::post(
            "/admin/patients",
            Some(&admin),
            json!({"name": "Pablo", "status": "SLEEPING"}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_admin_deletes_patients() {
    let h = Harness::new().await;
    let admin = h.token(TestUser::admin(1));
    let front_desk = h.token(TestUser::front_desk(4));
    let id = h.create(&front_desk, json!({"name": "Lucia"})).await;
    let uri = format!("/admin/patients/{}", id);

    let (status, body) = h.send(HttpTestUtils::delete(&uri, &front_desk)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_roles"], json!(["admin"]));

    let (status, _) = h.send(HttpTestUtils::delete(&uri, &admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = h.send(HttpTestUtils::get(&uri, &admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patients_cannot_write() {
    let h = Harness::new().await;
    let patient = h.token(TestUser::patient(9));

    let (status, body) = h
        .send(HttpTestUtils::post("/admin/patients", Some(&patient), json!({"name": "X"})))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required_roles"], json!(["admin", "front_desk"]));
    assert_eq!(body["actual_role"], "patient");
}

#[tokio::test]
async fn test_list_reports_total() {
    let h = Harness::new().await;
    let admin = h.token(TestUser::admin(1));
    h.create(&admin, json!({"name": "A"})).await;
    h.create(&admin, json!({"name": "B", "status": "INACTIVE"})).await;

    let (status, body) = h
        .send(HttpTestUtils::get("/admin/patients", &h.token(TestUser::clinician(2))))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["patients"][1]["status"], "INACTIVE");
}
