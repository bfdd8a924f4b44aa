use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rentas_admin::{
    AppConfig, AppState, CrudService, InMemoryRepository, RepoError, Repository,
    RepositoryState, WriteOutcome, config::SoftDeleteMode, create_router, models::Role,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

// --- Test Harness ---

fn app() -> Router {
    create_router(AppState::in_memory(AppConfig::default()))
}

/// Sends one request through the router and returns status, headers and parsed JSON body
/// (`Value::Null` when the body is empty or not JSON).
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, value)
}

// --- Tests ---

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_role_end_to_end() {
    let app = app();

    let (status, headers, created) =
        send(&app, "POST", "/api/Role", Some(json!({ "RolName": "Admin" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["RolId"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created["RolName"], "Admin");
    assert_eq!(created["IsDeleted"], false);
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        format!("/api/Role/{id}").as_str()
    );

    let (status, _, fetched) = send(&app, "GET", &format!("/api/Role/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, _, listed) = send(&app, "GET", "/api/Role", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));

    let (status, _, updated) = send(
        &app,
        "PUT",
        "/api/Role",
        Some(json!({ "RolId": id, "RolName": "Administrator", "IsDeleted": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["RolName"], "Administrator");

    let (status, _, patched) = send(&app, "PATCH", &format!("/api/Role/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched, json!(true));

    let (status, _, fetched) = send(&app, "GET", &format!("/api/Role/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["RolName"], "Administrator");
    assert_eq!(fetched["IsDeleted"], true);

    let (status, _, deleted) = send(&app, "DELETE", &format!("/api/Role/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(deleted["message"].as_str().unwrap().contains("deleted"));

    let (status, _, missing) = send(&app, "GET", &format!("/api/Role/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(missing["message"].is_string());
}

#[tokio::test]
async fn test_join_resource_patch_is_a_no_op_by_default() {
    let app = app();

    let (status, _, created) = send(
        &app,
        "POST",
        "/api/ModuleForm",
        Some(json!({ "ModuleId": 4, "FormId": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["ModuleFormId"].as_i64().unwrap();

    let (status, _, patched) = send(&app, "PATCH", &format!("/api/ModuleForm/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched, json!(true));

    let (_, _, fetched) = send(&app, "GET", &format!("/api/ModuleForm/{id}"), None).await;
    assert_eq!(fetched["IsDeleted"], false);
}

#[tokio::test]
async fn test_every_collection_is_mounted() {
    let app = app();
    for name in [
        "Role",
        "User",
        "Permission",
        "Form",
        "Module",
        "RolUser",
        "RolFormPermission",
        "ModuleForm",
    ] {
        let (status, _, body) = send(&app, "GET", &format!("/api/{name}"), None).await;
        assert_eq!(status, StatusCode::OK, "{name}");
        assert_eq!(body, json!([]), "{name}");
    }
}

#[tokio::test]
async fn test_create_with_blank_required_field_is_bad_request() {
    let app = app();

    let (status, _, body) = send(&app, "POST", "/api/User", Some(json!({ "Name": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Name"));

    let (status, _, body) = send(&app, "POST", "/api/RolUser", Some(json!({ "RolId": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_update_rejects_missing_body_and_bad_id() {
    let app = app();

    let (status, _, body) = send(&app, "PUT", "/api/Role", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _, body) = send(&app, "PUT", "/api/Role", Some(Value::Null)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _, body) = send(
        &app,
        "PUT",
        "/api/Role",
        Some(json!({ "RolId": 0, "RolName": "Admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _, body) = send(
        &app,
        "PUT",
        "/api/Role",
        Some(json!({ "RolId": 999, "RolName": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_bad_path_ids() {
    let app = app();

    let (status, _, body) = send(&app, "GET", "/api/Role/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _, body) = send(&app, "GET", "/api/Permission/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _, _) = send(&app, "PATCH", "/api/Form/-3", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, "DELETE", "/api/Module/x1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_rows_are_not_found() {
    let app = app();

    let (status, _, body) = send(&app, "GET", "/api/Form/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Form with id 42 not found");

    let (status, _, body) = send(&app, "PATCH", "/api/Form/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let (status, _, body) = send(&app, "DELETE", "/api/Form/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Form 42 not found or already deleted");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// --- Storage failure surfaces as 500 ---

struct UnreachableRoles;

#[async_trait]
impl Repository<Role> for UnreachableRoles {
    async fn list(&self) -> Result<Vec<Role>, RepoError> {
        Err(RepoError::Unavailable)
    }
    async fn get_by_id(&self, _id: i32) -> Result<Option<Role>, RepoError> {
        Err(RepoError::Unavailable)
    }
    async fn create(&self, _record: Role) -> Result<Role, RepoError> {
        Err(RepoError::Unavailable)
    }
    async fn update(&self, _record: Role) -> Result<WriteOutcome, RepoError> {
        Err(RepoError::Unavailable)
    }
    async fn soft_delete(&self, _id: i32) -> Result<WriteOutcome, RepoError> {
        Err(RepoError::Unavailable)
    }
    async fn delete(&self, _id: i32) -> Result<WriteOutcome, RepoError> {
        Err(RepoError::Unavailable)
    }
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let mut state = AppState::in_memory(AppConfig::default());
    let repo: RepositoryState<Role> = Arc::new(UnreachableRoles);
    state.services.roles = CrudService::new(repo, SoftDeleteMode::Flag);
    let app = create_router(state);

    let (status, _, body) = send(&app, "GET", "/api/Role", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error retrieving the Role list");

    let (status, _, body) = send(&app, "POST", "/api/Role", Some(json!({ "RolName": "Admin" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["message"].as_str().unwrap().contains("database"));

    // Other resources keep working.
    let (status, _, _) = send(&app, "GET", "/api/User", None).await;
    assert_eq!(status, StatusCode::OK);
}

/// Role storage that can be read and inserted into but rejects every other write.
struct ReadOnlyRoles {
    inner: InMemoryRepository<Role>,
}

#[async_trait]
impl Repository<Role> for ReadOnlyRoles {
    async fn list(&self) -> Result<Vec<Role>, RepoError> {
        self.inner.list().await
    }
    async fn get_by_id(&self, id: i32) -> Result<Option<Role>, RepoError> {
        self.inner.get_by_id(id).await
    }
    async fn create(&self, record: Role) -> Result<Role, RepoError> {
        self.inner.create(record).await
    }
    async fn update(&self, _record: Role) -> Result<WriteOutcome, RepoError> {
        Err(RepoError::Unavailable)
    }
    async fn soft_delete(&self, _id: i32) -> Result<WriteOutcome, RepoError> {
        Err(RepoError::Unavailable)
    }
    async fn delete(&self, _id: i32) -> Result<WriteOutcome, RepoError> {
        Err(RepoError::Unavailable)
    }
}

#[tokio::test]
async fn test_failed_writes_on_existing_rows_are_internal_errors() {
    let mut state = AppState::in_memory(AppConfig::default());
    let repo: RepositoryState<Role> = Arc::new(ReadOnlyRoles {
        inner: InMemoryRepository::new(),
    });
    state.services.roles = CrudService::new(repo, SoftDeleteMode::Flag);
    let app = create_router(state);

    let (status, _, created) =
        send(&app, "POST", "/api/Role", Some(json!({ "RolName": "Admin" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["RolId"].as_i64().unwrap();

    let (status, _, body) = send(
        &app,
        "PUT",
        "/api/Role",
        Some(json!({ "RolId": id, "RolName": "Root" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], format!("Error updating Role with id {id}"));

    let (status, _, _) = send(&app, "PATCH", &format!("/api/Role/{id}"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _, body) = send(&app, "DELETE", &format!("/api/Role/{id}"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], format!("Error deleting Role with id {id}"));

    let (status, _, fetched) = send(&app, "GET", &format!("/api/Role/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["RolName"], "Admin");
}

#[tokio::test]
async fn test_put_cannot_flip_flag_of_noop_join() {
    let app = app();

    let (_, _, created) = send(
        &app,
        "POST",
        "/api/RolUser",
        Some(json!({ "RolId": 1, "UserId": 2 })),
    )
    .await;
    let id = created["RolUserId"].as_i64().unwrap();

    let (status, _, updated) = send(
        &app,
        "PUT",
        "/api/RolUser",
        Some(json!({ "RolUserId": id, "RolId": 3, "UserId": 2, "IsDeleted": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["RolId"], 3);
    assert_eq!(updated["IsDeleted"], false);

    let (_, _, fetched) = send(&app, "GET", &format!("/api/RolUser/{id}"), None).await;
    assert_eq!(fetched, updated);
}
