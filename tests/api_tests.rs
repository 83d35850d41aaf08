use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use lostdocs::api::AppState;
use lostdocs::config::Config;
use lostdocs::state::SharedState;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_NRP: &str = "87050123";
const ADMIN_PASSWORD: &str = "rahasia-admin";
const OPERATOR_PASSWORD: &str = "rahasia-operator";

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

async fn spawn_app() -> TestApp {
    let dir = std::env::temp_dir().join(format!("lostdocs-api-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", dir.join("lostdocs.db").display());
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.observability.metrics_enabled = false;

    let shared = Arc::new(
        SharedState::new(config)
            .await
            .expect("Failed to create shared state"),
    );
    let state = lostdocs::api::create_app_state(shared, None);
    let router = lostdocs::api::router(state.clone());

    TestApp { router, state, dir }
}

async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, body, _) = send_raw(app, method, uri, cookie, body).await;
    (status, body)
}

async fn send_raw(
    app: &TestApp,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json, set_cookie)
}

fn setup_payload() -> Value {
    json!({
        "header_line_1": "KEPOLISIAN NEGARA REPUBLIK INDONESIA",
        "header_line_2": "DAERAH JAWA BARAT",
        "header_line_3": "RESOR KOTA BANDUNG",
        "office_name": "Polrestabes Bandung",
        "letter_place": "Bandung",
        "number_format": "SKH/%03d/%s/%d",
        "last_number": "0",
        "timezone": "Asia/Jakarta",
        "archive_duration_days": "15",
        "admin_full_name": "Budi Santoso",
        "admin_nrp": ADMIN_NRP,
        "admin_rank": "AKP",
        "admin_password": ADMIN_PASSWORD
    })
}

async fn login(app: &TestApp, nrp: &str, password: &str) -> String {
    let (status, body, cookie) = send_raw(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "nrp": nrp, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    cookie.expect("login should set a session cookie")
}

/// Completes the setup and returns the administrator's session cookie.
async fn setup_and_login(app: &TestApp) -> String {
    let (status, _) = send(app, "POST", "/api/setup", None, Some(setup_payload())).await;
    assert_eq!(status, StatusCode::OK);
    login(app, ADMIN_NRP, ADMIN_PASSWORD).await
}

/// Creates an operator and returns its id and session cookie.
async fn create_operator(app: &TestApp, admin: &str, nrp: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/users",
        Some(admin),
        Some(json!({
            "full_name": format!("Operator {nrp}"),
            "nrp": nrp,
            "rank": "BRIPDA",
            "position": "Operator SPKT",
            "password": OPERATOR_PASSWORD
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
    let id = body["data"]["id"].as_i64().unwrap();
    (id, login(app, nrp, OPERATOR_PASSWORD).await)
}

fn document_payload(officer_id: i64, name: &str) -> Value {
    json!({
        "resident": {
            "full_name": name,
            "birth_place": "Bandung",
            "birth_date": "1990-04-12",
            "sex": "P",
            "religion": "Islam",
            "occupation": "Guru",
            "address": "Jl. Merdeka 1"
        },
        "loss_location": "Pasar Baru",
        "reporting_officer_id": officer_id,
        "items": [
            { "item_name": "KTP", "description": "NIK 3273" },
            { "item_name": "SIM C" }
        ]
    })
}

#[tokio::test]
async fn test_setup_flow() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/setup/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_setup_complete"], false);

    let mut invalid = setup_payload();
    invalid["timezone"] = json!("Mars/Olympus");
    let (status, _) = send(&app, "POST", "/api/setup", None, Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/setup", None, Some(setup_payload())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/api/setup/status", None, None).await;
    assert_eq!(body["data"]["is_setup_complete"], true);

    let (status, body) = send(&app, "POST", "/api/setup", None, Some(setup_payload())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_auth_endpoints() {
    let app = spawn_app().await;

    let (status, _) = send(&app, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/documents", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = setup_and_login(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "nrp": ADMIN_NRP, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nrp"], ADMIN_NRP);
    assert_eq!(body["data"]["role"], "SUPER_ADMIN");
    assert!(body["data"].get("password_hash").is_none());

    let (status, _) = send(&app, "POST", "/api/auth/logout", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&admin), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/auth/password",
        Some(&admin),
        Some(json!({ "current_password": "not-it-at-all", "new_password": "sandi-baru-123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/auth/password",
        Some(&admin),
        Some(json!({ "current_password": ADMIN_PASSWORD, "new_password": "sandi-baru-123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(&app, ADMIN_NRP, "sandi-baru-123").await;
}

#[tokio::test]
async fn test_document_crud() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;
    let (operator_id, operator) = create_operator(&app, &admin, "95110001").await;

    let (status, body) = send(&app, "GET", "/api/documents/next-number", Some(&operator), None).await;
    assert_eq!(status, StatusCode::OK);
    let preview = body["data"]["document_number"].as_str().unwrap().to_string();
    assert!(preview.starts_with("SKH/001/"), "unexpected preview {preview}");

    let (status, body) = send(
        &app,
        "POST",
        "/api/documents",
        Some(&operator),
        Some(document_payload(operator_id, "Siti Rahma")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    let doc = &body["data"];
    let id = doc["id"].as_i64().unwrap();
    assert_eq!(doc["document_number"], preview);
    assert_eq!(doc["status"], "DITERBITKAN");
    assert_eq!(doc["resident"]["full_name"], "Siti Rahma");
    assert_eq!(doc["items"].as_array().unwrap().len(), 2);
    assert_eq!(doc["operator"]["id"], operator_id);

    let (_, body) = send(&app, "GET", "/api/documents/next-number", Some(&operator), None).await;
    assert!(
        body["data"]["document_number"]
            .as_str()
            .unwrap()
            .starts_with("SKH/002/")
    );

    let mut edited = document_payload(operator_id, "Siti Rahma");
    edited["loss_location"] = json!("Terminal Leuwipanjang");
    edited["items"] = json!([{ "item_name": "STNK", "description": "D 1234 XY" }]);
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/documents/{id}"),
        Some(&operator),
        Some(edited),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["loss_location"], "Terminal Leuwipanjang");
    assert_eq!(body["data"]["items"][0]["item_name"], "STNK");
    assert_eq!(body["data"]["document_number"], preview);
    assert_eq!(body["data"]["last_updated_by"]["id"], operator_id);

    let (status, body) = send(&app, "GET", "/api/documents", Some(&operator), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/search?q=siti", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/search?q=%20", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/documents/{id}"),
        Some(&operator),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/documents/{id}"),
        Some(&operator),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/documents/next-number", Some(&operator), None).await;
    assert_eq!(body["data"]["document_number"], preview);
}

#[tokio::test]
async fn test_document_validation_and_filters() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;
    let (operator_id, operator) = create_operator(&app, &admin, "95110002").await;

    let mut invalid = document_payload(operator_id, "Siti Rahma");
    invalid["items"] = json!([]);
    let (status, _) = send(&app, "POST", "/api/documents", Some(&operator), Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/documents",
        Some(&operator),
        Some(document_payload(9999, "Siti Rahma")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/documents?status=deleted", Some(&operator), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/documents?status=archived", Some(&operator), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, "GET", "/api/documents/0", Some(&operator), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/documents/4242", Some(&operator), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_document_ownership() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;
    let (owner_id, owner) = create_operator(&app, &admin, "95110003").await;
    let (_, other) = create_operator(&app, &admin, "95110004").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/documents",
        Some(&owner),
        Some(document_payload(owner_id, "Asep Sunandar")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/documents/{}", body["data"]["id"]);

    let (status, _) = send(&app, "GET", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&other),
        Some(document_payload(owner_id, "Asep Sunandar")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_reject_operators() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;
    let (_, operator) = create_operator(&app, &admin, "95110005").await;

    for uri in ["/api/users", "/api/audit-logs", "/api/settings"] {
        let (status, _) = send(&app, "GET", uri, Some(&operator), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }

    let (status, _) = send(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_management() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;
    let (operator_id, operator) = create_operator(&app, &admin, "95110006").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(&admin),
        Some(json!({
            "full_name": "Duplicate",
            "nrp": "95110006",
            "password": "another-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, "GET", "/api/users/operators", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let admin_id = body["data"]["id"].as_i64().unwrap();
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{admin_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{operator_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The existing session is rejected once the account is inactive.
    let (status, _) = send(&app, "GET", "/api/auth/me", Some(&operator), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "nrp": "95110006", "password": OPERATOR_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/users/{operator_id}/activate"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(&app, "95110006", OPERATOR_PASSWORD).await;
}

#[tokio::test]
async fn test_settings_update() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;

    let (status, body) = send(&app, "GET", "/api/settings", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["office_name"], "Polrestabes Bandung");
    assert_eq!(body["data"]["archive_duration_days"], 15);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(&admin),
        Some(json!({ "archive_duration_days": "30", "letter_place": "Cimahi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["archive_duration_days"], 30);
    assert_eq!(body["data"]["letter_place"], "Cimahi");

    for invalid in [
        json!({ "is_setup_complete": "false" }),
        json!({ "backup_path": "../etc" }),
        json!({ "archive_duration_days": "-1" }),
        json!({ "unknown_key": "x" }),
    ] {
        let (status, _) = send(&app, "PUT", "/api/settings", Some(&admin), Some(invalid)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, body) = send(&app, "GET", "/api/settings", Some(&admin), None).await;
    assert_eq!(body["data"]["archive_duration_days"], 30);
}

#[tokio::test]
async fn test_dashboard_endpoints() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;
    let (operator_id, operator) = create_operator(&app, &admin, "95110007").await;

    for name in ["Siti Rahma", "Asep Sunandar"] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/documents",
            Some(&operator),
            Some(document_payload(operator_id, name)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/stats", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["docs_today"], 2);
    assert_eq!(body["data"]["docs_monthly"], 2);
    assert_eq!(body["data"]["docs_yearly"], 2);
    assert_eq!(body["data"]["active_users"], 2);

    let (status, body) = send(&app, "GET", "/api/stats/monthly-issuance", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["labels"].as_array().unwrap().len(), 12);
    let total: u64 = body["data"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_u64)
        .sum();
    assert_eq!(total, 2);

    let (status, body) = send(&app, "GET", "/api/stats/item-composition", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["labels"], json!(["KTP", "SIM C"]));
    assert_eq!(body["data"]["data"], json!([2, 2]));

    let (status, body) = send(
        &app,
        "GET",
        "/api/notifications/expiring-documents",
        Some(&operator),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        "GET",
        "/api/notifications/expiring-documents?window_days=9999",
        Some(&operator),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_audit_log_records_actions() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;
    let (operator_id, operator) = create_operator(&app, &admin, "95110008").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/documents",
        Some(&operator),
        Some(document_payload(operator_id, "Siti Rahma")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    app.state.shared.audit.flush().await;

    let (status, body) = send(&app, "GET", "/api/audit-logs", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let actions: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|entry| entry["action"].as_str())
        .collect();
    for expected in ["CREATE_USER", "LOGIN", "CREATE_DOCUMENT"] {
        assert!(actions.contains(&expected), "missing {expected} in {actions:?}");
    }
    assert_eq!(actions.first(), Some(&"CREATE_DOCUMENT"));
}

#[tokio::test]
async fn test_backup_and_restore() {
    let app = spawn_app().await;
    let admin = setup_and_login(&app).await;

    let backup_dir = app.dir.join("backups");
    let (status, _) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(&admin),
        Some(json!({ "backup_path": backup_dir.display().to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/api/backups", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK, "backup failed: {body}");
    let path = PathBuf::from(body["data"]["path"].as_str().unwrap());
    assert!(path.starts_with(&backup_dir));
    let backup = std::fs::read(&path).unwrap();
    assert!(backup.starts_with(b"SQLite format 3\0"));

    let (status, _) = upload(&app, &admin, b"definitely not a database".to_vec()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = upload(&app, &admin, backup).await;
    assert_eq!(status, StatusCode::OK, "restore failed: {body}");

    let safety_copies = std::fs::read_dir(&app.dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().contains(".before-restore-"))
        .count();
    assert_eq!(safety_copies, 1);
}

async fn upload(app: &TestApp, cookie: &str, contents: Vec<u8>) -> (StatusCode, Value) {
    let boundary = "lostdocs-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"restore.db\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(&contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/api/restore")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("{}; boundary={boundary}", mime::MULTIPART_FORM_DATA),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let app = spawn_app().await;

    let response = app
        .router
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
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().contains_key("x-request-id"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["database"], true);
}
