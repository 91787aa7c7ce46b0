use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::collections::HashMap;
use ticketdesk::bootstrap;
use ticketdesk::config::Config;
use ticketdesk::infrastructure::http::router::{build_router, RouterSettings};
use tower::ServiceExt;
use uuid::Uuid;

mod helpers;
use helpers::*;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password-1";

struct TestApp {
    router: Router,
    attachment_dir: String,
    _db: TestDatabase,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.attachment_dir);
    }
}

async fn setup_app() -> TestApp {
    let test_db = setup_test_db().await;
    let attachment_dir = format!("test_attachments_{}", Uuid::new_v4());

    let env: HashMap<&str, String> = HashMap::from([
        ("ADMIN_EMAIL", ADMIN_EMAIL.to_string()),
        ("ADMIN_PASSWORD", ADMIN_PASSWORD.to_string()),
        ("ATTACHMENT_STORAGE_PATH", attachment_dir.clone()),
    ]);
    let config = Config::from_lookup(|key| env.get(key).cloned()).unwrap();

    let state = bootstrap::build_app_state(test_db.db().clone(), &config)
        .await
        .unwrap();
    bootstrap::initialize_admin(&state.user_service, &config)
        .await
        .unwrap();
    // Second run is a no-op
    bootstrap::initialize_admin(&state.user_service, &config)
        .await
        .unwrap();

    TestApp {
        router: build_router(state, &RouterSettings::from(&config)),
        attachment_dir,
        _db: test_db,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(app: &TestApp) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_app().await;
    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = setup_app().await;

    let (status, body) = send(&app, get("/api/tickets", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, get("/api/tickets", Some("not-a-session"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/api/stats/mine", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let app = setup_app().await;
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": "wrong-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ticket_flow_over_http() {
    let app = setup_app().await;
    let token = login(&app).await;

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            "/api/tickets",
            Some(&token),
            json!({
                "ticketId": "H-1",
                "department": "IT",
                "type": "access",
                "description": "Cannot log in to the VPN"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["ticketId"], "H-1");
    assert_eq!(created["status"], "open");
    assert_eq!(created["accepted"], false);
    assert_eq!(created["creator"]["email"], ADMIN_EMAIL);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/tickets",
            Some(&token),
            json!({ "ticketId": "H-1", "description": "duplicate" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, listed) = send(&app, get("/api/tickets?status=open", Some(&token))).await;
    assert_eq!(status, StatusCode::OK, "{}", listed);
    let listed = listed["tickets"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["ticketId"], "H-1");
    assert_eq!(listed[0]["creator"]["email"], ADMIN_EMAIL);
    assert!(listed[0]["assignedTo"].is_null());
    assert!(listed[0]["assignee"].is_null());

    let (status, accepted) = send(
        &app,
        json_request("POST", "/api/tickets/H-1/accept", Some(&token), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", accepted);
    assert_eq!(accepted["status"], "in-progress");
    assert_eq!(accepted["accepted"], true);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/tickets/H-1/reopen", Some(&token), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, message) = send(
        &app,
        json_request(
            "POST",
            "/api/tickets/H-1/messages",
            Some(&token),
            json!({ "content": "Looking into it" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", message);
    assert_eq!(message["content"], "Looking into it");

    let (status, transcript) = send(&app, get("/api/tickets/H-1/messages", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(transcript.as_array().unwrap().len(), 1);

    let (status, activities) =
        send(&app, get("/api/tickets/H-1/activities", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let activities = activities.as_array().unwrap();
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0]["description"], "accepted ticket");

    let (status, assigned) = send(&app, get("/api/tickets/assigned", Some(&token))).await;
    assert_eq!(status, StatusCode::OK, "{}", assigned);
    let assigned = assigned["tickets"].as_array().unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0]["assignee"]["email"], ADMIN_EMAIL);

    let (status, mine) = send(&app, get("/api/stats/mine", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["stats"]["inProgress"], 1);

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri("/api/tickets/H-1")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get("/api/tickets/H-1", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = setup_app().await;
    let token = login(&app).await;

    let (status, session) = send(&app, get("/api/auth/session", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["role"], "super-admin");

    let (status, _) = send(
        &app,
        json_request("POST", "/api/auth/logout", Some(&token), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get("/api/auth/session", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_multipart_attachment_is_stored_and_served() {
    let app = setup_app().await;
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/tickets",
            Some(&token),
            json!({ "ticketId": "H-2", "description": "Screen flickers" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let boundary = "ticketdesk-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"content\"\r\n\r\nsee file\r\n\
         --{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"note.txt\"\r\n\
         Content-Type: text/plain\r\n\r\nhello\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/tickets/H-2/messages")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, message) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED, "{}", message);
    assert_eq!(message["content"], "see file");
    assert_eq!(message["attachmentName"], "note.txt");
    assert_eq!(message["attachmentMimeType"], "text/plain");
    assert_eq!(message["attachmentKind"], "file");

    let url = message["attachmentUrl"].as_str().unwrap().to_string();
    assert!(url.starts_with("/attachments/"), "unexpected url {}", url);

    let (status, served) = send(&app, get(&url, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, Value::String("hello".to_string()));
}
