use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use chirpy_api::auth::AppStateInner;
use chirpy_api::password::Credentials;
use chirpy_api::routes;
use chirpy_api::service::Service;
use chirpy_db::Store;

const POLKA_KEY: &str = "polka-test-key";

fn app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Chirpy</h1>").unwrap();

    let store = Arc::new(Store::open(&dir.path().join("database.json")).unwrap());
    let credentials = Credentials::with_params(256, 1, 1).unwrap();
    let service = Service::with_credentials(store, "http-secret", credentials);
    let state = Arc::new(AppStateInner::new(service, POLKA_KEY.to_string()));

    let router = routes::router(state, dir.path());
    (dir, router)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn json_request(method: &str, uri: &str, bearer: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn signup_and_login(app: &Router, email: &str) -> Value {
    let creds = json!({ "email": email, "password": "pw1" });
    let (status, _) = send(app, json_request("POST", "/api/users", None, creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, json_request("POST", "/api/login", None, creds)).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn healthz_ok() {
    let (_dir, app) = app();
    let req = Request::builder()
        .uri("/api/healthz")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn signup_and_login_flow() {
    let (_dir, app) = app();
    let login = signup_and_login(&app, "a@example.com").await;
    assert_eq!(login["id"], 1);
    assert_eq!(login["email"], "a@example.com");
    assert_eq!(login["is_chirpy_red"], false);
    assert!(login["token"].is_string());
    assert!(login["refresh_token"].is_string());

    let dup = json!({ "email": "a@example.com", "password": "x" });
    let (status, _) = send(&app, json_request("POST", "/api/users", None, dup)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let wrong = json!({ "email": "a@example.com", "password": "wrong" });
    let (wrong_status, wrong_body) =
        send(&app, json_request("POST", "/api/login", None, wrong)).await;
    let unknown = json!({ "email": "who@example.com", "password": "pw1" });
    let (unknown_status, unknown_body) =
        send(&app, json_request("POST", "/api/login", None, unknown)).await;
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn chirp_lifecycle() {
    let (_dir, app) = app();
    let alice = signup_and_login(&app, "alice@example.com").await;
    let bob = signup_and_login(&app, "bob@example.com").await;
    let alice_token = alice["token"].as_str().unwrap();
    let bob_token = bob["token"].as_str().unwrap();

    let body = json!({ "body": "what a kerfuffle" });
    let (status, _) = send(&app, json_request("POST", "/api/chirps", None, body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) =
        send(&app, json_request("POST", "/api/chirps", Some(alice_token), body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_slice(&created).unwrap();
    assert_eq!(created["body"], "what a ****");
    assert_eq!(created["author_id"], alice["id"]);

    let too_long = json!({ "body": "x".repeat(141) });
    let (status, _) =
        send(&app, json_request("POST", "/api/chirps", Some(alice_token), too_long)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = created["id"].as_u64().unwrap();
    let uri = format!("/api/chirps/{id}");
    let delete = |token: &str| {
        Request::builder()
            .method("DELETE")
            .uri(&uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(&app, delete(bob_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, delete(alice_token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let get = Request::builder().uri(&uri).body(Body::empty()).unwrap();
    let (status, _) = send(&app, get).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refresh_and_revoke_over_http() {
    let (_dir, app) = app();
    let login = signup_and_login(&app, "a@example.com").await;
    let refresh = login["refresh_token"].as_str().unwrap();

    let (status, body) =
        send(&app, json_request("POST", "/api/refresh", Some(refresh), json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["token"].is_string());

    let (status, _) =
        send(&app, json_request("POST", "/api/revoke", Some(refresh), json!({}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
        send(&app, json_request("POST", "/api/refresh", Some(refresh), json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_requires_api_key() {
    let (_dir, app) = app();
    let login = signup_and_login(&app, "a@example.com").await;
    let event = json!({ "event": "user.upgraded", "data": { "user_id": login["id"] } });

    let req = Request::builder()
        .method("POST")
        .uri("/api/polka/webhooks")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "ApiKey wrong")
        .body(Body::from(event.to_string()))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("POST")
        .uri("/api/polka/webhooks")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("ApiKey {POLKA_KEY}"))
        .body(Body::from(event.to_string()))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let creds = json!({ "email": "a@example.com", "password": "pw1" });
    let (_, body) = send(&app, json_request("POST", "/api/login", None, creds)).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["is_chirpy_red"], true);
}

#[tokio::test]
async fn app_hits_are_counted() {
    let (_dir, app) = app();
    for _ in 0..2 {
        let req = Request::builder()
            .uri("/app/index.html")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
    }

    let req = Request::builder()
        .uri("/admin/metrics")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, req).await;
    assert!(String::from_utf8(body).unwrap().contains("visited 2 times"));

    let req = Request::builder()
        .method("POST")
        .uri("/api/reset")
        .body(Body::empty())
        .unwrap();
    send(&app, req).await;

    let req = Request::builder()
        .uri("/admin/metrics")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(&app, req).await;
    assert!(String::from_utf8(body).unwrap().contains("visited 0 times"));
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let (_dir, app) = app();

    let missing_field = json!({ "email": "a@example.com" });
    let (status, _) = send(&app, json_request("POST", "/api/users", None, missing_field)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/api/login")
        .body(Body::from(r#"{"email":"a@example.com","password":"pw1"}"#))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_checks_key_before_body() {
    let (_dir, app) = app();

    let req = Request::builder()
        .method("POST")
        .uri("/api/polka/webhooks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("POST")
        .uri("/api/polka/webhooks")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("ApiKey {POLKA_KEY}"))
        .body(Body::from("{}"))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let other = json!({ "event": "user.payment_failed", "data": { "user_id": 1 } });
    let req = Request::builder()
        .method("POST")
        .uri("/api/polka/webhooks")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("ApiKey {POLKA_KEY}x"))
        .body(Body::from(other.to_string()))
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
