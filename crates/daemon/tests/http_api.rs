//! HTTP routes: status codes and response bodies

use std::net::SocketAddr;

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use common::prelude::UserId;
use sealpost_daemon::http_server::{self, CALLER_HEADER};
use sealpost_daemon::{Database, ServiceConfig, ServiceState};

async fn setup_router() -> Router {
    let db_url = url::Url::parse("sqlite::memory:").unwrap();
    let db = Database::connect(&db_url).await.unwrap();
    let state = ServiceState::from_database(db, &ServiceConfig::default());
    let config = http_server::Config::new(
        SocketAddr::from(([127, 0, 0, 1], 0)),
        tracing::Level::INFO,
    );
    http_server::router(config, state)
}

async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    caller: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("accept", "application/json");
    if let Some(caller) = caller {
        builder = builder.header(CALLER_HEADER, caller);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn register(router: &Router) -> String {
    let (status, body) = call(router, "POST", "/api/v0/users", None, None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["user_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_send_and_read_inbox() {
    let router = setup_router().await;
    let alice = register(&router).await;
    let bob = register(&router).await;

    let (status, body) = call(
        &router,
        "POST",
        "/api/v0/messages",
        Some(&alice),
        Some(serde_json::json!({"recipient_id": bob, "content": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let message_id = body["message_id"].as_str().unwrap().to_string();

    let (status, body) = call(&router, "GET", "/api/v0/messages/inbox", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["failed"].as_array().unwrap().is_empty());
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["message_id"], message_id.as_str());
    assert_eq!(messages[0]["sender_id"], alice.as_str());
    assert_eq!(messages[0]["content"], "hello");
    assert!(messages[0].get("ciphertext").is_none());

    let (status, body) = call(&router, "GET", "/api/v0/messages/inbox", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["messages"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_inbox_lists_unopenable_records() {
    let db_url = url::Url::parse("sqlite::memory:").unwrap();
    let db = Database::connect(&db_url).await.unwrap();
    let state = ServiceState::from_database(db.clone(), &ServiceConfig::default());
    let config = http_server::Config::new(
        SocketAddr::from(([127, 0, 0, 1], 0)),
        tracing::Level::INFO,
    );
    let router = http_server::router(config, state);
    let bob = register(&router).await;

    let mut ids = Vec::new();
    for content in ["kept", "broken"] {
        let (status, body) = call(
            &router,
            "POST",
            "/api/v0/messages",
            None,
            Some(serde_json::json!({"recipient_id": bob, "content": content})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["message_id"].as_str().unwrap().to_string());
    }

    sqlx::query("UPDATE messages SET nonce = zeroblob(12) WHERE message_id = ?1")
        .bind(&ids[1])
        .execute(&*db)
        .await
        .unwrap();

    let (status, body) = call(&router, "GET", "/api/v0/messages/inbox", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["content"], "kept");

    let failed = body["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["message_id"], ids[1].as_str());
    assert_eq!(failed[0]["kind"], "decryption_failed");
}

#[tokio::test]
async fn test_anonymous_send() {
    let router = setup_router().await;
    let bob = register(&router).await;

    let (status, _) = call(
        &router,
        "POST",
        "/api/v0/messages",
        None,
        Some(serde_json::json!({"recipient_id": bob, "content": "who am i"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = call(&router, "GET", "/api/v0/messages/inbox", Some(&bob), None).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].get("sender_id").is_none());
}

#[tokio::test]
async fn test_send_errors() {
    let router = setup_router().await;
    let bob = register(&router).await;

    let cases = [
        (
            serde_json::json!({"recipient_id": bob, "content": ""}),
            StatusCode::BAD_REQUEST,
        ),
        (
            serde_json::json!({"recipient_id": bob, "content": "x".repeat(1001)}),
            StatusCode::BAD_REQUEST,
        ),
        (
            serde_json::json!({"recipient_id": "nobody", "content": "hello"}),
            StatusCode::BAD_REQUEST,
        ),
        (
            serde_json::json!({"recipient_id": UserId::generate(), "content": "hello"}),
            StatusCode::NOT_FOUND,
        ),
    ];

    for (body, expected) in cases {
        let (status, response) = call(&router, "POST", "/api/v0/messages", None, Some(body)).await;
        assert_eq!(status, expected);
        assert!(response["error"].is_string());
    }
}

#[tokio::test]
async fn test_inbox_requires_caller() {
    let router = setup_router().await;

    let (status, body) = call(&router, "GET", "/api/v0/messages/inbox", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = call(
        &router,
        "GET",
        "/api/v0/messages/inbox",
        Some("not-a-user"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_edit_delete_and_metadata() {
    let router = setup_router().await;
    let alice = register(&router).await;
    let bob = register(&router).await;
    let mallory = register(&router).await;

    let (_, body) = call(
        &router,
        "POST",
        "/api/v0/messages",
        Some(&alice),
        Some(serde_json::json!({"recipient_id": bob, "content": "draft"})),
    )
    .await;
    let uri = format!("/api/v0/messages/{}", body["message_id"].as_str().unwrap());

    let (status, body) = call(&router, "GET", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["recipient_id"], bob.as_str());
    assert!(body["message"].get("content").is_none());

    let (status, _) = call(&router, "GET", &uri, Some(&mallory), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let edit = serde_json::json!({"content": "final"});
    let (status, _) = call(&router, "PUT", &uri, Some(&bob), Some(edit.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&router, "PUT", &uri, Some(&alice), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&router, "GET", "/api/v0/messages/inbox", Some(&bob), None).await;
    assert_eq!(body["messages"][0]["content"], "final");

    let (status, _) = call(&router, "DELETE", &uri, Some(&mallory), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&router, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&router, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_routes() {
    let router = setup_router().await;

    let (status, body) = call(&router, "GET", "/_status/livez", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&router, "GET", "/_status/readyz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = call(&router, "GET", "/_status/version", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["version"].is_string());

    let (status, body) = call(&router, "GET", "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let db_url = url::Url::parse("sqlite::memory:").unwrap();
    let db = Database::connect(&db_url).await.unwrap();
    let state = ServiceState::from_database(db, &ServiceConfig::default());
    let mut config = http_server::Config::new(
        SocketAddr::from(([127, 0, 0, 1], 0)),
        tracing::Level::INFO,
    );
    config.max_body_bytes = 256;
    let router = http_server::router(config, state);

    let bob = register(&router).await;
    let body = serde_json::json!({"recipient_id": bob, "content": "x".repeat(512)});
    let (status, _) = call(&router, "POST", "/api/v0/messages", None, Some(body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
