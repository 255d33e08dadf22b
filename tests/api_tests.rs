//! # API Tests
//!
//! Drive the router end to end with in-memory collaborators and a fixed
//! chat model. No network access is needed.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use cofounder::auth::AuthMode;
use cofounder::llm::FixedChatModel;
use cofounder::search::{IdeaMetadata, MemoryIndex, VectorIndex, VectorRecord};
use cofounder::server::{AppState, Collaborators, ServerConfig, router};
use cofounder::store::MemoryBackend;
use cofounder::tasks::TaskQueue;

const TOKEN: &str = "demo-token";

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

struct TestApp {
    router: Router,
    backend: Arc<MemoryBackend>,
    index: Arc<MemoryIndex>,
}

fn build(config: ServerConfig, model: Option<FixedChatModel>) -> TestApp {
    let backend = Arc::new(MemoryBackend::new());
    let index = Arc::new(MemoryIndex::new());
    let mut services = Collaborators::in_memory(backend.clone()).with_index(index.clone());
    if let Some(model) = model {
        services = services.with_model(Arc::new(model));
    }
    let (tasks, _worker) = TaskQueue::start();
    let state = Arc::new(AppState::new(config, services, tasks));
    TestApp {
        router: router(state),
        backend,
        index,
    }
}

fn app_with_reply(reply: &str) -> TestApp {
    build(ServerConfig::default(), Some(FixedChatModel::new(reply)))
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn authed(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap()
}

async fn chat(app: &TestApp, message: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/api/chat",
            Some(TOKEN),
            json!({"message": message, "userId": "alice"}),
        ),
    )
    .await
}

// ============================================================================
// CHAT
// ============================================================================

#[tokio::test]
async fn test_chat_creates_shape_from_directive() {
    let app = app_with_reply(
        r##"Sure! [CANVAS_CREATE:rectangle:{"x":10,"y":10,"width":50,"height":60,"fillColor":"#ff0000"}] Done."##,
    );

    let (status, body) = chat(&app, "draw a red box").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["response"], json!("Sure!  Done."));
    let objects = body["canvasObjects"].as_array().unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0]["type"], json!("rectangle"));
    assert_eq!(objects[0]["ownerId"], json!("alice"));
    assert_eq!(
        objects[0]["parameters"],
        json!({
            "x": 10.0, "y": 10.0, "width": 50.0, "height": 60.0,
            "fillColor": "#ff0000", "strokeColor": "#1e40af"
        })
    );
}

#[tokio::test]
async fn test_chat_fallback_draws_preset_rectangles() {
    let app = app_with_reply("Here are your rectangles.");

    let (status, body) = chat(&app, "draw 3 rectangles").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], json!("Here are your rectangles."));
    let objects = body["canvasObjects"].as_array().unwrap();
    let positions: Vec<(f64, f64)> = objects
        .iter()
        .map(|o| {
            (
                o["parameters"]["x"].as_f64().unwrap(),
                o["parameters"]["y"].as_f64().unwrap(),
            )
        })
        .collect();
    assert_eq!(positions, vec![(50.0, 50.0), (200.0, 50.0), (350.0, 50.0)]);
}

#[tokio::test]
async fn test_chat_strips_unknown_shape() {
    let app = app_with_reply(r#"A triangle: [CANVAS_CREATE:triangle:{"x":1}]"#);

    let (_, body) = chat(&app, "what do you think of my plan?").await;

    assert_eq!(body["response"], json!("A triangle:"));
    assert_eq!(body["canvasObjects"], json!([]));
}

#[tokio::test]
async fn test_chat_without_model_answers_canned_reply() {
    let app = build(ServerConfig::default(), None);

    let (status, body) = chat(&app, "hello").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    assert!(!body["response"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_model_failure_still_draws() {
    let app = build(
        ServerConfig::default(),
        Some(FixedChatModel::failing("rate limited")),
    );

    let (status, body) = chat(&app, "нарисуй круг").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(false));
    let objects = body["canvasObjects"].as_array().unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0]["type"], json!("circle"));
}

#[tokio::test]
async fn test_chat_requires_token() {
    let app = app_with_reply("hi");

    let (status, body) = send(&app, post_json("/api/chat", None, json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        post_json("/api/chat", Some("wrong"), json!({"message": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let app = app_with_reply("hi");

    let (status, body) = chat(&app, "   ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Message is required"));
}

#[tokio::test]
async fn test_verified_auth_uses_token_owner() {
    let config = ServerConfig {
        auth_mode: AuthMode::Verified,
        ..ServerConfig::default()
    };
    let app = build(
        config,
        Some(FixedChatModel::new(r#"[CANVAS_CREATE:circle:{"radius":5}]"#)),
    );

    let (status, body) = send(
        &app,
        post_json(
            "/api/auth/register",
            None,
            json!({"email": "bob@example.com", "password": "hunter22"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let bob = body["user"]["id"].as_str().unwrap().to_string();
    let token = app.backend.sign_in("bob@example.com", "hunter22").await.unwrap();

    // The body's userId is ignored once tokens are verified.
    let (status, body) = send(
        &app,
        post_json(
            "/api/chat",
            Some(&token),
            json!({"message": "a circle please", "userId": "mallory"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["canvasObjects"][0]["ownerId"], json!(bob));

    let (status, _) = chat(&app, "hi").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chat_indexes_conversation_in_background() {
    let config = ServerConfig {
        index_conversations: true,
        ..ServerConfig::default()
    };
    let app = build(config, Some(FixedChatModel::new("Great idea.")));

    let (status, _) = chat(&app, "a marketplace for tutors").await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..50 {
        if app.index.len().await == 1 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("conversation was not indexed");
}

// ============================================================================
// CANVAS
// ============================================================================

#[tokio::test]
async fn test_canvas_list_and_delete() {
    let app = app_with_reply(
        r#"[CANVAS_CREATE:circle:{"x":1,"y":2}][CANVAS_CREATE:text:{"text":"MVP"}]"#,
    );
    chat(&app, "sketch it").await;

    let (status, body) = send(&app, authed("GET", "/api/canvas?userId=alice")).await;
    assert_eq!(status, StatusCode::OK);
    let shapes = body.as_array().unwrap();
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[0]["type"], json!("circle"));
    assert_eq!(shapes[1]["parameters"]["content"], json!("MVP"));

    // Other users see nothing.
    let (_, body) = send(&app, authed("GET", "/api/canvas?userId=eve")).await;
    assert_eq!(body, json!([]));

    let id = shapes[0]["id"].as_i64().unwrap();
    let (status, _) = send(&app, authed("DELETE", &format!("/api/canvas/{}?userId=eve", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send(&app, authed("DELETE", &format!("/api/canvas/{}?userId=alice", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "id": id}));

    let (_, body) = send(&app, authed("GET", "/api/canvas?userId=alice")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

// ============================================================================
// REGISTRATION
// ============================================================================

#[tokio::test]
async fn test_register() {
    let app = build(ServerConfig::default(), None);
    let body = json!({"email": "carol@example.com", "password": "pw123456", "name": "Carol"});

    let (status, response) = send(&app, post_json("/api/auth/register", None, body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], json!(true));
    assert_eq!(response["message"], json!("User registered successfully"));
    assert_eq!(response["user"]["email"], json!("carol@example.com"));

    let (status, _) = send(&app, post_json("/api/auth/register", None, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, response) = send(
        &app,
        post_json("/api/auth/register", None, json!({"email": "dan@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], json!("Email and password are required"));
}

// ============================================================================
// SEARCH
// ============================================================================

fn idea(user_id: &str, content: &str) -> IdeaMetadata {
    IdeaMetadata {
        user_id: user_id.to_string(),
        content: content.to_string(),
        response: "noted".to_string(),
        project_id: None,
        timestamp: Utc::now(),
    }
}

#[tokio::test]
async fn test_search_returns_own_ideas() {
    let app = build(
        ServerConfig::default(),
        Some(FixedChatModel::new("ok").with_embedding(vec![1.0, 0.0])),
    );
    app.index
        .upsert(vec![
            VectorRecord {
                id: "near".to_string(),
                values: vec![1.0, 0.1],
                metadata: idea("alice", "tutoring marketplace"),
            },
            VectorRecord {
                id: "far".to_string(),
                values: vec![0.0, 1.0],
                metadata: idea("alice", "pet food delivery"),
            },
            VectorRecord {
                id: "foreign".to_string(),
                values: vec![1.0, 0.0],
                metadata: idea("eve", "tutoring marketplace"),
            },
        ])
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        post_json(
            "/api/search",
            Some(TOKEN),
            json!({"query": "tutors", "limit": 5, "userId": "alice"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["near", "far"]);
    assert_eq!(body["results"][0]["content"], json!("tutoring marketplace"));
}

#[tokio::test]
async fn test_search_errors() {
    let app = build(ServerConfig::default(), None);

    let (status, _) = send(&app, post_json("/api/search", Some(TOKEN), json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post_json("/api/search", Some(TOKEN), json!({"query": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// HEALTH
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = app_with_reply("ok");
    let (status, body) = send(&app, Request::get("/api/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall"], json!("healthy"));
    assert_eq!(body["services"]["llm"], json!("healthy"));

    let app = build(ServerConfig::default(), None);
    let (status, body) = send(&app, Request::get("/api/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["llm"], json!("disabled"));

    let app = build(
        ServerConfig::default(),
        Some(FixedChatModel::failing("down")),
    );
    let (status, body) = send(&app, Request::get("/api/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["overall"], json!("degraded"));
    assert_eq!(body["services"]["llm"], json!("error"));
}
