//! Outbound Discord REST calls against a local axum stand-in for the API.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use inkwell_discord::commands::register_commands;
use inkwell_discord::followup::MESSAGE_MAX;
use inkwell_discord::{DiscordError, DiscordFollowUp, FollowUpSender, InteractionContext};
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Api {
    seen: Arc<Mutex<Vec<Seen>>>,
    status: StatusCode,
    reply: &'static str,
}

async fn record(
    State(api): State<Api>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    api.seen.lock().unwrap().push(Seen {
        method,
        path: uri.path().to_string(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });
    (api.status, api.reply.to_string())
}

/// Serve `status`/`reply` for every request; returns the base URL and the log.
async fn fake_discord(status: StatusCode, reply: &'static str) -> (String, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let api = Api {
        seen: seen.clone(),
        status,
        reply,
    };
    let app = Router::new().fallback(record).with_state(api);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api/v10"), seen)
}

fn ctx() -> InteractionContext {
    InteractionContext {
        interaction_id: "900".into(),
        application_id: "app".into(),
        token: "tok".into(),
        user_id: Some("42".into()),
    }
}

#[tokio::test]
async fn followup_posts_trimmed_content_to_the_webhook() {
    let (base, seen) = fake_discord(StatusCode::OK, "{}").await;
    let sender = DiscordFollowUp::new(reqwest::Client::new(), format!("{base}/"));

    let long = "x".repeat(MESSAGE_MAX + 500);
    sender.send(&ctx(), &long).await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(seen[0].path, "/api/v10/webhooks/app/tok");
    assert_eq!(seen[0].authorization, None);

    let content = seen[0].body["content"].as_str().unwrap();
    assert_eq!(content.chars().count(), MESSAGE_MAX);
    assert!(content.ends_with('…'));
}

#[tokio::test]
async fn followup_rejection_keeps_status_and_body() {
    let (base, _) = fake_discord(StatusCode::NOT_FOUND, r#"{"message":"Unknown Webhook"}"#).await;
    let sender = DiscordFollowUp::new(reqwest::Client::new(), base);

    let err = sender.send(&ctx(), "✅ done").await.unwrap_err();
    match err {
        DiscordError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Unknown Webhook"), "{body}");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn register_replaces_global_commands_with_post() {
    let (base, seen) = fake_discord(StatusCode::OK, r#"[{"id":"1","name":"post"}]"#).await;

    let count = register_commands(&reqwest::Client::new(), &base, "app", Some("bot-secret"))
        .await
        .unwrap();
    assert_eq!(count, 1);

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::PUT);
    assert_eq!(seen[0].path, "/api/v10/applications/app/commands");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bot bot-secret"));

    let commands = seen[0].body.as_array().unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0]["name"], "post");
}

#[tokio::test]
async fn register_without_token_makes_no_request() {
    let (base, seen) = fake_discord(StatusCode::OK, "[]").await;

    let err = register_commands(&reqwest::Client::new(), &base, "app", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DiscordError::NoToken));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn register_failure_maps_to_status() {
    let (base, _) = fake_discord(StatusCode::UNAUTHORIZED, r#"{"message":"401: Unauthorized"}"#).await;

    let err = register_commands(&reqwest::Client::new(), &base, "app", Some("stale"))
        .await
        .unwrap_err();
    assert!(matches!(err, DiscordError::Status { status: 401, .. }));
}
