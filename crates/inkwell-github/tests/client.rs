//! Drives the real `GitHubClient` through the `Publisher` against a local
//! mock of the GitHub REST endpoints.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::{Json, Router};
use base64::Engine;
use chrono::{FixedOffset, TimeZone, Utc};
use inkwell_content::Document;
use inkwell_core::config::GitHubConfig;
use inkwell_core::error::{BranchState, PublishStep};
use inkwell_core::{PostData, PostType};
use inkwell_github::{GitHubClient, Publisher};
use serde_json::{json, Value};

#[derive(Debug, Clone)]
struct Call {
    method: Method,
    path: String,
    auth: Option<String>,
    body: Value,
}

struct Mock {
    calls: Mutex<Vec<Call>>,
    commit_status: StatusCode,
    pr_status: StatusCode,
}

impl Mock {
    fn new(commit_status: StatusCode, pr_status: StatusCode) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            commit_status,
            pr_status,
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

async fn github(
    State(mock): State<Arc<Mock>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let path = uri
        .path()
        .strip_prefix("/repos/me/site/")
        .unwrap_or(uri.path())
        .to_string();
    mock.calls.lock().unwrap().push(Call {
        method: method.clone(),
        path: path.clone(),
        auth: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    match (method, path.as_str()) {
        (Method::GET, p) if p.starts_with("git/ref/heads/") => {
            (StatusCode::OK, Json(json!({ "object": { "sha": "base123" } })))
        }
        (Method::POST, "git/refs") => (StatusCode::CREATED, Json(json!({ "ref": "ok" }))),
        (Method::PUT, p) if p.starts_with("contents/") => {
            if mock.commit_status.is_success() {
                (
                    StatusCode::CREATED,
                    Json(json!({ "commit": { "sha": "c0mm17", "html_url": "https://github.com/me/site/commit/c0mm17" } })),
                )
            } else {
                (mock.commit_status, Json(json!({ "message": "sha conflict" })))
            }
        }
        (Method::POST, "pulls") => {
            if mock.pr_status.is_success() {
                (
                    StatusCode::CREATED,
                    Json(json!({ "number": 3, "html_url": "https://github.com/me/site/pull/3" })),
                )
            } else {
                (
                    mock.pr_status,
                    Json(json!({ "message": "A pull request already exists" })),
                )
            }
        }
        (Method::DELETE, p) if p.starts_with("git/refs/heads/") => {
            (StatusCode::NO_CONTENT, Json(Value::Null))
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))),
    }
}

async fn serve(mock: Arc<Mock>) -> String {
    let app = Router::new().fallback(github).with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn publisher(api_base: String) -> Publisher {
    let client = GitHubClient::from_config(&GitHubConfig {
        token: "ghp_test".into(),
        owner: "me".into(),
        repo: "site".into(),
        base_branch: "main".into(),
        api_base,
        timeout_secs: 5,
    })
    .unwrap();
    Publisher::new(Arc::new(client), "main", "discord", utc())
}

fn note() -> Document {
    let mut post = PostData::new(PostType::Note);
    post.title = Some("Hello World".into());
    post.content = Some("Test".into());
    post.push_tags(["a", "b"]);
    let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
    inkwell_content::generate(&post, utc(), "md", now).unwrap()
}

#[tokio::test]
async fn publishes_through_the_rest_api() {
    let mock = Mock::new(StatusCode::CREATED, StatusCode::CREATED);
    let doc = note();
    let result = publisher(serve(mock.clone()).await)
        .publish(&doc, Some("42"))
        .await
        .unwrap();

    assert_eq!(result.commit_sha, "c0mm17");
    assert_eq!(result.pull_request.number, 3);
    assert_eq!(result.pull_request.url, "https://github.com/me/site/pull/3");

    let calls = mock.calls();
    let steps: Vec<_> = calls
        .iter()
        .map(|c| format!("{} {}", c.method, c.path))
        .collect();
    assert_eq!(
        steps,
        vec![
            "GET git/ref/heads/main".to_string(),
            "POST git/refs".to_string(),
            "PUT contents/_src/notes/hello-world.md".to_string(),
            "POST pulls".to_string(),
        ]
    );
    assert!(calls
        .iter()
        .all(|c| c.auth.as_deref() == Some("Bearer ghp_test")));

    let create_ref = &calls[1].body;
    assert_eq!(
        create_ref["ref"],
        format!("refs/heads/{}", result.branch).as_str()
    );
    assert_eq!(create_ref["sha"], "base123");

    let commit = &calls[2].body;
    assert_eq!(commit["branch"], result.branch.as_str());
    assert_eq!(commit["message"], "Add note: Hello World");
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(commit["content"].as_str().unwrap())
        .unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), doc.text());

    let pr = &calls[3].body;
    assert_eq!(pr["head"], result.branch.as_str());
    assert_eq!(pr["base"], "main");
    assert_eq!(pr["title"], "New note: Hello World");
}

#[tokio::test]
async fn rejected_commit_deletes_the_ref() {
    let mock = Mock::new(StatusCode::CONFLICT, StatusCode::CREATED);
    let err = publisher(serve(mock.clone()).await)
        .publish(&note(), None)
        .await
        .unwrap_err();

    assert_eq!(err.step, PublishStep::CommitFile);
    assert_eq!(err.branch_state, BranchState::Deleted);
    assert!(err.message.contains("sha conflict"));

    let branch = err.branch.unwrap();
    let last = mock.calls().pop().unwrap();
    assert_eq!(last.method, Method::DELETE);
    assert_eq!(last.path, format!("git/refs/heads/{branch}"));
}

#[tokio::test]
async fn rejected_pull_request_leaves_the_branch() {
    let mock = Mock::new(StatusCode::CREATED, StatusCode::UNPROCESSABLE_ENTITY);
    let err = publisher(serve(mock.clone()).await)
        .publish(&note(), None)
        .await
        .unwrap_err();

    assert_eq!(err.step, PublishStep::OpenPullRequest);
    assert_eq!(err.branch_state, BranchState::Preserved);
    assert!(err.message.contains("already exists"));
    assert!(mock.calls().iter().all(|c| c.method != Method::DELETE));
}
