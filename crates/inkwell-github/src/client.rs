//! GitHub REST implementation of [`HostingPlatform`].

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use inkwell_core::config::GitHubConfig;
use inkwell_core::types::PullRequestRef;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::HostingError;
use crate::host::{CommitRef, HostingPlatform, PullRequestDraft};

const USER_AGENT: &str = concat!("inkwell/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";

pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    pub fn from_config(config: &GitHubConfig) -> Result<Self, HostingError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.owner, self.repo, path
        );
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn base_sha(&self, base: &str) -> Result<String, HostingError> {
        let resp = self
            .request(Method::GET, &format!("git/ref/heads/{base}"))
            .send()
            .await?;
        let body = json_body(resp).await?;
        body["object"]["sha"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| HostingError::Decode(format!("missing object.sha for {base}")))
    }
}

/// Turn a non-2xx response into [`HostingError::Status`], otherwise parse JSON.
async fn json_body(resp: Response) -> Result<Value, HostingError> {
    let resp = check_status(resp).await?;
    resp.json()
        .await
        .map_err(|e| HostingError::Decode(e.to_string()))
}

async fn check_status(resp: Response) -> Result<Response, HostingError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or(text);
    Err(HostingError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl HostingPlatform for GitHubClient {
    async fn create_branch(&self, branch: &str, base: &str) -> Result<(), HostingError> {
        let sha = self.base_sha(base).await?;
        let resp = self
            .request(Method::POST, "git/refs")
            .json(&json!({ "ref": format!("refs/heads/{branch}"), "sha": sha }))
            .send()
            .await?;
        check_status(resp).await?;
        debug!(branch, base, sha = %sha, "branch created");
        Ok(())
    }

    async fn commit_file(
        &self,
        branch: &str,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<CommitRef, HostingError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(content.as_bytes());
        let resp = self
            .request(Method::PUT, &format!("contents/{path}"))
            .json(&json!({
                "message": message,
                "content": encoded,
                "branch": branch,
            }))
            .send()
            .await?;
        let body = json_body(resp).await?;

        let sha = body["commit"]["sha"]
            .as_str()
            .ok_or_else(|| HostingError::Decode("missing commit.sha".to_string()))?
            .to_string();
        Ok(CommitRef { sha })
    }

    async fn open_pull_request(
        &self,
        draft: &PullRequestDraft,
    ) -> Result<PullRequestRef, HostingError> {
        let resp = self
            .request(Method::POST, "pulls")
            .json(&json!({
                "title": draft.title,
                "head": draft.head,
                "base": draft.base,
                "body": draft.body,
            }))
            .send()
            .await?;
        let body = json_body(resp).await?;

        let number = body["number"]
            .as_u64()
            .ok_or_else(|| HostingError::Decode("missing pull request number".to_string()))?;
        let url = body["html_url"]
            .as_str()
            .ok_or_else(|| HostingError::Decode("missing pull request html_url".to_string()))?
            .to_string();
        Ok(PullRequestRef { number, url })
    }

    async fn delete_branch(&self, branch: &str) -> Result<(), HostingError> {
        let resp = self
            .request(Method::DELETE, &format!("git/refs/heads/{branch}"))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}
