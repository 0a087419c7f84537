use async_trait::async_trait;
use inkwell_core::types::PullRequestRef;

use crate::error::HostingError;

/// Commit created by [`HostingPlatform::commit_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub sha: String,
}

/// Everything needed to open a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestDraft {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Operations the publisher needs from the hosting platform.
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// background publish task. No retries happen at this layer.
#[async_trait]
pub trait HostingPlatform: Send + Sync {
    /// Create `branch` pointing at the current head of `base`.
    async fn create_branch(&self, branch: &str, base: &str) -> Result<(), HostingError>;

    /// Create `path` with `content` on `branch` in a single commit.
    async fn commit_file(
        &self,
        branch: &str,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<CommitRef, HostingError>;

    async fn open_pull_request(
        &self,
        draft: &PullRequestDraft,
    ) -> Result<PullRequestRef, HostingError>;

    async fn delete_branch(&self, branch: &str) -> Result<(), HostingError>;
}
