//! Branch → commit → pull request, in that order.
//!
//! Failure handling is asymmetric:
//! - branch creation fails: nothing to undo
//! - commit fails: the fresh branch is deleted (best effort)
//! - pull request fails: branch and commit are kept for manual recovery
//!
//! Not idempotent. A retry after failure starts over on a new branch.

use std::sync::Arc;

use chrono::{FixedOffset, Utc};
use inkwell_content::Document;
use inkwell_core::error::{BranchState, PublishError, PublishStep};
use inkwell_core::types::{PublishResult, PublishStatus};
use tracing::{error, info, warn};

use crate::branch;
use crate::host::{HostingPlatform, PullRequestDraft};

pub struct Publisher {
    host: Arc<dyn HostingPlatform>,
    base_branch: String,
    branch_source: String,
    offset: FixedOffset,
}

impl Publisher {
    pub fn new(
        host: Arc<dyn HostingPlatform>,
        base_branch: impl Into<String>,
        branch_source: impl Into<String>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            host,
            base_branch: base_branch.into(),
            branch_source: branch_source.into(),
            offset,
        }
    }

    /// Publish `doc` on a newly named branch.
    ///
    /// `submitter` is the Discord user ID, mentioned in the PR description.
    pub async fn publish(
        &self,
        doc: &Document,
        submitter: Option<&str>,
    ) -> Result<PublishResult, PublishError> {
        let branch = branch::branch_name(
            &self.branch_source,
            doc.post_type(),
            Utc::now(),
            self.offset,
            &branch::short_id(),
        );
        self.publish_on_branch(doc, branch, submitter).await
    }

    /// Same as [`publish`](Self::publish) with a caller-chosen branch name.
    pub async fn publish_on_branch(
        &self,
        doc: &Document,
        branch: String,
        submitter: Option<&str>,
    ) -> Result<PublishResult, PublishError> {
        info!(branch = %branch, path = %doc.path(), "publishing");

        // 1. Branch
        if let Err(e) = self.host.create_branch(&branch, &self.base_branch).await {
            warn!(branch = %branch, error = %e, "branch creation failed");
            return Err(PublishError {
                step: PublishStep::CreateBranch,
                message: e.to_string(),
                branch: None,
                branch_state: BranchState::NotCreated,
            });
        }

        // 2. Commit
        let commit_message = format!("Add {}: {}", doc.post_type(), label(doc));
        let commit = match self
            .host
            .commit_file(&branch, doc.path(), doc.text(), &commit_message)
            .await
        {
            Ok(commit) => commit,
            Err(e) => {
                warn!(branch = %branch, error = %e, "commit failed, deleting branch");
                let branch_state = match self.host.delete_branch(&branch).await {
                    Ok(()) => BranchState::Deleted,
                    Err(del) => {
                        error!(branch = %branch, error = %del, "could not delete branch after failed commit");
                        BranchState::Orphaned
                    }
                };
                return Err(PublishError {
                    step: PublishStep::CommitFile,
                    message: e.to_string(),
                    branch: Some(branch),
                    branch_state,
                });
            }
        };

        // 3. Pull request. The branch stays even if this fails.
        let draft = PullRequestDraft {
            head: branch.clone(),
            base: self.base_branch.clone(),
            title: format!("New {}: {}", doc.post_type(), label(doc)),
            body: pull_request_body(doc, &branch, submitter),
        };
        let pull_request = match self.host.open_pull_request(&draft).await {
            Ok(pr) => pr,
            Err(e) => {
                error!(
                    branch = %branch,
                    commit = %commit.sha,
                    error = %e,
                    "pull request failed; branch kept for manual recovery"
                );
                return Err(PublishError {
                    step: PublishStep::OpenPullRequest,
                    message: e.to_string(),
                    branch: Some(branch),
                    branch_state: BranchState::Preserved,
                });
            }
        };

        info!(
            branch = %branch,
            commit = %commit.sha,
            pr = pull_request.number,
            "pull request opened"
        );

        Ok(PublishResult {
            status: PublishStatus::PullRequestOpened,
            file_path: doc.path().to_string(),
            branch,
            commit_sha: commit.sha,
            pull_request,
        })
    }
}

fn label(doc: &Document) -> &str {
    if doc.title().is_empty() {
        doc.path()
    } else {
        doc.title()
    }
}

/// Pull request description.
pub fn pull_request_body(doc: &Document, branch: &str, submitter: Option<&str>) -> String {
    let mut body = format!(
        "## New {} post\n\n\
         | | |\n|---|---|\n\
         | Type | `{}` |\n\
         | File | `{}` |\n\
         | Branch | `{}` |\n",
        doc.post_type(),
        doc.post_type(),
        doc.path(),
        branch,
    );
    if !doc.title().is_empty() {
        body.push_str(&format!("| Title | {} |\n", doc.title()));
    }

    body.push_str("\n### Validation\n\n");
    body.push_str(&format!(
        "- Required fields present: {}\n",
        doc.checked_fields()
            .iter()
            .map(|f| format!("`{f}`"))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    body.push_str(&format!("- Tags: {}\n", doc.tag_count()));

    match submitter {
        Some(user) => body.push_str(&format!("\nSubmitted from Discord by <@{user}>.\n")),
        None => body.push_str("\nSubmitted from Discord.\n"),
    }
    body
}
