//! Background half of a form submission.
//!
//! Waits for the deferred ack to go out, then extracts, renders, publishes and
//! reports the outcome in exactly one follow-up message. Extraction and
//! validation both finish before the hosting platform is contacted.

use std::sync::Arc;

use chrono::Utc;
use inkwell_core::error::{BranchState, PublishError};
use inkwell_core::{InkwellError, PublishResult};
use inkwell_discord::extract::extract_post;
use inkwell_discord::{InteractionContext, InteractionData};
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::app::AppState;

/// `ack_sent` fires once the type-5 response body has been handed to the
/// server. If it is dropped instead, the ack never left and nothing is done.
pub async fn run_submission(
    state: Arc<AppState>,
    ctx: InteractionContext,
    data: InteractionData,
    ack_sent: oneshot::Receiver<()>,
) {
    if ack_sent.await.is_err() {
        warn!(interaction_id = %ctx.interaction_id, "deferred ack was never sent, dropping submission");
        return;
    }

    let job = tokio::spawn({
        let state = Arc::clone(&state);
        let ctx = ctx.clone();
        async move { publish_submission(&state, &ctx, &data).await }
    });
    let outcome = match job.await {
        Ok(outcome) => outcome,
        Err(e) => Err(InkwellError::Unknown(format!("publishing task failed: {e}"))),
    };

    let message = match outcome {
        Ok(result) => {
            info!(
                interaction_id = %ctx.interaction_id,
                pr = result.pull_request.number,
                path = %result.file_path,
                "submission published"
            );
            success_message(&result)
        }
        Err(e) => {
            match &e {
                InkwellError::Publish(_) | InkwellError::Unknown(_) => {
                    error!(interaction_id = %ctx.interaction_id, code = e.code(), error = %e, "publish failed")
                }
                _ => {
                    warn!(interaction_id = %ctx.interaction_id, code = e.code(), error = %e, "submission rejected")
                }
            }
            failure_message(&e)
        }
    };

    if let Err(e) = state.followups.send(&ctx, &message).await {
        error!(interaction_id = %ctx.interaction_id, error = %e, "follow-up delivery failed");
    }
}

/// Extraction → generation → publish for one submission.
pub async fn publish_submission(
    state: &AppState,
    ctx: &InteractionContext,
    data: &InteractionData,
) -> Result<PublishResult, InkwellError> {
    let post = extract_post(data)?;
    let doc = inkwell_content::generate(
        &post,
        state.offset,
        &state.config.site.extension,
        Utc::now(),
    )?;
    let result = state
        .publisher
        .publish(&doc, ctx.user_id.as_deref())
        .await?;
    Ok(result)
}

pub fn success_message(result: &PublishResult) -> String {
    format!(
        "✅ Pull request #{} opened: {}\nFile: `{}`\nBranch: `{}`",
        result.pull_request.number,
        result.pull_request.url,
        result.file_path,
        result.branch
    )
}

pub fn failure_message(err: &InkwellError) -> String {
    match err {
        InkwellError::Publish(e) => publish_failure(e),
        other => format!("❌ {other}"),
    }
}

fn publish_failure(e: &PublishError) -> String {
    let mut msg = format!("❌ Publishing failed during {}: {}", e.step, e.message);
    let branch = e.branch.as_deref().unwrap_or_default();
    match e.branch_state {
        BranchState::NotCreated => {}
        BranchState::Deleted => msg.push_str("\nThe working branch was removed."),
        BranchState::Orphaned => msg.push_str(&format!(
            "\nBranch `{branch}` could not be removed and needs manual cleanup."
        )),
        BranchState::Preserved => msg.push_str(&format!(
            "\nBranch `{branch}` was kept with the commit; open the pull request manually."
        )),
    }
    msg
}
