//! Follow-up delivery for deferred interactions.
//!
//! After a type-5 acknowledgement the outcome is posted to
//! `{api_base}/webhooks/{application_id}/{token}`. The token is the
//! authorization; no bot token is involved.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::DiscordError;
use crate::interaction::InteractionContext;

/// Discord rejects message content longer than this.
pub const MESSAGE_MAX: usize = 2000;

/// Sends the single follow-up message that closes a deferred interaction.
#[async_trait]
pub trait FollowUpSender: Send + Sync {
    async fn send(&self, ctx: &InteractionContext, content: &str) -> Result<(), DiscordError>;
}

/// Follow-up sender backed by the Discord REST API.
pub struct DiscordFollowUp {
    client: reqwest::Client,
    api_base: String,
}

impl DiscordFollowUp {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, ctx: &InteractionContext) -> String {
        format!(
            "{}/webhooks/{}/{}",
            self.api_base, ctx.application_id, ctx.token
        )
    }
}

#[async_trait]
impl FollowUpSender for DiscordFollowUp {
    async fn send(&self, ctx: &InteractionContext, content: &str) -> Result<(), DiscordError> {
        let resp = self
            .client
            .post(self.url(ctx))
            .json(&json!({ "content": fit_message(content) }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                interaction_id = %ctx.interaction_id,
                status = status.as_u16(),
                "follow-up rejected by Discord"
            );
            return Err(DiscordError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(interaction_id = %ctx.interaction_id, "follow-up delivered");
        Ok(())
    }
}

/// Trim `text` to [`MESSAGE_MAX`] characters, marking the cut with `…`.
pub fn fit_message(text: &str) -> String {
    if text.chars().count() <= MESSAGE_MAX {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MESSAGE_MAX - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(fit_message("Published!"), "Published!");
    }

    #[test]
    fn long_text_is_cut_to_the_limit() {
        let text = "é".repeat(MESSAGE_MAX + 10);
        let fitted = fit_message(&text);
        assert_eq!(fitted.chars().count(), MESSAGE_MAX);
        assert!(fitted.ends_with('…'));
    }

    #[test]
    fn url_uses_application_and_token() {
        let sender = DiscordFollowUp::new(reqwest::Client::new(), "https://discord.com/api/v10/");
        let ctx = InteractionContext {
            interaction_id: "1".into(),
            application_id: "app".into(),
            token: "tok".into(),
            user_id: None,
        };
        assert_eq!(
            sender.url(&ctx),
            "https://discord.com/api/v10/webhooks/app/tok"
        );
    }
}
