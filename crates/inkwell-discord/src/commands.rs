//! The `/post` slash command and the publish forms it opens.
//!
//! Registration happens at gateway startup when `discord.register_commands`
//! is true. Each subcommand answers with a modal whose `custom_id` carries the
//! choices made on the command line (see [`Submission`]).

use inkwell_core::PostType;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::DiscordError;
use crate::extract::{
    Submission, FIELD_ALT_TEXT, FIELD_ASPECT_RATIO, FIELD_ATTACHMENT, FIELD_CONTENT,
    FIELD_MEDIA_TYPE, FIELD_MEDIA_URL, FIELD_RESPONSE_TYPE, FIELD_SLUG, FIELD_TAGS,
    FIELD_TARGET_URL, FIELD_TITLE,
};
use crate::interaction::{OPTION_ATTACHMENT, OPTION_STRING, OPTION_SUB_COMMAND};

pub const COMMAND_NAME: &str = "post";

/// Text input styles.
const SHORT: u8 = 1;
const PARAGRAPH: u8 = 2;

/// Definition of the `/post` command in Discord's application-command format.
pub fn post_command() -> Value {
    json!({
        "name": COMMAND_NAME,
        "description": "Publish to the website via pull request",
        "type": 1,
        "options": [
            {
                "type": OPTION_SUB_COMMAND,
                "name": "note",
                "description": "Short note"
            },
            {
                "type": OPTION_SUB_COMMAND,
                "name": "response",
                "description": "Reply to, repost, or like a page",
                "options": [{
                    "type": OPTION_STRING,
                    "name": FIELD_RESPONSE_TYPE,
                    "description": "Kind of response",
                    "required": true,
                    "choices": [
                        {"name": "Reply", "value": "reply"},
                        {"name": "Repost", "value": "repost"},
                        {"name": "Like", "value": "like"}
                    ]
                }]
            },
            {
                "type": OPTION_SUB_COMMAND,
                "name": "bookmark",
                "description": "Save a link"
            },
            {
                "type": OPTION_SUB_COMMAND,
                "name": "media",
                "description": "Publish an image, video, or audio clip",
                "options": [
                    {
                        "type": OPTION_ATTACHMENT,
                        "name": FIELD_ATTACHMENT,
                        "description": "File to publish",
                        "required": true
                    },
                    {
                        "type": OPTION_STRING,
                        "name": FIELD_MEDIA_TYPE,
                        "description": "Defaults to the file's type",
                        "choices": [
                            {"name": "Image", "value": "image"},
                            {"name": "Video", "value": "video"},
                            {"name": "Audio", "value": "audio"}
                        ]
                    },
                    {
                        "type": OPTION_STRING,
                        "name": FIELD_ASPECT_RATIO,
                        "description": "Defaults to landscape",
                        "choices": [
                            {"name": "Landscape", "value": "landscape"},
                            {"name": "Portrait", "value": "portrait"},
                            {"name": "Square", "value": "square"}
                        ]
                    }
                ]
            }
        ]
    })
}

/// One text input wrapped in its action row.
fn input(id: &str, label: &str, style: u8, required: bool, value: Option<&str>) -> Value {
    let mut input = json!({
        "type": 4,
        "custom_id": id,
        "label": label,
        "style": style,
        "required": required,
    });
    if let Some(v) = value {
        input["value"] = json!(v);
    }
    json!({ "type": 1, "components": [input] })
}

/// Build the publish form for a submission. At most five inputs per modal.
///
/// `target_url` is not marked required; a missing URL comes back from the
/// content generator together with any other schema problems.
///
/// The media form has no slug input: its five slots go to title, media URL,
/// alt text, caption and tags, so media slugs always come from the title.
pub fn post_modal(submission: &Submission, media_url: Option<&str>) -> Value {
    let rows = match submission.post_type {
        PostType::Note => vec![
            input(FIELD_TITLE, "Title", SHORT, true, None),
            input(FIELD_CONTENT, "Content", PARAGRAPH, true, None),
            input(FIELD_TAGS, "Tags (comma separated)", SHORT, false, None),
            input(FIELD_SLUG, "Slug (defaults to title)", SHORT, false, None),
        ],
        PostType::Response | PostType::Bookmark => vec![
            input(
                FIELD_TITLE,
                "Title",
                SHORT,
                submission.post_type == PostType::Bookmark,
                None,
            ),
            input(FIELD_TARGET_URL, "Target URL", SHORT, false, None),
            input(FIELD_CONTENT, "Comment", PARAGRAPH, false, None),
            input(FIELD_TAGS, "Tags (comma separated)", SHORT, false, None),
            input(FIELD_SLUG, "Slug (defaults to title)", SHORT, false, None),
        ],
        PostType::Media => vec![
            input(FIELD_TITLE, "Title", SHORT, true, None),
            input(FIELD_MEDIA_URL, "Media URL", SHORT, true, media_url),
            input(FIELD_ALT_TEXT, "Alt text", SHORT, false, None),
            input(FIELD_CONTENT, "Caption", PARAGRAPH, false, None),
            input(FIELD_TAGS, "Tags (comma separated)", SHORT, false, None),
        ],
    };

    json!({
        "custom_id": submission.custom_id(),
        "title": format!("New {}", submission.post_type),
        "components": rows,
    })
}

/// Overwrite the application's global commands with `/post`.
pub async fn register_commands(
    client: &reqwest::Client,
    api_base: &str,
    application_id: &str,
    bot_token: Option<&str>,
) -> Result<usize, DiscordError> {
    let token = bot_token.ok_or(DiscordError::NoToken)?;
    let url = format!(
        "{}/applications/{}/commands",
        api_base.trim_end_matches('/'),
        application_id
    );

    let resp = client
        .put(&url)
        .header("Authorization", format!("Bot {token}"))
        .json(&json!([post_command()]))
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "failed to register slash commands");
        return Err(DiscordError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let registered: Vec<Value> = resp.json().await?;
    info!(count = registered.len(), "registered global slash commands");
    Ok(registered.len())
}
