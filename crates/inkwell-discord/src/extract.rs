//! Post data extraction.
//!
//! Field values are looked up by their declared identifier: the option
//! `name` for slash commands, the text input `custom_id` for modals.
//! Attachments never arrive inline. The option value is a snowflake that has
//! to be looked up in `resolved.attachments`, and a miss is a hard error.

use std::collections::HashMap;

use inkwell_core::error::{ExtractionError, FieldProblem};
use inkwell_core::{AspectRatio, MediaType, PostData, PostType, ResponseType};

use crate::interaction::{
    Attachment, CommandOption, Component, InteractionData, OPTION_ATTACHMENT,
};

/// Prefix of every modal `custom_id` this service issues.
pub const MODAL_PREFIX: &str = "publish";

pub const FIELD_TITLE: &str = "title";
pub const FIELD_CONTENT: &str = "content";
pub const FIELD_TAGS: &str = "tags";
pub const FIELD_SLUG: &str = "slug";
pub const FIELD_TARGET_URL: &str = "target_url";
pub const FIELD_MEDIA_URL: &str = "media_url";
pub const FIELD_ALT_TEXT: &str = "alt_text";
pub const FIELD_ATTACHMENT: &str = "attachment";
pub const FIELD_RESPONSE_TYPE: &str = "response_type";
pub const FIELD_MEDIA_TYPE: &str = "media_type";
pub const FIELD_ASPECT_RATIO: &str = "aspect_ratio";

/// Everything a modal needs to carry from the command that opened it.
///
/// Encoded in the modal `custom_id` as `publish:<type>[:<arg>...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub post_type: PostType,
    pub response_type: Option<ResponseType>,
    pub media_type: Option<MediaType>,
    pub aspect_ratio: Option<AspectRatio>,
}

impl Submission {
    pub fn new(post_type: PostType) -> Self {
        Self {
            post_type,
            response_type: None,
            media_type: None,
            aspect_ratio: None,
        }
    }

    pub fn custom_id(&self) -> String {
        let mut id = format!("{MODAL_PREFIX}:{}", self.post_type);
        match self.post_type {
            PostType::Response => {
                let rt = self.response_type.unwrap_or(ResponseType::Reply);
                id.push(':');
                id.push_str(rt.as_str());
            }
            PostType::Media => {
                let mt = self.media_type.unwrap_or(MediaType::Image);
                let ar = self.aspect_ratio.unwrap_or(AspectRatio::Landscape);
                id.push_str(&format!(":{}:{}", mt.as_str(), ar.as_str()));
            }
            PostType::Note | PostType::Bookmark => {}
        }
        id
    }

    pub fn parse(custom_id: &str) -> Result<Self, FieldProblem> {
        let invalid = |reason: String| FieldProblem::Invalid {
            field: "custom_id".to_string(),
            reason,
        };

        let mut parts = custom_id.split(':');
        if parts.next() != Some(MODAL_PREFIX) {
            return Err(invalid(format!("{custom_id:?} is not a publish form")));
        }
        let post_type: PostType = parts
            .next()
            .ok_or_else(|| invalid("no post type".to_string()))?
            .parse()
            .map_err(invalid)?;

        let mut submission = Submission::new(post_type);
        match post_type {
            PostType::Response => {
                let rt = parts
                    .next()
                    .ok_or_else(|| invalid("no response type".to_string()))?;
                submission.response_type = Some(rt.parse().map_err(invalid)?);
            }
            PostType::Media => {
                let mt = parts
                    .next()
                    .ok_or_else(|| invalid("no media type".to_string()))?;
                let ar = parts
                    .next()
                    .ok_or_else(|| invalid("no aspect ratio".to_string()))?;
                submission.media_type = Some(mt.parse().map_err(invalid)?);
                submission.aspect_ratio = Some(ar.parse().map_err(invalid)?);
            }
            PostType::Note | PostType::Bookmark => {}
        }

        if let Some(extra) = parts.next() {
            return Err(invalid(format!("unexpected segment {extra:?}")));
        }
        Ok(submission)
    }
}

/// Flattened field values of one interaction, keyed by identifier.
#[derive(Debug, Default)]
pub struct FieldValues {
    values: HashMap<String, String>,
}

impl FieldValues {
    /// Walk command options (through subcommands) and modal components
    /// (through action rows). Blank values are treated as absent.
    pub fn collect(data: &InteractionData) -> Self {
        let mut values = HashMap::new();
        collect_options(&data.options, &mut values);
        collect_components(&data.components, &mut values);
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    fn owned(&self, field: &str) -> Option<String> {
        self.get(field).map(str::to_string)
    }
}

fn collect_options(options: &[CommandOption], out: &mut HashMap<String, String>) {
    for opt in options {
        if opt.is_subcommand() {
            collect_options(&opt.options, out);
        } else if let Some(value) = opt.value_text() {
            insert_non_blank(out, &opt.name, value);
        }
    }
}

fn collect_components(components: &[Component], out: &mut HashMap<String, String>) {
    for component in components {
        if let (Some(id), Some(value)) = (&component.custom_id, &component.value) {
            insert_non_blank(out, id, value.clone());
        }
        collect_components(&component.components, out);
    }
}

fn insert_non_blank(out: &mut HashMap<String, String>, key: &str, value: String) {
    let trimmed = value.trim();
    if !trimmed.is_empty() {
        out.insert(key.to_string(), trimmed.to_string());
    }
}

/// Look up the attachment referenced by the `field` option.
///
/// The option carries only an ID; the attachment itself must be present in
/// `data.resolved.attachments`. An ID with no entry there is an
/// [`FieldProblem::UnresolvedAttachment`], never an empty attachment.
pub fn resolve_attachment<'a>(
    data: &'a InteractionData,
    field: &str,
) -> Result<&'a Attachment, FieldProblem> {
    let id = find_attachment_id(&data.options, field).ok_or_else(|| FieldProblem::Missing {
        field: field.to_string(),
    })?;

    data.resolved
        .as_ref()
        .and_then(|r| r.attachments.get(&id))
        .ok_or(FieldProblem::UnresolvedAttachment {
            field: field.to_string(),
            id,
        })
}

fn find_attachment_id(options: &[CommandOption], field: &str) -> Option<String> {
    options.iter().find_map(|opt| {
        if opt.is_subcommand() {
            find_attachment_id(&opt.options, field)
        } else if opt.name == field && opt.kind == OPTION_ATTACHMENT {
            opt.value_text()
        } else {
            None
        }
    })
}

fn has_attachment_option(options: &[CommandOption]) -> bool {
    options.iter().any(|opt| {
        if opt.is_subcommand() {
            has_attachment_option(&opt.options)
        } else {
            opt.kind == OPTION_ATTACHMENT
        }
    })
}

/// What a `/post <type>` invocation asks for: the form to open, plus the
/// attachment URL to pre-fill for media posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub submission: Submission,
    pub media_url: Option<String>,
}

/// Read a `/post` command invocation.
pub fn command_request(data: &InteractionData) -> Result<CommandRequest, ExtractionError> {
    let sub = data
        .options
        .iter()
        .find(|o| o.is_subcommand())
        .ok_or_else(|| {
            ExtractionError::single(FieldProblem::Missing {
                field: "subcommand".to_string(),
            })
        })?;
    let post_type: PostType = sub.name.parse().map_err(|reason| {
        ExtractionError::single(FieldProblem::Invalid {
            field: "subcommand".to_string(),
            reason,
        })
    })?;

    let fields = FieldValues::collect(data);
    let mut problems = Vec::new();
    let mut submission = Submission::new(post_type);
    let mut media_url = None;

    match post_type {
        PostType::Response => {
            let choice = fields.get(FIELD_RESPONSE_TYPE).unwrap_or("reply");
            match ResponseType::from_choice(choice) {
                Some(rt) => submission.response_type = Some(rt),
                None => problems.push(FieldProblem::Invalid {
                    field: FIELD_RESPONSE_TYPE.to_string(),
                    reason: format!("{choice:?} is not one of reply, repost, like"),
                }),
            }
        }
        PostType::Media => {
            match resolve_attachment(data, FIELD_ATTACHMENT) {
                Ok(att) => {
                    media_url = Some(att.url.clone());
                    submission.media_type = att
                        .content_type
                        .as_deref()
                        .and_then(MediaType::from_content_type);
                }
                Err(problem) => problems.push(problem),
            }
            if let Some(raw) = fields.get(FIELD_MEDIA_TYPE) {
                match raw.parse::<MediaType>() {
                    Ok(mt) => submission.media_type = Some(mt),
                    Err(reason) => problems.push(FieldProblem::Invalid {
                        field: FIELD_MEDIA_TYPE.to_string(),
                        reason,
                    }),
                }
            }
            match fields.get(FIELD_ASPECT_RATIO).map(str::parse::<AspectRatio>) {
                Some(Ok(ar)) => submission.aspect_ratio = Some(ar),
                Some(Err(reason)) => problems.push(FieldProblem::Invalid {
                    field: FIELD_ASPECT_RATIO.to_string(),
                    reason,
                }),
                None => submission.aspect_ratio = Some(AspectRatio::Landscape),
            }
            submission.media_type.get_or_insert(MediaType::Image);
        }
        PostType::Note | PostType::Bookmark => {}
    }

    if problems.is_empty() {
        Ok(CommandRequest {
            submission,
            media_url,
        })
    } else {
        Err(ExtractionError { problems })
    }
}

/// Build a [`PostData`] from a modal submission.
///
/// Only structural problems are reported here (unknown form, unresolvable
/// attachment, malformed URL). Whether the post has every field its type
/// requires is the content generator's call.
pub fn extract_post(data: &InteractionData) -> Result<PostData, ExtractionError> {
    let custom_id = data.custom_id.as_deref().ok_or_else(|| {
        ExtractionError::single(FieldProblem::Missing {
            field: "custom_id".to_string(),
        })
    })?;
    let submission = Submission::parse(custom_id).map_err(ExtractionError::single)?;

    let fields = FieldValues::collect(data);
    let mut problems = Vec::new();
    let mut post = PostData::new(submission.post_type);

    post.title = fields.owned(FIELD_TITLE);
    post.content = fields.owned(FIELD_CONTENT);
    post.slug = fields.owned(FIELD_SLUG);
    if let Some(tags) = fields.get(FIELD_TAGS) {
        post.push_tags(tags.split(','));
    }

    if matches!(submission.post_type, PostType::Response | PostType::Bookmark) {
        post.target_url = fields.owned(FIELD_TARGET_URL);
        if let Some(url) = post.target_url.as_deref() {
            if let Err(problem) = check_url(FIELD_TARGET_URL, url) {
                problems.push(problem);
            }
        }
        post.response_type = submission.response_type;
    }

    if submission.post_type == PostType::Media {
        post.media_type = submission.media_type;
        post.aspect_ratio = submission.aspect_ratio;
        post.alt_text = fields.owned(FIELD_ALT_TEXT);

        // A submission carrying its own attachment option goes through the
        // resolved map; otherwise the pre-filled URL input is used.
        if has_attachment_option(&data.options) {
            match resolve_attachment(data, FIELD_ATTACHMENT) {
                Ok(att) => post.media_url = Some(att.url.clone()),
                Err(problem) => problems.push(problem),
            }
        } else {
            post.media_url = fields.owned(FIELD_MEDIA_URL);
        }
        if let Some(url) = post.media_url.as_deref() {
            if let Err(problem) = check_url(FIELD_MEDIA_URL, url) {
                problems.push(problem);
            }
        }
    }

    if problems.is_empty() {
        Ok(post)
    } else {
        Err(ExtractionError { problems })
    }
}

fn check_url(field: &str, url: &str) -> Result<(), FieldProblem> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !url.contains(char::is_whitespace) => Ok(()),
        _ => Err(FieldProblem::Invalid {
            field: field.to_string(),
            reason: format!("{url:?} is not an http(s) URL"),
        }),
    }
}
