//! Document rendering.
//!
//! Validation always runs first: a `Document` can only be obtained from
//! [`generate`], so anything that holds one has passed the schema's
//! required-field check.

use chrono::{DateTime, FixedOffset, Utc};
use inkwell_core::error::ValidationError;
use inkwell_core::{MediaType, PostData, PostType};
use tracing::debug;

use crate::schema::{schema_for, FieldSource};
use crate::slug;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M %:z";

/// A rendered, schema-valid document and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    post_type: PostType,
    path: String,
    title: String,
    text: String,
    checked: Vec<&'static str>,
    tag_count: usize,
}

impl Document {
    pub fn post_type(&self) -> PostType {
        self.post_type
    }

    /// Repository-relative path, e.g. `_src/notes/hello-world.md`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Full file contents: header block, blank line, body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Required fields that were checked before rendering.
    pub fn checked_fields(&self) -> &[&'static str] {
        &self.checked
    }

    pub fn tag_count(&self) -> usize {
        self.tag_count
    }
}

/// Validate `post` against its schema and render it.
///
/// Every missing required field is reported at once. `now` is converted to
/// `offset` for all timestamp fields.
pub fn generate(
    post: &PostData,
    offset: FixedOffset,
    extension: &str,
    now: DateTime<Utc>,
) -> Result<Document, ValidationError> {
    let schema = schema_for(post.post_type());

    let mut missing = schema.missing(post);
    let slug = slug::resolve(post);
    if slug.is_none() {
        missing.push("slug");
    }
    let (Some(slug), true) = (slug, missing.is_empty()) else {
        return Err(ValidationError {
            post_type: post.post_type(),
            missing,
        });
    };

    let timestamp = now.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string();

    let mut text = String::from("---\n");
    for field in schema.header {
        let value = match field.source {
            FieldSource::Literal(s) => quote(s),
            FieldSource::Title => quote(post.title.as_deref().unwrap_or_default().trim()),
            FieldSource::TargetUrl => quote(post.target_url.as_deref().unwrap_or_default().trim()),
            FieldSource::ResponseType => {
                quote(post.response_type.map(|r| r.as_str()).unwrap_or_default())
            }
            FieldSource::Published | FieldSource::Updated => quote(&timestamp),
            FieldSource::Tags => inline_array(&post.tags),
        };
        text.push_str(field.name);
        text.push_str(": ");
        text.push_str(&value);
        text.push('\n');
    }
    text.push_str("---\n\n");
    text.push_str(&body(post));

    let path = slug::file_path(post.post_type(), &slug, extension);
    debug!(path = %path, post_type = %post.post_type(), "document rendered");

    Ok(Document {
        post_type: post.post_type(),
        path,
        title: post.title.as_deref().unwrap_or_default().trim().to_string(),
        text,
        checked: schema.required.iter().map(|r| r.name()).collect(),
        tag_count: post.tags.len(),
    })
}

fn body(post: &PostData) -> String {
    let content = post.content.as_deref().unwrap_or_default().trim();
    let mut out = String::new();

    if post.post_type() == PostType::Media {
        let media_type = post.media_type.unwrap_or(MediaType::Image);
        let aspect = post
            .aspect_ratio
            .map(|a| a.as_str())
            .unwrap_or("landscape");
        out.push_str(":::media\n");
        out.push_str(&format!(
            "- url: {}\n",
            quote(post.media_url.as_deref().unwrap_or_default().trim())
        ));
        out.push_str(&format!("  mediaType: {}\n", quote(media_type.as_str())));
        out.push_str(&format!("  aspectRatio: {}\n", quote(aspect)));
        out.push_str(&format!(
            "  alt: {}\n",
            quote(post.alt_text.as_deref().unwrap_or_default().trim())
        ));
        out.push_str(":::media\n");
        if !content.is_empty() {
            out.push('\n');
        }
    }

    if !content.is_empty() {
        out.push_str(content);
        out.push('\n');
    }
    out
}

/// Double-quoted scalar. The escapes used are valid in both JSON and YAML
/// double-quoted strings.
fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `["a","b"]`, never a block list; the site renderer only accepts this form.
fn inline_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
    format!("[{}]", quoted.join(","))
}
