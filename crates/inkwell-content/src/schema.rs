//! Per-type header schemas.
//!
//! One static [`Schema`] per [`PostType`]; the generator never branches on
//! the type itself, it walks the table.

use inkwell_core::{PostData, PostType};

/// Where a header field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// A fixed string, e.g. the `post_type` marker.
    Literal(&'static str),
    Title,
    TargetUrl,
    ResponseType,
    /// Publication timestamp in the site's offset.
    Published,
    /// Last-updated timestamp; equal to `Published` for a new post.
    Updated,
    Tags,
}

#[derive(Debug, Clone, Copy)]
pub struct HeaderField {
    pub name: &'static str,
    pub source: FieldSource,
}

/// A `PostData` field that must be present before anything is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Required {
    Title,
    Content,
    TargetUrl,
    ResponseType,
    MediaUrl,
}

impl Required {
    pub fn name(&self) -> &'static str {
        match self {
            Required::Title => "title",
            Required::Content => "content",
            Required::TargetUrl => "target_url",
            Required::ResponseType => "response_type",
            Required::MediaUrl => "media_url",
        }
    }

    pub fn is_present(&self, post: &PostData) -> bool {
        let value = match self {
            Required::Title => post.title.as_deref(),
            Required::Content => post.content.as_deref(),
            Required::TargetUrl => post.target_url.as_deref(),
            Required::ResponseType => return post.response_type.is_some(),
            Required::MediaUrl => post.media_url.as_deref(),
        };
        value.is_some_and(|v| !v.trim().is_empty())
    }
}

#[derive(Debug)]
pub struct Schema {
    pub post_type: PostType,
    /// Content folder in the site repository.
    pub directory: &'static str,
    pub header: &'static [HeaderField],
    pub required: &'static [Required],
}

const fn field(name: &'static str, source: FieldSource) -> HeaderField {
    HeaderField { name, source }
}

static NOTE: Schema = Schema {
    post_type: PostType::Note,
    directory: "_src/notes",
    header: &[
        field("post_type", FieldSource::Literal("note")),
        field("title", FieldSource::Title),
        field("published_date", FieldSource::Published),
        field("tags", FieldSource::Tags),
    ],
    required: &[Required::Title, Required::Content],
};

static RESPONSE: Schema = Schema {
    post_type: PostType::Response,
    directory: "_src/responses",
    header: &[
        field("title", FieldSource::Title),
        field("targeturl", FieldSource::TargetUrl),
        field("response_type", FieldSource::ResponseType),
        field("dt_published", FieldSource::Published),
        field("dt_updated", FieldSource::Updated),
        field("tags", FieldSource::Tags),
    ],
    required: &[Required::TargetUrl, Required::ResponseType],
};

static BOOKMARK: Schema = Schema {
    post_type: PostType::Bookmark,
    directory: "_src/bookmarks",
    header: &[
        field("title", FieldSource::Title),
        field("targeturl", FieldSource::TargetUrl),
        field("response_type", FieldSource::Literal("bookmark")),
        field("dt_published", FieldSource::Published),
        field("dt_updated", FieldSource::Updated),
        field("tags", FieldSource::Tags),
    ],
    required: &[Required::Title, Required::TargetUrl],
};

static MEDIA: Schema = Schema {
    post_type: PostType::Media,
    directory: "_src/media",
    header: &[
        field("post_type", FieldSource::Literal("media")),
        field("title", FieldSource::Title),
        field("published_date", FieldSource::Published),
        field("tags", FieldSource::Tags),
    ],
    required: &[Required::Title, Required::MediaUrl],
};

pub fn schema_for(post_type: PostType) -> &'static Schema {
    match post_type {
        PostType::Note => &NOTE,
        PostType::Response => &RESPONSE,
        PostType::Bookmark => &BOOKMARK,
        PostType::Media => &MEDIA,
    }
}

impl Schema {
    /// Names of every required field `post` lacks, in table order.
    pub fn missing(&self, post: &PostData) -> Vec<&'static str> {
        self.required
            .iter()
            .filter(|r| !r.is_present(post))
            .map(Required::name)
            .collect()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.header.iter().map(|f| f.name)
    }
}
