use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of content being published. Closed set; every per-type behaviour is
/// driven by tables keyed on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Note,
    Response,
    Bookmark,
    Media,
}

impl PostType {
    pub const ALL: [PostType; 4] = [
        PostType::Note,
        PostType::Response,
        PostType::Bookmark,
        PostType::Media,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Note => "note",
            PostType::Response => "response",
            PostType::Bookmark => "bookmark",
            PostType::Media => "media",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PostType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown post type {s:?}"))
    }
}

/// Response flavour, stored in the site's own vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Reply,
    Reshare,
    Star,
}

impl ResponseType {
    /// Map a slash-command choice label to the stored value.
    ///
    /// The command offers `reply` / `repost` / `like`; the site expects
    /// `reply` / `reshare` / `star`.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "reply" => Some(ResponseType::Reply),
            "repost" => Some(ResponseType::Reshare),
            "like" => Some(ResponseType::Star),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Reply => "reply",
            ResponseType::Reshare => "reshare",
            ResponseType::Star => "star",
        }
    }
}

impl FromStr for ResponseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reply" => Ok(ResponseType::Reply),
            "reshare" => Ok(ResponseType::Reshare),
            "star" => Ok(ResponseType::Star),
            other => Err(format!("unknown response type {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Audio => "audio",
        }
    }

    /// Best guess from an attachment's MIME type.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.starts_with("image/") {
            Some(MediaType::Image)
        } else if content_type.starts_with("video/") {
            Some(MediaType::Video)
        } else if content_type.starts_with("audio/") {
            Some(MediaType::Audio)
        } else {
            None
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            "audio" => Ok(MediaType::Audio),
            other => Err(format!("unknown media type {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    Landscape,
    Portrait,
    Square,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Square => "square",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "landscape" => Ok(AspectRatio::Landscape),
            "portrait" => Ok(AspectRatio::Portrait),
            "square" => Ok(AspectRatio::Square),
            other => Err(format!("unknown aspect ratio {other:?}")),
        }
    }
}

/// Normalized submission, built per interaction and dropped once published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    post_type: PostType,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub slug: Option<String>,
    pub target_url: Option<String>,
    pub response_type: Option<ResponseType>,
    pub media_url: Option<String>,
    pub alt_text: Option<String>,
    pub media_type: Option<MediaType>,
    pub aspect_ratio: Option<AspectRatio>,
}

impl PostData {
    pub fn new(post_type: PostType) -> Self {
        Self {
            post_type,
            title: None,
            content: None,
            tags: Vec::new(),
            slug: None,
            target_url: None,
            response_type: None,
            media_url: None,
            alt_text: None,
            media_type: None,
            aspect_ratio: None,
        }
    }

    /// The post type is fixed at construction.
    pub fn post_type(&self) -> PostType {
        self.post_type
    }

    /// Add tags keeping first-seen order and dropping blanks and duplicates.
    pub fn push_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !self.tags.iter().any(|t| t == tag) {
                self.tags.push(tag.to_string());
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStatus {
    /// Branch, commit and pull request all exist.
    PullRequestOpened,
}

/// Pull request as reported back by the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub number: u64,
    pub url: String,
}

/// Outcome of a successful publish, delivered to the user in the follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub status: PublishStatus,
    pub file_path: String,
    pub branch: String,
    pub commit_sha: String,
    pub pull_request: PullRequestRef,
}
