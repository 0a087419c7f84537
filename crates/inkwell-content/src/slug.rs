//! Slug and file-path derivation.
//!
//! An explicit slug wins over the title; both go through the same
//! sanitization. Paths carry no date prefix: the target repository files
//! posts as `{directory}/{slug}.{ext}`.

use inkwell_core::{PostData, PostType};

use crate::schema::schema_for;

/// Lower-case, collapse every run of non-alphanumeric characters into one
/// `-`, and trim separators from both ends. Letters and digits from any
/// script are kept as-is.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for c in raw.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }

    out
}

/// Pick the slug for a post: explicit `slug` first, then `title`.
///
/// Returns `None` when neither yields any usable characters.
pub fn resolve(post: &PostData) -> Option<String> {
    [post.slug.as_deref(), post.title.as_deref()]
        .into_iter()
        .flatten()
        .map(sanitize)
        .find(|s| !s.is_empty())
}

/// `{directory}/{slug}.{extension}` for the given post type.
pub fn file_path(post_type: PostType, slug: &str, extension: &str) -> String {
    format!("{}/{}.{}", schema_for(post_type).directory, slug, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_lowercased_and_hyphenated() {
        assert_eq!(sanitize("Hello, World!"), "hello-world");
        assert_eq!(sanitize("  Rust 2024 -- edition  "), "rust-2024-edition");
        assert_eq!(sanitize("!!!"), "");
    }

    #[test]
    fn accented_letters_are_kept() {
        assert_eq!(sanitize("Crème Brûlée"), "crème-brûlée");
        assert_eq!(sanitize("Ärger über Öl"), "ärger-über-öl");
    }

    #[test]
    fn non_latin_title_still_yields_a_slug() {
        let mut post = PostData::new(PostType::Note);
        post.title = Some("日本語のメモ".into());
        assert_eq!(resolve(&post).as_deref(), Some("日本語のメモ"));

        post.title = Some("Заметка, дня".into());
        assert_eq!(resolve(&post).as_deref(), Some("заметка-дня"));
    }

    #[test]
    fn explicit_slug_wins_over_title() {
        let mut post = PostData::new(PostType::Note);
        post.title = Some("Something Else Entirely".into());
        post.slug = Some("custom-name".into());

        let slug = resolve(&post).unwrap();
        assert_eq!(file_path(PostType::Note, &slug, "md"), "_src/notes/custom-name.md");
    }

    #[test]
    fn explicit_slug_is_sanitized_too() {
        let mut post = PostData::new(PostType::Bookmark);
        post.slug = Some("My Custom_Name".into());
        assert_eq!(resolve(&post).as_deref(), Some("my-custom-name"));
    }

    #[test]
    fn falls_back_to_title_without_date_prefix() {
        let mut post = PostData::new(PostType::Note);
        post.title = Some("Hello, World!".into());
        assert_eq!(resolve(&post).as_deref(), Some("hello-world"));
    }

    #[test]
    fn unusable_slug_falls_back_to_title() {
        let mut post = PostData::new(PostType::Media);
        post.slug = Some("???".into());
        post.title = Some("Sunset".into());
        assert_eq!(resolve(&post).as_deref(), Some("sunset"));
    }

    #[test]
    fn nothing_usable_yields_none() {
        let post = PostData::new(PostType::Response);
        assert_eq!(resolve(&post), None);
    }

    #[test]
    fn each_type_has_its_own_directory() {
        assert_eq!(file_path(PostType::Response, "x", "md"), "_src/responses/x.md");
        assert_eq!(file_path(PostType::Bookmark, "x", "md"), "_src/bookmarks/x.md");
        assert_eq!(file_path(PostType::Media, "x", "md"), "_src/media/x.md");
    }
}
