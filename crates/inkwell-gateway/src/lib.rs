//! Discord interaction webhook that turns `/post` submissions into pull
//! requests against the site repository.

pub mod app;
pub mod http;
pub mod pipeline;

/// Revision this binary was built from, or "unknown" outside a checkout.
pub const GIT_SHA: &str = env!("INKWELL_GIT_SHA");

#[cfg(test)]
mod tests {
    use super::GIT_SHA;

    #[test]
    fn revision_is_a_single_token() {
        assert!(!GIT_SHA.is_empty());
        assert!(!GIT_SHA.contains(char::is_whitespace), "{GIT_SHA:?}");
    }
}
