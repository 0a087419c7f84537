//! Hosting-platform side of publishing: the [`HostingPlatform`] seam, its
//! GitHub REST implementation, and the branch → commit → pull request
//! [`Publisher`].

pub mod branch;
pub mod client;
pub mod error;
pub mod host;
pub mod publisher;

pub use client::GitHubClient;
pub use error::HostingError;
pub use host::{CommitRef, HostingPlatform, PullRequestDraft};
pub use publisher::Publisher;
