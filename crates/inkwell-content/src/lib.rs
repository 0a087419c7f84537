//! Turns a normalized [`PostData`](inkwell_core::PostData) into the file the
//! site repository expects: a path chosen from the post type and slug, and a
//! document made of a header block and body.

pub mod generator;
pub mod schema;
pub mod slug;

pub use generator::{generate, Document};
pub use schema::{schema_for, Schema};
