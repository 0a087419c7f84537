//! Working-branch names: `{source}/{YYYY-MM-DD}/{post_type}/{short id}`.

use chrono::{DateTime, FixedOffset, Utc};
use inkwell_core::PostType;

/// Length of the random suffix that keeps same-day branches apart.
const SHORT_ID_LEN: usize = 8;

pub fn branch_name(
    source: &str,
    post_type: PostType,
    now: DateTime<Utc>,
    offset: FixedOffset,
    short_id: &str,
) -> String {
    format!(
        "{}/{}/{}/{}",
        source,
        now.with_timezone(&offset).format("%Y-%m-%d"),
        post_type,
        short_id
    )
}

/// Fresh 8-hex-digit identifier.
pub fn short_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}
