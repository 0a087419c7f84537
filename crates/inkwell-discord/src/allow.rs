//! Publisher allowlist.
//!
//! Deny-by-default: an empty `authorized_users` list means no one may publish.
//! Wildcard `"*"` allows everyone. Entries are Discord user IDs (snowflakes).

/// Returns `true` when the given Discord user may publish.
pub fn is_authorized(authorized_users: &[String], user_id: &str) -> bool {
    if user_id.is_empty() {
        return false;
    }
    authorized_users.iter().any(|entry| {
        let entry = entry.trim();
        entry == "*" || entry == user_id
    })
}
