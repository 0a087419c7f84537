//! Inbound interaction payload, limited to the fields the pipeline reads.

use std::collections::HashMap;

use serde::Deserialize;

/// Interaction kinds Discord delivers to the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    MessageComponent,
    Autocomplete,
    ModalSubmit,
    Other(u8),
}

impl From<u8> for InteractionType {
    fn from(raw: u8) -> Self {
        match raw {
            1 => InteractionType::Ping,
            2 => InteractionType::ApplicationCommand,
            3 => InteractionType::MessageComponent,
            4 => InteractionType::Autocomplete,
            5 => InteractionType::ModalSubmit,
            other => InteractionType::Other(other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub application_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub data: Option<InteractionData>,
    /// Present for interactions inside a guild.
    #[serde(default)]
    pub member: Option<Member>,
    /// Present for interactions in DMs.
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractionData {
    /// Command name (application commands).
    #[serde(default)]
    pub name: Option<String>,
    /// Modal or component identifier (modal submits).
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub resolved: Option<Resolved>,
}

/// Option types used by the `/post` command.
pub const OPTION_SUB_COMMAND: u8 = 1;
pub const OPTION_SUB_COMMAND_GROUP: u8 = 2;
pub const OPTION_STRING: u8 = 3;
pub const OPTION_ATTACHMENT: u8 = 11;

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    /// Strings, numbers, booleans, or an attachment snowflake.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    pub fn is_subcommand(&self) -> bool {
        matches!(self.kind, OPTION_SUB_COMMAND | OPTION_SUB_COMMAND_GROUP)
    }

    /// Option value rendered as text; numbers and booleans are stringified.
    pub fn value_text(&self) -> Option<String> {
        match self.value.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Modal components arrive as action rows (type 1) wrapping text inputs (type 4).
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub components: Vec<Component>,
}

/// Entities referenced by ID elsewhere in the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resolved {
    #[serde(default)]
    pub attachments: HashMap<String, Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Per-request identifiers the background job needs once the payload itself
/// is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionContext {
    pub interaction_id: String,
    pub application_id: String,
    /// Callback token for follow-up messages (valid for 15 minutes).
    pub token: String,
    pub user_id: Option<String>,
}

impl Interaction {
    /// Invoking user, whether the interaction came from a guild or a DM.
    pub fn user_id(&self) -> Option<&str> {
        self.member
            .as_ref()
            .map(|m| m.user.id.as_str())
            .or_else(|| self.user.as_ref().map(|u| u.id.as_str()))
    }

    pub fn context(&self) -> InteractionContext {
        InteractionContext {
            interaction_id: self.id.clone(),
            application_id: self.application_id.clone(),
            token: self.token.clone(),
            user_id: self.user_id().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_parses_without_data() {
        let json = r#"{"id":"1","application_id":"2","type":1,"token":"t"}"#;
        let interaction: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(interaction.kind, InteractionType::Ping);
        assert!(interaction.data.is_none());
        assert_eq!(interaction.user_id(), None);
    }

    #[test]
    fn guild_member_takes_precedence_for_user_id() {
        let json = r#"{
            "id":"1","application_id":"2","type":2,"token":"t",
            "member":{"user":{"id":"42","username":"ana"}},
            "data":{"name":"post","options":[]}
        }"#;
        let interaction: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(interaction.user_id(), Some("42"));
        assert_eq!(interaction.context().user_id.as_deref(), Some("42"));
    }

    #[test]
    fn unknown_interaction_type_is_kept() {
        let json = r#"{"id":"1","application_id":"2","type":9,"token":"t"}"#;
        let interaction: Interaction = serde_json::from_str(json).unwrap();
        assert_eq!(interaction.kind, InteractionType::Other(9));
    }

    #[test]
    fn non_string_option_values_are_stringified() {
        let opt = CommandOption {
            name: "count".into(),
            kind: 4,
            value: Some(serde_json::json!(3)),
            options: Vec::new(),
        };
        assert_eq!(opt.value_text().as_deref(), Some("3"));
    }
}
