//! Interaction response bodies returned synchronously from the webhook.

use serde_json::{json, Value};

/// Message flag that hides a response from everyone but the invoker.
const EPHEMERAL: u64 = 1 << 6;

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionResponse {
    /// Answer to a PING (type 1).
    Pong,
    /// Immediate message (type 4).
    Message { content: String, ephemeral: bool },
    /// "Thinking…" placeholder; the real answer arrives as a follow-up (type 5).
    Deferred,
    /// Open a form (type 9). The value is the modal object.
    Modal(Value),
}

impl InteractionResponse {
    pub fn ephemeral(content: impl Into<String>) -> Self {
        InteractionResponse::Message {
            content: content.into(),
            ephemeral: true,
        }
    }

    /// Numeric response type as sent on the wire.
    pub fn kind(&self) -> u8 {
        match self {
            InteractionResponse::Pong => 1,
            InteractionResponse::Message { .. } => 4,
            InteractionResponse::Deferred => 5,
            InteractionResponse::Modal(_) => 9,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            InteractionResponse::Pong | InteractionResponse::Deferred => {
                json!({ "type": self.kind() })
            }
            InteractionResponse::Message { content, ephemeral } => {
                let mut data = json!({ "content": content });
                if *ephemeral {
                    data["flags"] = json!(EPHEMERAL);
                }
                json!({ "type": self.kind(), "data": data })
            }
            InteractionResponse::Modal(modal) => json!({ "type": self.kind(), "data": modal }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pong_and_deferred_have_no_data() {
        assert_eq!(InteractionResponse::Pong.to_json(), json!({"type": 1}));
        assert_eq!(InteractionResponse::Deferred.to_json(), json!({"type": 5}));
    }

    #[test]
    fn ephemeral_message_sets_flag() {
        let json = InteractionResponse::ephemeral("nope").to_json();
        assert_eq!(json["type"], 4);
        assert_eq!(json["data"]["content"], "nope");
        assert_eq!(json["data"]["flags"], 64);
    }

    #[test]
    fn public_message_has_no_flags() {
        let json = InteractionResponse::Message {
            content: "hi".into(),
            ephemeral: false,
        }
        .to_json();
        assert!(json["data"].get("flags").is_none());
    }
}
