//! Message entity and outbound message payloads.

use crate::models::user::User;
use crate::snowflake::Snowflake;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message flag bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageFlags(pub u64);

impl MessageFlags {
    pub const CROSSPOSTED: Self = Self(1);
    pub const IS_CROSSPOST: Self = Self(1 << 1);
    pub const SUPPRESS_EMBEDS: Self = Self(1 << 2);
    pub const SOURCE_MESSAGE_DELETED: Self = Self(1 << 3);
    pub const URGENT: Self = Self(1 << 4);
    pub const HAS_THREAD: Self = Self(1 << 5);
    pub const EPHEMERAL: Self = Self(1 << 6);
    /// Placeholder for a pending interactive response ("thinking" message).
    pub const LOADING: Self = Self(1 << 7);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A channel message, as decoded from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub author: User,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub flags: MessageFlags,
}

/// Outbound message payload (POST /channels/{id}/messages).
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts: Option<bool>,
    /// Id of the message this one replies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
}

impl CreateMessage {
    /// Plain text payload.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Reference to another message (replies).
#[derive(Debug, Clone, Serialize)]
pub struct MessageReference {
    pub message_id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Snowflake>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_contains() {
        let flags = MessageFlags(MessageFlags::LOADING.0 | MessageFlags::EPHEMERAL.0);
        assert!(flags.contains(MessageFlags::LOADING));
        assert!(!flags.contains(MessageFlags::URGENT));
    }

    #[test]
    fn decodes_wire_message() {
        let message: Message = serde_json::from_str(
            r#"{
                "id": "1005",
                "channel_id": "42",
                "author": {"id": "7", "username": "tester", "discriminator": "0", "bot": false},
                "content": "hello",
                "timestamp": "2022-01-15T10:30:00.000Z",
                "flags": 128
            }"#,
        )
        .expect("decode message");
        assert_eq!(message.id, Snowflake(1005));
        assert_eq!(message.author.id, Snowflake(7));
        assert!(message.flags.contains(MessageFlags::LOADING));
        assert!(!message.pinned);
    }
}
