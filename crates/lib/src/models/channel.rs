//! Channel entity, kinds, and permission overwrites.

use crate::models::permissions::Permissions;
use crate::snowflake::Snowflake;
use serde::{Deserialize, Serialize};

/// Channel kind, an integer code on the wire. Unrecognized codes are kept
/// as `Unknown` so newer server-side kinds survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelKind {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildNews,
    GuildStore,
    NewsThread,
    PublicThread,
    PrivateThread,
    GuildStageVoice,
    Unknown(u8),
}

impl From<u8> for ChannelKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::GuildText,
            1 => Self::Dm,
            2 => Self::GuildVoice,
            3 => Self::GroupDm,
            4 => Self::GuildCategory,
            5 => Self::GuildNews,
            6 => Self::GuildStore,
            10 => Self::NewsThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::GuildStageVoice,
            other => Self::Unknown(other),
        }
    }
}

impl From<ChannelKind> for u8 {
    fn from(value: ChannelKind) -> Self {
        match value {
            ChannelKind::GuildText => 0,
            ChannelKind::Dm => 1,
            ChannelKind::GuildVoice => 2,
            ChannelKind::GroupDm => 3,
            ChannelKind::GuildCategory => 4,
            ChannelKind::GuildNews => 5,
            ChannelKind::GuildStore => 6,
            ChannelKind::NewsThread => 10,
            ChannelKind::PublicThread => 11,
            ChannelKind::PrivateThread => 12,
            ChannelKind::GuildStageVoice => 13,
            ChannelKind::Unknown(other) => other,
        }
    }
}

impl ChannelKind {
    /// True for thread kinds.
    pub fn is_thread(self) -> bool {
        matches!(self, Self::NewsThread | Self::PublicThread | Self::PrivateThread)
    }

    /// True for kinds that carry a message history.
    pub fn is_messageable(self) -> bool {
        !matches!(
            self,
            Self::GuildVoice | Self::GuildCategory | Self::GuildStore | Self::GuildStageVoice
        )
    }
}

/// Who a permission overwrite applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OverwriteKind {
    Role,
    Member,
    Unknown(u8),
}

impl From<u8> for OverwriteKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Role,
            1 => Self::Member,
            other => Self::Unknown(other),
        }
    }
}

impl From<OverwriteKind> for u8 {
    fn from(value: OverwriteKind) -> Self {
        match value {
            OverwriteKind::Role => 0,
            OverwriteKind::Member => 1,
            OverwriteKind::Unknown(other) => other,
        }
    }
}

/// Per-role or per-member permission override on a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: OverwriteKind,
    #[serde(default)]
    pub allow: Permissions,
    #[serde(default)]
    pub deny: Permissions,
}

/// A channel, as decoded from the API. Fields that only apply to some kinds
/// are optional and default when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<Snowflake>,
    /// Slowmode interval in seconds; 0 disables it.
    #[serde(default)]
    pub rate_limit_per_user: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Snowflake>,
    #[serde(default)]
    pub permission_overwrites: Vec<PermissionOverwrite>,
}

/// Channel edit payload (PATCH /channels/{id}). Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditChannel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nsfw: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_per_user: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Snowflake>,
}
