//! Invite entity and invite creation payloads.

use crate::models::user::User;
use crate::snowflake::Snowflake;
use serde::{Deserialize, Serialize};

/// A channel invite, with metadata where the API provides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invite {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inviter: Option<User>,
    #[serde(default)]
    pub uses: u32,
    #[serde(default)]
    pub max_uses: u32,
    /// Lifetime in seconds; 0 means the invite never expires.
    #[serde(default)]
    pub max_age: u32,
    #[serde(default)]
    pub temporary: bool,
}

/// Invite target kind, for stream and embedded-application invites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum InviteTargetKind {
    Stream,
    EmbeddedApplication,
    Unknown(u8),
}

impl From<u8> for InviteTargetKind {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Stream,
            2 => Self::EmbeddedApplication,
            other => Self::Unknown(other),
        }
    }
}

impl From<InviteTargetKind> for u8 {
    fn from(value: InviteTargetKind) -> Self {
        match value {
            InviteTargetKind::Stream => 1,
            InviteTargetKind::EmbeddedApplication => 2,
            InviteTargetKind::Unknown(other) => other,
        }
    }
}

/// Invite creation payload (POST /channels/{id}/invites).
#[derive(Debug, Clone, Serialize)]
pub struct CreateInvite {
    pub max_age: u32,
    pub max_uses: u32,
    pub temporary: bool,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<InviteTargetKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user_id: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_application_id: Option<Snowflake>,
}

impl Default for CreateInvite {
    fn default() -> Self {
        Self {
            max_age: 86_400,
            max_uses: 0,
            temporary: false,
            unique: false,
            target_type: None,
            target_user_id: None,
            target_application_id: None,
        }
    }
}
