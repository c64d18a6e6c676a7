//! Role entity and role edit payloads.

use crate::models::permissions::Permissions;
use crate::snowflake::Snowflake;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

/// Ownership tags on a role. `premium_subscriber` is encoded as a bare
/// `null` when set and omitted entirely when not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<Snowflake>,
    #[serde(default, deserialize_with = "presence_flag", skip_serializing)]
    pub premium_subscriber: bool,
}

fn presence_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    serde::de::IgnoredAny::deserialize(deserializer)?;
    Ok(true)
}

/// A guild role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub color: u32,
    /// Displayed separately in the member list.
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub position: i64,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<RoleTags>,
}

impl Role {
    pub fn is_bot_managed(&self) -> bool {
        self.tags.as_ref().is_some_and(|t| t.bot_id.is_some())
    }

    pub fn is_integration(&self) -> bool {
        self.tags.as_ref().is_some_and(|t| t.integration_id.is_some())
    }

    pub fn is_premium(&self) -> bool {
        self.tags.as_ref().is_some_and(|t| t.premium_subscriber)
    }
}

/// Role edit payload (PATCH /guilds/{gid}/roles/{rid}). Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditRole {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentionable: Option<bool>,
    /// Icon as an image-data URI; build with [`to_image_data`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Encode raw image bytes as the `data:<mime>;base64,...` URI the API
/// expects for icon and avatar uploads.
pub fn to_image_data(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_tag_is_presence_encoded() {
        let premium: RoleTags =
            serde_json::from_str(r#"{"premium_subscriber": null}"#).expect("decode tags");
        assert!(premium.premium_subscriber);

        let plain: RoleTags = serde_json::from_str(r#"{"bot_id": "77"}"#).expect("decode tags");
        assert!(!plain.premium_subscriber);
        assert_eq!(plain.bot_id, Some(Snowflake(77)));
    }

    #[test]
    fn role_predicates() {
        let role: Role = serde_json::from_str(
            r#"{"id": "3", "name": "Bots", "permissions": "8", "tags": {"bot_id": "77"}}"#,
        )
        .expect("decode role");
        assert!(role.is_bot_managed());
        assert!(!role.is_integration());
        assert!(!role.is_premium());
        assert!(role.permissions.contains(Permissions::ADMINISTRATOR));
    }

    #[test]
    fn image_data_uri() {
        let uri = to_image_data("image/png", b"abc");
        assert_eq!(uri, "data:image/png;base64,YWJj");
    }
}
