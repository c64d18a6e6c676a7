//! User entity.

use crate::snowflake::Snowflake;
use serde::{Deserialize, Serialize};

/// A platform user, as sent inside message and invite payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    /// True for application-owned accounts.
    #[serde(default)]
    pub bot: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// "name#discriminator" handle, or just the name when no discriminator is set.
    pub fn tag(&self) -> String {
        if self.discriminator.is_empty() || self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }
}
