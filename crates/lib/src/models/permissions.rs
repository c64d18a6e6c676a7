//! Permission bit sets. The wire encodes these as stringified u64s.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{BitAnd, BitOr};

/// A set of permission bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions(pub u64);

impl Permissions {
    pub const CREATE_INSTANT_INVITE: Self = Self(1);
    pub const KICK_MEMBERS: Self = Self(1 << 1);
    pub const BAN_MEMBERS: Self = Self(1 << 2);
    pub const ADMINISTRATOR: Self = Self(1 << 3);
    pub const MANAGE_CHANNELS: Self = Self(1 << 4);
    pub const MANAGE_GUILD: Self = Self(1 << 5);
    pub const VIEW_CHANNEL: Self = Self(1 << 10);
    pub const SEND_MESSAGES: Self = Self(1 << 11);
    pub const MANAGE_MESSAGES: Self = Self(1 << 13);
    pub const READ_MESSAGE_HISTORY: Self = Self(1 << 16);
    pub const MANAGE_ROLES: Self = Self(1 << 28);
    pub const MANAGE_THREADS: Self = Self(1 << 34);

    pub const fn empty() -> Self {
        Self(0)
    }

    /// True when every bit in `other` is set in `self`.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Permissions {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct PermissionsVisitor;

impl Visitor<'_> for PermissionsVisitor {
    type Value = Permissions;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a permission bit set as a string or integer")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Permissions(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map(Permissions).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PermissionsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_and_combine() {
        let set = Permissions::SEND_MESSAGES | Permissions::MANAGE_MESSAGES;
        assert!(set.contains(Permissions::SEND_MESSAGES));
        assert!(!set.contains(Permissions::ADMINISTRATOR));
        assert!(set.contains(Permissions::empty()));
    }

    #[test]
    fn wire_string_round_trip() {
        let set: Permissions = serde_json::from_str("\"8192\"").expect("string bits");
        assert_eq!(set, Permissions::MANAGE_MESSAGES);
        assert_eq!(serde_json::to_string(&set).expect("serialize"), "\"8192\"");
    }
}
