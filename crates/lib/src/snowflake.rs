//! Snowflake ids: 64-bit values whose high 42 bits encode a creation
//! timestamp in milliseconds relative to the platform epoch.

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Milliseconds between the Unix epoch and the platform epoch (2015-01-01T00:00:00Z).
pub const PLATFORM_EPOCH_MS: u64 = 1_420_070_400_000;

/// A 64-bit platform id. Ordering follows creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Snowflake(pub u64);

impl Snowflake {
    /// Milliseconds since the Unix epoch encoded in the id.
    pub fn timestamp_ms(self) -> u64 {
        (self.0 >> 22) + PLATFORM_EPOCH_MS
    }

    /// Creation time encoded in the id.
    pub fn timestamp(self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp_ms() as i64)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Smallest snowflake whose embedded time is `ms` (Unix milliseconds).
    /// Times before the platform epoch clamp to id 0.
    pub fn from_timestamp_ms(ms: u64) -> Self {
        Snowflake(ms.saturating_sub(PLATFORM_EPOCH_MS) << 22)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for Snowflake {
    fn from(value: u64) -> Self {
        Snowflake(value)
    }
}

impl From<Snowflake> for u64 {
    fn from(value: Snowflake) -> Self {
        value.0
    }
}

impl FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Snowflake)
    }
}

// The wire sends ids as decimal strings (u64 overflows common JSON number
// handling), but configs and tests may use bare integers; accept both.
impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct SnowflakeVisitor;

impl Visitor<'_> for SnowflakeVisitor {
    type Value = Snowflake;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake id as a string or integer")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Snowflake(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SnowflakeVisitor)
    }
}
