//! Message cache: identity-keyed store shared across channel handles.
//!
//! Every message decoded from the wire passes through `place_message`, so a
//! message seen twice (history page, pin listing, direct fetch) resolves to
//! one cache entry keyed by (channel id, message id). Eviction policy is the
//! caller's concern; delete paths remove entries explicitly.

use crate::models::Message;
use crate::snowflake::Snowflake;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keyed message store behind an async lock.
#[derive(Default)]
pub struct MessageCache {
    inner: RwLock<HashMap<(Snowflake, Snowflake), Message>>,
}

impl MessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a wire record into the cache, replacing any prior entry for
    /// the same id, and return the placed message.
    pub async fn place_message(&self, message: Message) -> Message {
        let mut g = self.inner.write().await;
        g.insert((message.channel_id, message.id), message.clone());
        message
    }

    pub async fn get_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Option<Message> {
        let g = self.inner.read().await;
        g.get(&(channel_id, message_id)).cloned()
    }

    pub async fn remove_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Option<Message> {
        let mut g = self.inner.write().await;
        g.remove(&(channel_id, message_id))
    }

    pub async fn len(&self) -> usize {
        let g = self.inner.read().await;
        g.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(channel_id: u64, id: u64, content: &str) -> Message {
        Message {
            id: Snowflake(id),
            channel_id: Snowflake(channel_id),
            author: Default::default(),
            content: content.to_string(),
            timestamp: None,
            edited_timestamp: None,
            tts: false,
            pinned: false,
            flags: Default::default(),
        }
    }

    #[tokio::test]
    async fn place_replaces_prior_entry() {
        let cache = MessageCache::new();
        cache.place_message(msg(1, 10, "first")).await;
        cache.place_message(msg(1, 10, "edited")).await;
        assert_eq!(cache.len().await, 1);
        let got = cache.get_message(Snowflake(1), Snowflake(10)).await.expect("cached");
        assert_eq!(got.content, "edited");
    }

    #[tokio::test]
    async fn keys_are_per_channel() {
        let cache = MessageCache::new();
        cache.place_message(msg(1, 10, "a")).await;
        cache.place_message(msg(2, 10, "b")).await;
        assert_eq!(cache.len().await, 2);
        cache.remove_message(Snowflake(1), Snowflake(10)).await;
        assert!(cache.get_message(Snowflake(1), Snowflake(10)).await.is_none());
        assert!(cache.get_message(Snowflake(2), Snowflake(10)).await.is_some());
    }
}
