//! Bulk message deletion driven by the history iterator.

use crate::models::{Message, MessageFlags};
use crate::rest::{ApiError, MAX_MESSAGES_PER_PAGE};
use crate::snowflake::Snowflake;
use chrono::Utc;

use super::handle::ChannelHandle;

/// The server refuses to bulk-delete messages older than 14 days.
const MAX_BULK_DELETE_AGE_MS: u64 = 14 * 24 * 60 * 60 * 1000;

/// Filter over candidate messages. Return true to delete.
pub type MessagePredicate = Box<dyn Fn(&Message) -> bool + Send + Sync>;

/// Options for [`ChannelHandle::purge`]. Fields mirror the scan parameters:
/// `deletion_limit` caps how many messages are deleted (0 = no count cap),
/// `search_limit` caps how many are examined, and the anchors select where
/// in the history the scan runs.
pub struct PurgeOptions {
    pub deletion_limit: usize,
    pub search_limit: usize,
    /// Accept-all when unset.
    pub predicate: Option<MessagePredicate>,
    /// Skip the bot's own pending-response placeholder messages.
    pub avoid_loading_msg: bool,
    pub before: Option<Snowflake>,
    pub after: Option<Snowflake>,
    pub around: Option<Snowflake>,
    /// Audit-log reason attached to each delete call.
    pub reason: Option<String>,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self {
            deletion_limit: 50,
            search_limit: 100,
            predicate: None,
            avoid_loading_msg: true,
            before: None,
            after: None,
            around: None,
            reason: None,
        }
    }
}

impl PurgeOptions {
    /// Set the candidate filter.
    pub fn matching(mut self, predicate: impl Fn(&Message) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }
}

impl ChannelHandle {
    /// Scan up to `search_limit` messages and delete the ones that qualify,
    /// in batches of at most 100. Returns how many messages were selected
    /// for deletion.
    ///
    /// Messages older than 14 days are skipped silently (the server refuses
    /// to bulk-delete them), as are messages failing the predicate and, when
    /// `avoid_loading_msg` is set, the bot's own loading placeholders. A
    /// failed delete batch aborts the rest and propagates, so on error the
    /// returned count was never produced and the caller cannot assume every
    /// selected message is gone.
    pub async fn purge(&self, options: PurgeOptions) -> Result<usize, ApiError> {
        let now_ms = Utc::now().timestamp_millis() as u64;
        let cutoff = Snowflake::from_timestamp_ms(now_ms.saturating_sub(MAX_BULK_DELETE_AGE_MS));

        let mut history = self.history(
            options.search_limit,
            options.before,
            options.after,
            options.around,
        )?;

        let mut to_delete: Vec<Snowflake> = Vec::new();
        while let Some(message) = history.next().await? {
            if options.deletion_limit != 0 && to_delete.len() == options.deletion_limit {
                break;
            }
            if let Some(predicate) = &options.predicate {
                if !predicate(&message) {
                    continue;
                }
            }
            if options.avoid_loading_msg
                && message.author.id == self.user_id
                && message.flags.contains(MessageFlags::LOADING)
            {
                continue;
            }
            if message.id < cutoff {
                // too old for the bulk endpoint
                continue;
            }
            to_delete.push(message.id);
        }

        let count = to_delete.len();
        let reason = options.reason.as_deref();
        while !to_delete.is_empty() {
            let split = to_delete.len().saturating_sub(MAX_MESSAGES_PER_PAGE);
            let batch = to_delete.split_off(split);
            log::debug!(
                "purge: deleting batch of {} from channel {}",
                batch.len(),
                self.id
            );
            self.delete_messages(&batch, reason).await?;
        }
        Ok(count)
    }
}
