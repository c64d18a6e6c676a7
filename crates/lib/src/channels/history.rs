//! Lazy channel-history pagination.
//!
//! `ChannelHistory` walks a channel's messages one page at a time, newest
//! first by default, oldest first when constructed with `after`. It is
//! forward-only and not restartable; dropping it mid-sequence is safe and
//! fetches nothing further.

use crate::cache::MessageCache;
use crate::models::Message;
use crate::rest::{ApiError, ChatApi, MAX_MESSAGES_PER_PAGE};
use crate::snowflake::Snowflake;
use futures_util::stream::{self, Stream};
use std::collections::VecDeque;
use std::sync::Arc;

use super::handle::{check_single_anchor, ChannelHandle};

/// Pagination direction, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Newest first, walking backwards from the anchor (or from the latest
    /// message when no anchor is given).
    Before,
    /// Oldest first, walking forwards from the anchor.
    After,
    /// One page centered on the anchor, newest first.
    Around,
}

/// Async iterator over a channel's message history.
pub struct ChannelHistory {
    api: Arc<dyn ChatApi>,
    cache: Arc<MessageCache>,
    channel_id: Snowflake,
    direction: Direction,
    /// Cursor for the next fetch. For `Before`/`After` it advances to the
    /// most extreme id seen; for `Around` it never moves.
    anchor: Option<Snowflake>,
    /// Messages still wanted; `None` means unbounded.
    remaining: Option<usize>,
    buffer: VecDeque<Message>,
    exhausted: bool,
}

impl ChannelHandle {
    /// History iterator over this channel. `limit` caps the total yielded
    /// (0 = no cap); at most one of `before`/`after`/`around` may be set.
    ///
    /// With `around`, exactly one page is fetched regardless of `limit`:
    /// the server's "around" query does not compose with repeated
    /// pagination, so the iterator stops rather than guess a follow-on
    /// cursor.
    pub fn history(
        &self,
        limit: usize,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
        around: Option<Snowflake>,
    ) -> Result<ChannelHistory, ApiError> {
        check_single_anchor(around, before, after)?;
        let (direction, anchor) = if let Some(id) = after {
            (Direction::After, Some(id))
        } else if let Some(id) = around {
            (Direction::Around, Some(id))
        } else {
            (Direction::Before, before)
        };
        Ok(ChannelHistory {
            api: Arc::clone(&self.api),
            cache: Arc::clone(&self.cache),
            channel_id: self.id,
            direction,
            anchor,
            remaining: (limit > 0).then_some(limit),
            buffer: VecDeque::new(),
            exhausted: false,
        })
    }
}

impl ChannelHistory {
    /// Next message, or `Ok(None)` once the sequence is exhausted. Transport
    /// errors propagate unchanged.
    pub async fn next(&mut self) -> Result<Option<Message>, ApiError> {
        loop {
            if let Some(message) = self.buffer.pop_front() {
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                    if *remaining == 0 {
                        self.exhausted = true;
                    }
                }
                return Ok(Some(message));
            }
            if self.exhausted {
                return Ok(None);
            }
            let page = self.fetch_page().await?;
            if page.is_empty() {
                self.exhausted = true;
                return Ok(None);
            }
            for raw in page {
                self.buffer.push_back(self.cache.place_message(raw).await);
            }
        }
    }

    /// Collect the remainder of the sequence into a vec.
    pub async fn flatten(mut self) -> Result<Vec<Message>, ApiError> {
        let mut out = Vec::new();
        while let Some(message) = self.next().await? {
            out.push(message);
        }
        Ok(out)
    }

    /// Adapt into a `futures` stream for `StreamExt` consumers.
    pub fn into_stream(self) -> impl Stream<Item = Result<Message, ApiError>> {
        stream::try_unfold(self, |mut history| async move {
            let item = history.next().await?;
            Ok(item.map(|message| (message, history)))
        })
    }

    /// Fetch and order one page, advancing the cursor. A page shorter than
    /// requested means the channel has no more messages in this direction.
    async fn fetch_page(&mut self) -> Result<Vec<Message>, ApiError> {
        let page_size = match self.remaining {
            Some(remaining) => remaining.min(MAX_MESSAGES_PER_PAGE),
            None => MAX_MESSAGES_PER_PAGE,
        };

        let mut page = match self.direction {
            Direction::After => {
                let mut page = self
                    .api
                    .get_channel_messages(self.channel_id, page_size, None, None, self.anchor)
                    .await?;
                page.sort_by_key(|m| m.id);
                if let Some(last) = page.last() {
                    self.anchor = Some(last.id);
                }
                page
            }
            Direction::Around => {
                let mut page = self
                    .api
                    .get_channel_messages(self.channel_id, page_size, self.anchor, None, None)
                    .await?;
                page.sort_by_key(|m| std::cmp::Reverse(m.id));
                self.exhausted = true;
                page
            }
            Direction::Before => {
                let mut page = self
                    .api
                    .get_channel_messages(self.channel_id, page_size, None, self.anchor, None)
                    .await?;
                page.sort_by_key(|m| std::cmp::Reverse(m.id));
                if let Some(last) = page.last() {
                    self.anchor = Some(last.id);
                }
                page
            }
        };

        if page.len() < page_size {
            self.exhausted = true;
        }
        // A misbehaving server could return more than asked; never let the
        // buffer outgrow the remaining budget.
        if let Some(remaining) = self.remaining {
            page.truncate(remaining);
        }
        Ok(page)
    }
}
