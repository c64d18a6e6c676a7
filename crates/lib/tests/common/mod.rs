//! Shared test transport: a scripted in-memory channel plus a call recorder.
//!
//! `MockApi` holds a channel's messages sorted ascending by id and answers
//! `get_channel_messages` the way the server does: newest-first pages
//! selected relative to the anchor. Every transport call is recorded so
//! tests can assert on fetch counts and delete batch shapes.

// each test binary uses its own subset of these helpers
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use wren::channels::Bot;
use wren::models::{
    Channel, CreateInvite, CreateMessage, EditChannel, EditRole, Invite, Message, MessageFlags,
    Role, User,
};
use wren::rest::{ApiError, ChatApi};
use wren::snowflake::Snowflake;

pub const CHANNEL: Snowflake = Snowflake(42);
pub const BOT_USER: Snowflake = Snowflake(999);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetMessages {
        limit: usize,
        around: Option<Snowflake>,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
    },
    GetMessage {
        id: Snowflake,
    },
    DeleteMessage {
        id: Snowflake,
    },
    BulkDelete {
        ids: Vec<Snowflake>,
    },
}

pub struct MockApi {
    /// Channel content, ascending by id.
    messages: Mutex<Vec<Message>>,
    calls: Mutex<Vec<Call>>,
    /// When set, bulk deletes fail with a 403 (permission denied).
    pub fail_bulk: AtomicBool,
}

impl MockApi {
    pub fn new(mut messages: Vec<Message>) -> Arc<Self> {
        messages.sort_by_key(|m| m.id);
        Arc::new(Self {
            messages: Mutex::new(messages),
            calls: Mutex::new(Vec::new()),
            fail_bulk: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::GetMessages { .. }))
            .count()
    }

    pub fn bulk_batches(&self) -> Vec<Vec<Snowflake>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::BulkDelete { ids } => Some(ids),
                _ => None,
            })
            .collect()
    }

    pub fn single_deletes(&self) -> Vec<Snowflake> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DeleteMessage { id } => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl ChatApi for MockApi {
    async fn get_current_user(&self) -> Result<User, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn get_channel(&self, _channel_id: Snowflake) -> Result<Channel, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn modify_channel(
        &self,
        _channel_id: Snowflake,
        _payload: &EditChannel,
        _reason: Option<&str>,
    ) -> Result<Channel, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn delete_channel(
        &self,
        _channel_id: Snowflake,
        _reason: Option<&str>,
    ) -> Result<(), ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn get_channel_messages(
        &self,
        _channel_id: Snowflake,
        limit: usize,
        around: Option<Snowflake>,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
    ) -> Result<Vec<Message>, ApiError> {
        self.record(Call::GetMessages {
            limit,
            around,
            before,
            after,
        });
        let messages = self.messages.lock().expect("messages lock");
        let mut page: Vec<Message> = if let Some(anchor) = after {
            // the `limit` messages immediately after the anchor
            messages
                .iter()
                .filter(|m| m.id > anchor)
                .take(limit)
                .cloned()
                .collect()
        } else if let Some(anchor) = around {
            let half = limit / 2;
            let mut below: Vec<Message> = messages
                .iter()
                .rev()
                .filter(|m| m.id <= anchor)
                .take(half)
                .cloned()
                .collect();
            let taken = below.len();
            below.extend(
                messages
                    .iter()
                    .filter(|m| m.id > anchor)
                    .take(limit - taken)
                    .cloned(),
            );
            below
        } else {
            let anchor = before.unwrap_or(Snowflake(u64::MAX));
            let below: Vec<&Message> = messages.iter().filter(|m| m.id < anchor).collect();
            below
                .iter()
                .skip(below.len().saturating_sub(limit))
                .map(|m| (*m).clone())
                .collect()
        };
        // the server hands pages back newest-first
        page.sort_by_key(|m| std::cmp::Reverse(m.id));
        Ok(page)
    }

    async fn get_message(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Result<Message, ApiError> {
        self.record(Call::GetMessage { id: message_id });
        let messages = self.messages.lock().expect("messages lock");
        messages
            .iter()
            .find(|m| m.id == message_id)
            .cloned()
            .ok_or(ApiError::Api {
                status: 404,
                message: "unknown message".to_string(),
            })
    }

    async fn create_message(
        &self,
        _channel_id: Snowflake,
        _payload: &CreateMessage,
    ) -> Result<Message, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn delete_message(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        _reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.record(Call::DeleteMessage { id: message_id });
        Ok(())
    }

    async fn bulk_delete_messages(
        &self,
        _channel_id: Snowflake,
        message_ids: &[Snowflake],
        _reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.record(Call::BulkDelete {
            ids: message_ids.to_vec(),
        });
        if self.fail_bulk.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 403,
                message: "missing permissions".to_string(),
            });
        }
        // the real endpoint rejects degenerate batches; keep tests honest
        if message_ids.len() < 2 || message_ids.len() > 100 {
            return Err(ApiError::Api {
                status: 400,
                message: format!("invalid bulk delete size: {}", message_ids.len()),
            });
        }
        Ok(())
    }

    async fn get_pinned_messages(&self, _channel_id: Snowflake) -> Result<Vec<Message>, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn pin_message(
        &self,
        _channel_id: Snowflake,
        _message_id: Snowflake,
        _reason: Option<&str>,
    ) -> Result<(), ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn unpin_message(
        &self,
        _channel_id: Snowflake,
        _message_id: Snowflake,
        _reason: Option<&str>,
    ) -> Result<(), ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn trigger_typing(&self, _channel_id: Snowflake) -> Result<(), ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn create_channel_invite(
        &self,
        _channel_id: Snowflake,
        _payload: &CreateInvite,
        _reason: Option<&str>,
    ) -> Result<Invite, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn get_channel_invites(&self, _channel_id: Snowflake) -> Result<Vec<Invite>, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn modify_guild_role(
        &self,
        _guild_id: Snowflake,
        _role_id: Snowflake,
        _payload: &EditRole,
        _reason: Option<&str>,
    ) -> Result<Role, ApiError> {
        unimplemented!("not used by these tests")
    }

    async fn delete_guild_role(
        &self,
        _guild_id: Snowflake,
        _role_id: Snowflake,
        _reason: Option<&str>,
    ) -> Result<(), ApiError> {
        unimplemented!("not used by these tests")
    }
}

/// A message in the mock channel.
pub fn message(id: u64, author_id: u64, flags: MessageFlags) -> Message {
    Message {
        id: Snowflake(id),
        channel_id: CHANNEL,
        author: User {
            id: Snowflake(author_id),
            username: format!("user{}", author_id),
            discriminator: "0".to_string(),
            bot: author_id == BOT_USER.0,
            avatar: None,
        },
        content: String::new(),
        timestamp: None,
        edited_timestamp: None,
        tts: false,
        pinned: false,
        flags,
    }
}

/// A bot wired to the mock transport.
pub fn bot(api: Arc<MockApi>) -> Bot {
    Bot::from_parts(api, BOT_USER)
}
