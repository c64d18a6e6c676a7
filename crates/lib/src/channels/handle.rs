//! Bot root object and per-channel/per-role handles.
//!
//! Handles are thin: validate locally, call the transport, place results in
//! the cache. They share the transport and cache via `Arc`, so cloning a
//! handle or holding several per channel is cheap and safe.

use crate::cache::MessageCache;
use crate::config::{resolve_api_base, resolve_bot_token, Config};
use crate::models::{
    Channel, CreateInvite, CreateMessage, EditChannel, EditRole, Invite, InviteTargetKind,
    Message, Role,
};
use crate::rest::{ApiError, ChatApi, RestClient, MAX_MESSAGES_PER_PAGE};
use crate::snowflake::Snowflake;
use std::sync::Arc;

/// Root object: transport, cache, and the bot's own identity.
#[derive(Clone)]
pub struct Bot {
    api: Arc<dyn ChatApi>,
    cache: Arc<MessageCache>,
    user_id: Snowflake,
}

impl Bot {
    /// Connect with a `RestClient` built from config: resolves the token,
    /// then fetches the bot's own user so handles know their identity.
    pub async fn login(config: &Config) -> Result<Self, ApiError> {
        let token = resolve_bot_token(config).ok_or_else(|| {
            ApiError::InvalidArgument("bot token not configured".to_string())
        })?;
        let api = RestClient::new(token, Some(resolve_api_base(config)));
        let user = api.get_current_user().await?;
        log::info!("logged in as {} ({})", user.tag(), user.id);
        Ok(Self::from_parts(Arc::new(api), user.id))
    }

    /// Assemble from an existing transport. Used by tests and by callers
    /// that bring their own `ChatApi` implementation.
    pub fn from_parts(api: Arc<dyn ChatApi>, user_id: Snowflake) -> Self {
        Self {
            api,
            cache: Arc::new(MessageCache::new()),
            user_id,
        }
    }

    /// The bot's own user id.
    pub fn user_id(&self) -> Snowflake {
        self.user_id
    }

    pub fn cache(&self) -> &Arc<MessageCache> {
        &self.cache
    }

    /// Handle for a channel id. No network call; the channel need not be
    /// fetched first.
    pub fn channel(&self, id: impl Into<Snowflake>) -> ChannelHandle {
        ChannelHandle {
            api: Arc::clone(&self.api),
            cache: Arc::clone(&self.cache),
            id: id.into(),
            user_id: self.user_id,
        }
    }

    /// Handle for a guild role.
    pub fn role(&self, guild_id: impl Into<Snowflake>, role_id: impl Into<Snowflake>) -> RoleHandle {
        RoleHandle {
            api: Arc::clone(&self.api),
            guild_id: guild_id.into(),
            id: role_id.into(),
        }
    }
}

/// Convenience surface over one channel.
#[derive(Clone)]
pub struct ChannelHandle {
    pub(crate) api: Arc<dyn ChatApi>,
    pub(crate) cache: Arc<MessageCache>,
    pub(crate) id: Snowflake,
    pub(crate) user_id: Snowflake,
}

impl ChannelHandle {
    pub fn id(&self) -> Snowflake {
        self.id
    }

    /// Fetch the channel entity.
    pub async fn fetch(&self) -> Result<Channel, ApiError> {
        self.api.get_channel(self.id).await
    }

    /// Edit channel settings. `reason` goes to the audit log.
    pub async fn edit(
        &self,
        payload: EditChannel,
        reason: Option<&str>,
    ) -> Result<Channel, ApiError> {
        self.api.modify_channel(self.id, &payload, reason).await
    }

    pub async fn delete(&self, reason: Option<&str>) -> Result<(), ApiError> {
        self.api.delete_channel(self.id, reason).await
    }

    /// Send a plain text message.
    pub async fn send(&self, content: impl Into<String>) -> Result<Message, ApiError> {
        self.send_message(CreateMessage::text(content)).await
    }

    pub async fn send_message(&self, payload: CreateMessage) -> Result<Message, ApiError> {
        let message = self.api.create_message(self.id, &payload).await?;
        Ok(self.cache.place_message(message).await)
    }

    /// Fetch one message, from cache when possible.
    pub async fn get_message(&self, message_id: Snowflake) -> Result<Message, ApiError> {
        if let Some(message) = self.cache.get_message(self.id, message_id).await {
            return Ok(message);
        }
        let message = self.api.get_message(self.id, message_id).await?;
        Ok(self.cache.place_message(message).await)
    }

    /// Fetch one page of messages. `limit` must be at most 100 and at most
    /// one of `around`/`before`/`after` may be set; both are checked before
    /// any network call.
    pub async fn get_messages(
        &self,
        limit: usize,
        around: Option<Snowflake>,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
    ) -> Result<Vec<Message>, ApiError> {
        if limit > MAX_MESSAGES_PER_PAGE {
            return Err(ApiError::InvalidArgument(
                "cannot fetch more than 100 messages at once".to_string(),
            ));
        }
        check_single_anchor(around, before, after)?;
        let page = self
            .api
            .get_channel_messages(self.id, limit, around, before, after)
            .await?;
        let mut messages = Vec::with_capacity(page.len());
        for raw in page {
            messages.push(self.cache.place_message(raw).await);
        }
        Ok(messages)
    }

    pub async fn get_pinned_messages(&self) -> Result<Vec<Message>, ApiError> {
        let page = self.api.get_pinned_messages(self.id).await?;
        let mut messages = Vec::with_capacity(page.len());
        for raw in page {
            messages.push(self.cache.place_message(raw).await);
        }
        Ok(messages)
    }

    pub async fn pin_message(
        &self,
        message_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.api.pin_message(self.id, message_id, reason).await
    }

    pub async fn unpin_message(
        &self,
        message_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.api.unpin_message(self.id, message_id, reason).await
    }

    /// Delete a single message.
    pub async fn delete_message(
        &self,
        message_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.api.delete_message(self.id, message_id, reason).await?;
        self.cache.remove_message(self.id, message_id).await;
        Ok(())
    }

    /// Delete up to 100 messages. An empty list is a no-op; a single id is
    /// routed through the single-message endpoint, since the server rejects
    /// a bulk call with one id.
    pub async fn delete_messages(
        &self,
        message_ids: &[Snowflake],
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        match message_ids {
            [] => return Ok(()),
            [only] => return self.delete_message(*only, reason).await,
            _ if message_ids.len() > MAX_MESSAGES_PER_PAGE => {
                return Err(ApiError::InvalidArgument(
                    "cannot bulk delete more than 100 messages at once".to_string(),
                ));
            }
            _ => {}
        }
        self.api
            .bulk_delete_messages(self.id, message_ids, reason)
            .await?;
        for id in message_ids {
            self.cache.remove_message(self.id, *id).await;
        }
        Ok(())
    }

    pub async fn trigger_typing(&self) -> Result<(), ApiError> {
        self.api.trigger_typing(self.id).await
    }

    /// Create an invite. Stream targets need a user, embedded-application
    /// targets need an application, and the two are mutually exclusive; the
    /// target kind is filled in when only the target id was given.
    pub async fn create_invite(
        &self,
        mut payload: CreateInvite,
        reason: Option<&str>,
    ) -> Result<Invite, ApiError> {
        if payload.target_user_id.is_some() && payload.target_application_id.is_some() {
            return Err(ApiError::InvalidArgument(
                "invite target must be either a user or an application, not both".to_string(),
            ));
        }
        match payload.target_type {
            Some(InviteTargetKind::Stream) if payload.target_user_id.is_none() => {
                return Err(ApiError::InvalidArgument(
                    "a stream invite needs a target user".to_string(),
                ));
            }
            Some(InviteTargetKind::EmbeddedApplication)
                if payload.target_application_id.is_none() =>
            {
                return Err(ApiError::InvalidArgument(
                    "an embedded-application invite needs a target application".to_string(),
                ));
            }
            None if payload.target_user_id.is_some() => {
                payload.target_type = Some(InviteTargetKind::Stream);
            }
            None if payload.target_application_id.is_some() => {
                payload.target_type = Some(InviteTargetKind::EmbeddedApplication);
            }
            _ => {}
        }
        self.api.create_channel_invite(self.id, &payload, reason).await
    }

    pub async fn get_invites(&self) -> Result<Vec<Invite>, ApiError> {
        self.api.get_channel_invites(self.id).await
    }
}

/// Convenience surface over one guild role.
#[derive(Clone)]
pub struct RoleHandle {
    api: Arc<dyn ChatApi>,
    guild_id: Snowflake,
    id: Snowflake,
}

impl RoleHandle {
    pub fn id(&self) -> Snowflake {
        self.id
    }

    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    pub async fn edit(&self, payload: EditRole, reason: Option<&str>) -> Result<Role, ApiError> {
        self.api
            .modify_guild_role(self.guild_id, self.id, &payload, reason)
            .await
    }

    pub async fn delete(&self, reason: Option<&str>) -> Result<(), ApiError> {
        self.api.delete_guild_role(self.guild_id, self.id, reason).await
    }
}

/// At most one pagination anchor may be set per request.
pub(crate) fn check_single_anchor(
    around: Option<Snowflake>,
    before: Option<Snowflake>,
    after: Option<Snowflake>,
) -> Result<(), ApiError> {
    let set = [around, before, after].iter().filter(|a| a.is_some()).count();
    if set > 1 {
        return Err(ApiError::InvalidArgument(
            "only one of around, before, after may be set".to_string(),
        ));
    }
    Ok(())
}
