//! REST transport: the `ChatApi` seam and its reqwest implementation.
//!
//! Everything above this module talks to the platform through the `ChatApi`
//! trait, so tests (and alternative transports) can swap the wire out.
//! `RestClient` is the production implementation; rate limiting and retry
//! are its concern, not its callers'.

use crate::models::{
    Channel, CreateInvite, CreateMessage, EditChannel, EditRole, Invite, Message, Role, User,
};
use crate::snowflake::Snowflake;
use async_trait::async_trait;
use serde::Serialize;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Maximum messages per history page, and per bulk-delete call.
pub const MAX_MESSAGES_PER_PAGE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected locally, before any network call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("api error: {status} {message}")]
    Api { status: u16, message: String },
}

/// The remote operations this crate consumes. One method per endpoint.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// The account the token authenticates as.
    async fn get_current_user(&self) -> Result<User, ApiError>;

    async fn get_channel(&self, channel_id: Snowflake) -> Result<Channel, ApiError>;

    async fn modify_channel(
        &self,
        channel_id: Snowflake,
        payload: &EditChannel,
        reason: Option<&str>,
    ) -> Result<Channel, ApiError>;

    async fn delete_channel(
        &self,
        channel_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError>;

    /// One page of messages. At most one of `around`/`before`/`after` may be
    /// set; `limit` is capped server-side at 100.
    async fn get_channel_messages(
        &self,
        channel_id: Snowflake,
        limit: usize,
        around: Option<Snowflake>,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
    ) -> Result<Vec<Message>, ApiError>;

    async fn get_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Result<Message, ApiError>;

    async fn create_message(
        &self,
        channel_id: Snowflake,
        payload: &CreateMessage,
    ) -> Result<Message, ApiError>;

    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError>;

    /// Delete 2..=100 messages in one call. The server rejects a single id;
    /// callers route that case through `delete_message`.
    async fn bulk_delete_messages(
        &self,
        channel_id: Snowflake,
        message_ids: &[Snowflake],
        reason: Option<&str>,
    ) -> Result<(), ApiError>;

    async fn get_pinned_messages(&self, channel_id: Snowflake) -> Result<Vec<Message>, ApiError>;

    async fn pin_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError>;

    async fn unpin_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError>;

    async fn trigger_typing(&self, channel_id: Snowflake) -> Result<(), ApiError>;

    async fn create_channel_invite(
        &self,
        channel_id: Snowflake,
        payload: &CreateInvite,
        reason: Option<&str>,
    ) -> Result<Invite, ApiError>;

    async fn get_channel_invites(&self, channel_id: Snowflake) -> Result<Vec<Invite>, ApiError>;

    async fn modify_guild_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        payload: &EditRole,
        reason: Option<&str>,
    ) -> Result<Role, ApiError>;

    async fn delete_guild_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError>;
}

/// reqwest-backed `ChatApi` with bot-token auth.
#[derive(Clone)]
pub struct RestClient {
    api_base: String,
    token: String,
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(token: impl Into<String>, api_base: Option<String>) -> Self {
        let api_base = api_base
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self {
            api_base,
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        reason: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.api_base, path);
        log::debug!("{} {}", method, path);
        let mut req = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bot {}", self.token));
        if let Some(reason) = reason {
            req = req.header("X-Audit-Log-Reason", reason);
        }
        req
    }

    /// Status check shared by all endpoints: non-2xx becomes `ApiError::Api`
    /// with the body text preserved.
    async fn check(res: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(res)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let res = self.request(reqwest::Method::GET, path, None).send().await?;
        Ok(Self::check(res).await?.json().await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
        reason: Option<&str>,
    ) -> Result<T, ApiError> {
        let res = self.request(method, path, reason).json(body).send().await?;
        Ok(Self::check(res).await?.json().await?)
    }

    async fn send_empty(
        &self,
        method: reqwest::Method,
        path: &str,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        let res = self.request(method, path, reason).send().await?;
        Self::check(res).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatApi for RestClient {
    async fn get_current_user(&self) -> Result<User, ApiError> {
        self.get_json("/users/@me").await
    }

    async fn get_channel(&self, channel_id: Snowflake) -> Result<Channel, ApiError> {
        self.get_json(&format!("/channels/{}", channel_id)).await
    }

    async fn modify_channel(
        &self,
        channel_id: Snowflake,
        payload: &EditChannel,
        reason: Option<&str>,
    ) -> Result<Channel, ApiError> {
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/channels/{}", channel_id),
            payload,
            reason,
        )
        .await
    }

    async fn delete_channel(
        &self,
        channel_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.send_empty(
            reqwest::Method::DELETE,
            &format!("/channels/{}", channel_id),
            reason,
        )
        .await
    }

    async fn get_channel_messages(
        &self,
        channel_id: Snowflake,
        limit: usize,
        around: Option<Snowflake>,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
    ) -> Result<Vec<Message>, ApiError> {
        let mut req = self
            .request(
                reqwest::Method::GET,
                &format!("/channels/{}/messages", channel_id),
                None,
            )
            .query(&[("limit", limit.to_string())]);
        if let Some(id) = around {
            req = req.query(&[("around", id.to_string())]);
        }
        if let Some(id) = before {
            req = req.query(&[("before", id.to_string())]);
        }
        if let Some(id) = after {
            req = req.query(&[("after", id.to_string())]);
        }
        let res = req.send().await?;
        Ok(Self::check(res).await?.json().await?)
    }

    async fn get_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Result<Message, ApiError> {
        self.get_json(&format!("/channels/{}/messages/{}", channel_id, message_id))
            .await
    }

    async fn create_message(
        &self,
        channel_id: Snowflake,
        payload: &CreateMessage,
    ) -> Result<Message, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            &format!("/channels/{}/messages", channel_id),
            payload,
            None,
        )
        .await
    }

    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.send_empty(
            reqwest::Method::DELETE,
            &format!("/channels/{}/messages/{}", channel_id, message_id),
            reason,
        )
        .await
    }

    async fn bulk_delete_messages(
        &self,
        channel_id: Snowflake,
        message_ids: &[Snowflake],
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct BulkDelete<'a> {
            messages: &'a [Snowflake],
        }
        let res = self
            .request(
                reqwest::Method::POST,
                &format!("/channels/{}/messages/bulk-delete", channel_id),
                reason,
            )
            .json(&BulkDelete {
                messages: message_ids,
            })
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    async fn get_pinned_messages(&self, channel_id: Snowflake) -> Result<Vec<Message>, ApiError> {
        self.get_json(&format!("/channels/{}/pins", channel_id)).await
    }

    async fn pin_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.send_empty(
            reqwest::Method::PUT,
            &format!("/channels/{}/pins/{}", channel_id, message_id),
            reason,
        )
        .await
    }

    async fn unpin_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.send_empty(
            reqwest::Method::DELETE,
            &format!("/channels/{}/pins/{}", channel_id, message_id),
            reason,
        )
        .await
    }

    async fn trigger_typing(&self, channel_id: Snowflake) -> Result<(), ApiError> {
        self.send_empty(
            reqwest::Method::POST,
            &format!("/channels/{}/typing", channel_id),
            None,
        )
        .await
    }

    async fn create_channel_invite(
        &self,
        channel_id: Snowflake,
        payload: &CreateInvite,
        reason: Option<&str>,
    ) -> Result<Invite, ApiError> {
        self.send_json(
            reqwest::Method::POST,
            &format!("/channels/{}/invites", channel_id),
            payload,
            reason,
        )
        .await
    }

    async fn get_channel_invites(&self, channel_id: Snowflake) -> Result<Vec<Invite>, ApiError> {
        self.get_json(&format!("/channels/{}/invites", channel_id))
            .await
    }

    async fn modify_guild_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        payload: &EditRole,
        reason: Option<&str>,
    ) -> Result<Role, ApiError> {
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/guilds/{}/roles/{}", guild_id, role_id),
            payload,
            reason,
        )
        .await
    }

    async fn delete_guild_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.send_empty(
            reqwest::Method::DELETE,
            &format!("/guilds/{}/roles/{}", guild_id, role_id),
            reason,
        )
        .await
    }
}
