//! Typed façade over the remote message store.
//!
//! `MessageGateway` turns each local call into exactly one request on a
//! [`RemoteMessageClient`]. It normalises session identifiers and encodes
//! plugin arguments; nothing else happens locally. Remote failures are
//! returned unchanged.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::message::{
    domain::{
        ChatMessage, ClearOr, CreateMessageParams, ErrorPayload, MessageId, MessageItem,
        MessageUpdate, PluginArguments, SessionId, TopicId, Translation, TtsRecord,
        normalize_session_id,
    },
    ports::{
        BatchCreateOutcome, MessageScope, PluginUpdate, RemoteMessageClient, RemoteResult,
        RemoveMessageRequest, RemoveMessagesRequest, SessionScope, UpdateRequest,
    },
};

/// Message count at which enough history exists to prompt for tracing
/// consent.
pub const TRACE_CHECK_THRESHOLD: u64 = 4;

/// Forwarding gateway for message operations.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use courier::message::{
///     adapters::memory::InMemoryMessageStore,
///     domain::{CreateMessageParams, Role},
///     services::MessageGateway,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), courier::message::ports::RemoteError> {
/// let gateway = MessageGateway::new(Arc::new(InMemoryMessageStore::<DefaultClock>::default()));
/// let params = CreateMessageParams::new(Role::User, "hi").with_session("inbox");
/// let id = gateway.create_message(params).await?;
///
/// let inbox = gateway.get_messages(None, None).await?;
/// assert_eq!(inbox.first().map(|m| &m.id), Some(&id));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MessageGateway<R>
where
    R: RemoteMessageClient,
{
    client: Arc<R>,
}

impl<R> Clone for MessageGateway<R>
where
    R: RemoteMessageClient,
{
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<R> MessageGateway<R>
where
    R: RemoteMessageClient,
{
    /// Creates a gateway over the given remote client.
    #[must_use]
    pub const fn new(client: Arc<R>) -> Self {
        Self { client }
    }

    /// Returns the underlying remote client.
    #[must_use]
    pub const fn client(&self) -> &Arc<R> {
        &self.client
    }

    /// Posts a new message and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns whatever [`RemoteError`](crate::message::ports::RemoteError)
    /// the remote client reports.
    pub async fn create_message(&self, mut params: CreateMessageParams) -> RemoteResult<MessageId> {
        params.session_id = normalize_session_id(params.session_id.take());
        debug!(
            session_id = ?params.session_id,
            topic_id = ?params.topic_id,
            role = %params.role,
            "creating message"
        );
        self.client.create(params).await
    }

    /// Imports stored rows in bulk, in the given order.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn batch_create_messages(
        &self,
        messages: Vec<MessageItem>,
    ) -> RemoteResult<BatchCreateOutcome> {
        debug!(count = messages.len(), "batch creating messages");
        self.client.batch_create(messages).await
    }

    /// Lists messages of a session, optionally narrowed to one topic.
    ///
    /// `None` and the inbox sentinel both address the inbox.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn get_messages(
        &self,
        session_id: Option<SessionId>,
        topic_id: Option<TopicId>,
    ) -> RemoteResult<Vec<ChatMessage>> {
        let scope = MessageScope {
            session_id: normalize_session_id(session_id),
            topic_id,
        };
        debug!(session_id = ?scope.session_id, topic_id = ?scope.topic_id, "fetching messages");
        self.client.get_messages(scope).await
    }

    /// Lists every message in the store.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn get_all_messages(&self) -> RemoteResult<Vec<ChatMessage>> {
        debug!("fetching all messages");
        self.client.get_all_messages().await
    }

    /// Lists every message of a session across all of its topics.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn get_all_messages_in_session(
        &self,
        session_id: SessionId,
    ) -> RemoteResult<Vec<ChatMessage>> {
        let scope = SessionScope {
            session_id: normalize_session_id(Some(session_id)),
        };
        debug!(session_id = ?scope.session_id, "fetching all messages in session");
        self.client.get_all_messages_in_session(scope).await
    }

    /// Returns the total number of messages.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn count_messages(&self) -> RemoteResult<u64> {
        self.client.count().await
    }

    /// Returns the number of messages created today, by the remote side's
    /// notion of "today".
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn count_today_messages(&self) -> RemoteResult<u64> {
        self.client.count_today().await
    }

    /// Attaches a generation error to a message.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn update_message_error(&self, id: MessageId, error: ErrorPayload) -> RemoteResult<()> {
        debug!(message_id = %id, error_type = %error.error_type, "updating message error");
        self.client
            .update(UpdateRequest::new(id, MessageUpdate::error(error)))
            .await
    }

    /// Attaches a plugin error to a message.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn update_message_plugin_error(
        &self,
        id: MessageId,
        error: ErrorPayload,
    ) -> RemoteResult<()> {
        debug!(message_id = %id, error_type = %error.error_type, "updating plugin error");
        self.client
            .update(UpdateRequest::new(id, MessageUpdate::plugin_error(error)))
            .await
    }

    /// Replaces the arguments of a message's plugin call.
    ///
    /// Structured arguments are sent as their compact JSON text.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn update_message_plugin_arguments(
        &self,
        id: MessageId,
        arguments: impl Into<PluginArguments> + Send,
    ) -> RemoteResult<()> {
        let text = arguments.into().into_text();
        debug!(message_id = %id, "updating plugin arguments");
        self.client
            .update_message_plugin(UpdateRequest::new(id, PluginUpdate { arguments: text }))
            .await
    }

    /// Applies a partial update to a message.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn update_message(&self, id: MessageId, update: MessageUpdate) -> RemoteResult<()> {
        debug!(message_id = %id, "updating message");
        self.client.update(UpdateRequest::new(id, update)).await
    }

    /// Merges a translation into a message, or clears it with
    /// [`ClearOr::Clear`].
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn update_message_translate(
        &self,
        id: MessageId,
        translate: ClearOr<Translation>,
    ) -> RemoteResult<()> {
        debug!(message_id = %id, clear = translate.is_clear(), "updating translation");
        self.client
            .update_translate(UpdateRequest::new(id, translate))
            .await
    }

    /// Merges a TTS record into a message, or clears it with
    /// [`ClearOr::Clear`].
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn update_message_tts(
        &self,
        id: MessageId,
        tts: ClearOr<TtsRecord>,
    ) -> RemoteResult<()> {
        debug!(message_id = %id, clear = tts.is_clear(), "updating tts");
        self.client.update_tts(UpdateRequest::new(id, tts)).await
    }

    /// Replaces a message's plugin state blob.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn update_message_plugin_state(&self, id: MessageId, state: Value) -> RemoteResult<()> {
        debug!(message_id = %id, "updating plugin state");
        self.client
            .update_plugin_state(UpdateRequest::new(id, state))
            .await
    }

    /// Removes one message.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn remove_message(&self, id: MessageId) -> RemoteResult<()> {
        debug!(message_id = %id, "removing message");
        self.client.remove_message(RemoveMessageRequest { id }).await
    }

    /// Removes several messages.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn remove_messages(&self, ids: Vec<MessageId>) -> RemoteResult<()> {
        debug!(count = ids.len(), "removing messages");
        self.client
            .remove_messages(RemoveMessagesRequest { ids })
            .await
    }

    /// Removes every message of a session, or only one of its topics.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn remove_messages_by_assistant(
        &self,
        session_id: SessionId,
        topic_id: Option<TopicId>,
    ) -> RemoteResult<()> {
        let scope = MessageScope {
            session_id: normalize_session_id(Some(session_id)),
            topic_id,
        };
        debug!(session_id = ?scope.session_id, topic_id = ?scope.topic_id, "removing session messages");
        self.client.remove_messages_by_assistant(scope).await
    }

    /// Removes every message in the store.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn remove_all_messages(&self) -> RemoteResult<()> {
        debug!("removing all messages");
        self.client.remove_all_messages().await
    }

    /// Returns `true` if the store holds at least one message.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn has_messages(&self) -> RemoteResult<bool> {
        let count = self.count_messages().await?;
        trace!(count, "checked for messages");
        Ok(count > 0)
    }

    /// Returns `true` once the store holds [`TRACE_CHECK_THRESHOLD`] or more
    /// messages.
    ///
    /// # Errors
    ///
    /// Propagates remote failures unchanged.
    pub async fn message_count_to_check_trace(&self) -> RemoteResult<bool> {
        let count = self.count_messages().await?;
        trace!(count, threshold = TRACE_CHECK_THRESHOLD, "checked trace threshold");
        Ok(count >= TRACE_CHECK_THRESHOLD)
    }
}
