//! Remote procedure port for the message store.
//!
//! One method per remote procedure. Request payloads are serde types with
//! the remote side's camelCase field names, so a transport living outside
//! this crate can serialise them as-is.

use crate::message::domain::{
    ChatMessage, ClearOr, CreateMessageParams, MessageId, MessageItem, MessageUpdate, SessionId,
    TopicId, Translation, TtsRecord,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failures reported by a [`RemoteMessageClient`].
///
/// The gateway never inspects or rewraps these; callers see exactly what
/// the adapter produced.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The request never reached the remote side, or its response was lost.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The remote side refused the request.
    #[error("request rejected ({code}): {message}")]
    Rejected {
        /// Remote error code, e.g. `BAD_REQUEST`.
        code: String,
        /// Remote error message.
        message: String,
    },

    /// The addressed message does not exist.
    #[error("message not found: {0}")]
    NotFound(MessageId),

    /// The remote store cannot serve requests.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
}

impl RemoteError {
    /// Wraps a transport-level cause.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Creates a rejection error.
    #[must_use]
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates an unavailability error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Session and topic scope for listing or removing messages.
///
/// `session_id` is always present on the wire (`null` for the inbox);
/// `topic_id` is omitted when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageScope {
    /// Remote session identifier, already normalised.
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Topic filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
}

/// Session-only scope for whole-session queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScope {
    /// Remote session identifier, already normalised.
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

/// Update addressed to a single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest<V> {
    /// Target message.
    pub id: MessageId,
    /// Update payload.
    pub value: V,
}

impl<V> UpdateRequest<V> {
    /// Creates an update request.
    #[must_use]
    pub const fn new(id: MessageId, value: V) -> Self {
        Self { id, value }
    }
}

/// Plugin fields the remote store accepts through `updateMessagePlugin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginUpdate {
    /// Plugin call arguments as JSON text.
    pub arguments: String,
}

/// Removal of a single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveMessageRequest {
    /// Message to remove.
    pub id: MessageId,
}

/// Removal of several messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveMessagesRequest {
    /// Messages to remove.
    pub ids: Vec<MessageId>,
}

/// Result of a bulk insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateOutcome {
    /// Number of rows inserted.
    pub added: usize,
    /// Identifiers of inserted rows, in input order.
    #[serde(default)]
    pub ids: Vec<MessageId>,
    /// Identifiers skipped because they already existed.
    #[serde(default)]
    pub skips: Vec<MessageId>,
    /// Whether the batch was accepted.
    pub success: bool,
}

/// Remote procedures of the message store.
///
/// Each method is one request and one response; a failed call has no
/// partial effect visible to the caller. Session identifiers reaching this
/// port are already normalised.
#[async_trait]
pub trait RemoteMessageClient: Send + Sync {
    /// `message.createMessage`: stores a message and returns its identifier.
    async fn create(&self, params: CreateMessageParams) -> RemoteResult<MessageId>;

    /// `message.batchCreateMessages`: stores rows in the given order.
    async fn batch_create(&self, messages: Vec<MessageItem>) -> RemoteResult<BatchCreateOutcome>;

    /// `message.getMessages`: lists messages in a session and topic.
    async fn get_messages(&self, scope: MessageScope) -> RemoteResult<Vec<ChatMessage>>;

    /// `message.getAllMessages`: lists every message.
    async fn get_all_messages(&self) -> RemoteResult<Vec<ChatMessage>>;

    /// `message.getAllMessagesInSession`: lists every message in a session,
    /// across topics.
    async fn get_all_messages_in_session(
        &self,
        scope: SessionScope,
    ) -> RemoteResult<Vec<ChatMessage>>;

    /// `message.count`: total number of messages.
    async fn count(&self) -> RemoteResult<u64>;

    /// `message.countToday`: messages created since the start of the
    /// remote side's current day.
    async fn count_today(&self) -> RemoteResult<u64>;

    /// `message.update`: applies a partial update.
    async fn update(&self, request: UpdateRequest<MessageUpdate>) -> RemoteResult<()>;

    /// `message.updateMessagePlugin`: updates plugin call fields.
    async fn update_message_plugin(&self, request: UpdateRequest<PluginUpdate>)
    -> RemoteResult<()>;

    /// `message.updateTranslate`: merges or clears the translation.
    async fn update_translate(
        &self,
        request: UpdateRequest<ClearOr<Translation>>,
    ) -> RemoteResult<()>;

    /// `message.updateTTS`: merges or clears the TTS record.
    async fn update_tts(&self, request: UpdateRequest<ClearOr<TtsRecord>>) -> RemoteResult<()>;

    /// `message.updatePluginState`: replaces the plugin state blob.
    async fn update_plugin_state(&self, request: UpdateRequest<Value>) -> RemoteResult<()>;

    /// `message.removeMessage`.
    async fn remove_message(&self, request: RemoveMessageRequest) -> RemoteResult<()>;

    /// `message.removeMessages`.
    async fn remove_messages(&self, request: RemoveMessagesRequest) -> RemoteResult<()>;

    /// `message.removeMessagesByAssistant`: removes a session's messages,
    /// optionally limited to one topic.
    async fn remove_messages_by_assistant(&self, scope: MessageScope) -> RemoteResult<()>;

    /// `message.removeAllMessages`.
    async fn remove_all_messages(&self) -> RemoteResult<()>;
}
