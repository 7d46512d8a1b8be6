//! Message records as exchanged with the remote store.
//!
//! [`ChatMessage`] is the read model returned by queries. [`MessageItem`] is
//! the stored row used for bulk import, and [`MessageUpdate`] is its
//! all-optional patch form. [`CreateMessageParams`] carries the fields a
//! caller supplies when posting a new message.

use super::{ErrorPayload, MessageId, PluginPayload, Role, SessionId, TopicId, Translation, TtsRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message as returned by the remote store.
///
/// The gateway trusts this shape; it never validates query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Author role.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Owning session; `None` for the inbox.
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Topic within the session.
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    /// Message this one replies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MessageId>,
    /// Model that produced an assistant message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_model: Option<String>,
    /// Provider that served the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_provider: Option<String>,
    /// Generation error, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
    /// Plugin invocation, if this message called one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<PluginPayload>,
    /// Plugin failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_error: Option<ErrorPayload>,
    /// Opaque plugin state blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_state: Option<Value>,
    /// Translation of the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<Translation>,
    /// Text-to-speech output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tts: Option<TtsRecord>,
    /// Attached file identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A stored message row, as accepted by bulk import.
///
/// Plugin arguments and identifiers are flattened the way the store keeps
/// them; [`ChatMessage`] is the nested read model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageItem {
    /// Message identifier.
    pub id: MessageId,
    /// Author role.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Owning session; `None` for the inbox.
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Topic within the session.
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    /// Message this one replies to.
    #[serde(default)]
    pub parent_id: Option<MessageId>,
    /// Model that produced an assistant message.
    #[serde(default)]
    pub model: Option<String>,
    /// Provider that served the model.
    #[serde(default)]
    pub provider: Option<String>,
    /// Generation error, if any.
    #[serde(default)]
    pub error: Option<ErrorPayload>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl From<MessageItem> for ChatMessage {
    fn from(item: MessageItem) -> Self {
        Self {
            id: item.id,
            role: item.role,
            content: item.content,
            session_id: item.session_id,
            topic_id: item.topic_id,
            parent_id: item.parent_id,
            from_model: item.model,
            from_provider: item.provider,
            error: item.error,
            plugin: None,
            plugin_error: None,
            plugin_state: None,
            translate: None,
            tts: None,
            files: Vec::new(),
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Partial update of a stored message. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageUpdate {
    /// New message text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// New topic association.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    /// New model provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// New provider provenance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Generation error to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
    /// Plugin error to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_error: Option<ErrorPayload>,
}

impl MessageUpdate {
    /// Patch that sets only the generation error.
    #[must_use]
    pub fn error(error: ErrorPayload) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Patch that sets only the plugin error.
    #[must_use]
    pub fn plugin_error(error: ErrorPayload) -> Self {
        Self {
            plugin_error: Some(error),
            ..Self::default()
        }
    }

    /// Patch that sets only the content.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// Fields supplied by a caller when posting a new message.
///
/// `session_id` is caller-facing: it may hold the inbox sentinel, which the
/// gateway normalises before sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageParams {
    /// Author role.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Target session.
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Target topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    /// Message this one replies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MessageId>,
    /// Model that produced an assistant message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_model: Option<String>,
    /// Provider that served the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_provider: Option<String>,
    /// Plugin invocation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<PluginPayload>,
    /// Generation error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
    /// Attached file identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl CreateMessageParams {
    /// Creates parameters with the required fields.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            session_id: None,
            topic_id: None,
            parent_id: None,
            from_model: None,
            from_provider: None,
            plugin: None,
            error: None,
            files: Vec::new(),
        }
    }

    /// Sets the target session.
    #[must_use]
    pub fn with_session(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the target topic.
    #[must_use]
    pub fn with_topic(mut self, topic_id: impl Into<TopicId>) -> Self {
        self.topic_id = Some(topic_id.into());
        self
    }

    /// Sets the parent message.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<MessageId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Records the model and provider that produced the message.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>, provider: impl Into<String>) -> Self {
        self.from_model = Some(model.into());
        self.from_provider = Some(provider.into());
        self
    }

    /// Attaches a plugin invocation.
    #[must_use]
    pub fn with_plugin(mut self, plugin: PluginPayload) -> Self {
        self.plugin = Some(plugin);
        self
    }

    /// Attaches file identifiers.
    #[must_use]
    pub fn with_files(mut self, files: impl IntoIterator<Item = String>) -> Self {
        self.files = files.into_iter().collect();
        self
    }
}
