//! In-memory implementation of the `RemoteMessageClient` port.
//!
//! Stands in for the remote store in tests and local wiring. Thread-safe via
//! an internal [`RwLock`]; not meant for production traffic.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Local;
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::message::{
    domain::{
        ChatMessage, ClearOr, CreateMessageParams, MessageId, MessageItem, MessageUpdate,
        Translation, TtsRecord,
    },
    ports::{
        BatchCreateOutcome, MessageScope, PluginUpdate, RemoteError, RemoteMessageClient,
        RemoteResult, RemoveMessageRequest, RemoveMessagesRequest, SessionScope, UpdateRequest,
    },
};

/// In-memory message store implementing [`RemoteMessageClient`].
///
/// Messages keep insertion order; queries return them sorted by creation
/// time. "Today" is the current local date of the injected clock.
///
/// Topic scoping differs between reads and removals. `get_messages` with no
/// topic returns only the session's topic-less messages, while
/// `remove_messages_by_assistant` with no topic removes the session's
/// messages in every topic.
///
/// # Example
///
/// ```
/// use courier::message::adapters::memory::InMemoryMessageStore;
///
/// let store: InMemoryMessageStore = InMemoryMessageStore::default();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryMessageStore<C: Clock + Send + Sync = DefaultClock> {
    messages: Arc<RwLock<Vec<ChatMessage>>>,
    clock: C,
}

impl Default for InMemoryMessageStore<DefaultClock> {
    fn default() -> Self {
        Self::new(DefaultClock)
    }
}

impl<C: Clock + Send + Sync> InMemoryMessageStore<C> {
    /// Creates an empty store using the given clock for timestamps.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            clock,
        }
    }

    /// Returns the number of stored messages.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no messages are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a stored message by identifier, if present.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Unavailable`] if the internal lock is poisoned.
    pub fn find(&self, id: &MessageId) -> RemoteResult<Option<ChatMessage>> {
        Ok(self.read()?.iter().find(|m| &m.id == id).cloned())
    }

    fn read(&self) -> RemoteResult<RwLockReadGuard<'_, Vec<ChatMessage>>> {
        self.messages
            .read()
            .map_err(|e| RemoteError::unavailable(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> RemoteResult<RwLockWriteGuard<'_, Vec<ChatMessage>>> {
        self.messages
            .write()
            .map_err(|e| RemoteError::unavailable(format!("lock poisoned: {e}")))
    }

    fn select(&self, keep: impl Fn(&ChatMessage) -> bool) -> RemoteResult<Vec<ChatMessage>> {
        let mut selected: Vec<ChatMessage> =
            self.read()?.iter().filter(|m| keep(*m)).cloned().collect();
        selected.sort_by_key(|m| m.created_at);
        Ok(selected)
    }

    /// Applies `change` to one message and bumps its update time.
    fn modify(
        &self,
        id: &MessageId,
        change: impl FnOnce(&mut ChatMessage) -> RemoteResult<()>,
    ) -> RemoteResult<()> {
        let now = self.clock.utc();
        let mut guard = self.write()?;
        let message = guard
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| RemoteError::NotFound(id.clone()))?;
        change(message)?;
        message.updated_at = now;
        Ok(())
    }
}

fn new_message_id() -> MessageId {
    MessageId::new(format!("msg_{}", Uuid::new_v4().simple()))
}

fn apply_update(message: &mut ChatMessage, update: MessageUpdate) {
    let MessageUpdate {
        content,
        role,
        topic_id,
        model,
        provider,
        error,
        plugin_error,
    } = update;

    if let Some(content) = content {
        message.content = content;
    }
    if let Some(role) = role {
        message.role = role;
    }
    if topic_id.is_some() {
        message.topic_id = topic_id;
    }
    if model.is_some() {
        message.from_model = model;
    }
    if provider.is_some() {
        message.from_provider = provider;
    }
    if error.is_some() {
        message.error = error;
    }
    if plugin_error.is_some() {
        message.plugin_error = plugin_error;
    }
}

fn merge_translation(current: Option<Translation>, patch: Translation) -> Translation {
    let base = current.unwrap_or_default();
    Translation {
        from: patch.from.or(base.from),
        to: patch.to.or(base.to),
        content: patch.content.or(base.content),
    }
}

fn merge_tts(current: Option<TtsRecord>, patch: TtsRecord) -> TtsRecord {
    let base = current.unwrap_or_default();
    TtsRecord {
        content_md5: patch.content_md5.or(base.content_md5),
        file: patch.file.or(base.file),
        voice: patch.voice.or(base.voice),
    }
}

#[async_trait]
impl<C: Clock + Send + Sync> RemoteMessageClient for InMemoryMessageStore<C> {
    async fn create(&self, params: CreateMessageParams) -> RemoteResult<MessageId> {
        let now = self.clock.utc();
        let id = new_message_id();
        let message = ChatMessage {
            id: id.clone(),
            role: params.role,
            content: params.content,
            session_id: params.session_id,
            topic_id: params.topic_id,
            parent_id: params.parent_id,
            from_model: params.from_model,
            from_provider: params.from_provider,
            error: params.error,
            plugin: params.plugin,
            plugin_error: None,
            plugin_state: None,
            translate: None,
            tts: None,
            files: params.files,
            created_at: now,
            updated_at: now,
        };
        self.write()?.push(message);
        debug!(message_id = %id, "stored message");
        Ok(id)
    }

    async fn batch_create(&self, messages: Vec<MessageItem>) -> RemoteResult<BatchCreateOutcome> {
        let mut guard = self.write()?;
        let mut outcome = BatchCreateOutcome {
            success: true,
            ..BatchCreateOutcome::default()
        };

        for item in messages {
            if guard.iter().any(|m| m.id == item.id) {
                outcome.skips.push(item.id);
                continue;
            }
            outcome.ids.push(item.id.clone());
            guard.push(ChatMessage::from(item));
        }
        outcome.added = outcome.ids.len();
        debug!(added = outcome.added, skipped = outcome.skips.len(), "imported messages");
        Ok(outcome)
    }

    async fn get_messages(&self, scope: MessageScope) -> RemoteResult<Vec<ChatMessage>> {
        self.select(|m| m.session_id == scope.session_id && m.topic_id == scope.topic_id)
    }

    async fn get_all_messages(&self) -> RemoteResult<Vec<ChatMessage>> {
        self.select(|_| true)
    }

    async fn get_all_messages_in_session(
        &self,
        scope: SessionScope,
    ) -> RemoteResult<Vec<ChatMessage>> {
        self.select(|m| m.session_id == scope.session_id)
    }

    async fn count(&self) -> RemoteResult<u64> {
        Ok(self.read()?.len() as u64)
    }

    async fn count_today(&self) -> RemoteResult<u64> {
        let today = self.clock.local().date_naive();
        let count = self
            .read()?
            .iter()
            .filter(|m| m.created_at.with_timezone(&Local).date_naive() == today)
            .count();
        Ok(count as u64)
    }

    async fn update(&self, request: UpdateRequest<MessageUpdate>) -> RemoteResult<()> {
        let UpdateRequest { id, value } = request;
        self.modify(&id, |message| {
            apply_update(message, value);
            Ok(())
        })
    }

    async fn update_message_plugin(
        &self,
        request: UpdateRequest<PluginUpdate>,
    ) -> RemoteResult<()> {
        let UpdateRequest { id, value } = request;
        self.modify(&id, |message| match message.plugin.as_mut() {
            Some(plugin) => {
                plugin.arguments = value.arguments;
                Ok(())
            }
            None => Err(RemoteError::rejected(
                "BAD_REQUEST",
                format!("message {} has no plugin call", message.id),
            )),
        })
    }

    async fn update_translate(
        &self,
        request: UpdateRequest<ClearOr<Translation>>,
    ) -> RemoteResult<()> {
        let UpdateRequest { id, value } = request;
        self.modify(&id, |message| {
            message.translate = match value {
                ClearOr::Clear => None,
                ClearOr::Value(patch) => Some(merge_translation(message.translate.take(), patch)),
            };
            Ok(())
        })
    }

    async fn update_tts(&self, request: UpdateRequest<ClearOr<TtsRecord>>) -> RemoteResult<()> {
        let UpdateRequest { id, value } = request;
        self.modify(&id, |message| {
            message.tts = match value {
                ClearOr::Clear => None,
                ClearOr::Value(patch) => Some(merge_tts(message.tts.take(), patch)),
            };
            Ok(())
        })
    }

    async fn update_plugin_state(&self, request: UpdateRequest<Value>) -> RemoteResult<()> {
        let UpdateRequest { id, value } = request;
        self.modify(&id, |message| {
            message.plugin_state = Some(value);
            Ok(())
        })
    }

    async fn remove_message(&self, request: RemoveMessageRequest) -> RemoteResult<()> {
        self.write()?.retain(|m| m.id != request.id);
        Ok(())
    }

    async fn remove_messages(&self, request: RemoveMessagesRequest) -> RemoteResult<()> {
        self.write()?.retain(|m| !request.ids.contains(&m.id));
        Ok(())
    }

    async fn remove_messages_by_assistant(&self, scope: MessageScope) -> RemoteResult<()> {
        self.write()?.retain(|m| {
            let in_session = m.session_id == scope.session_id;
            let in_topic = scope.topic_id.is_none() || m.topic_id == scope.topic_id;
            !(in_session && in_topic)
        });
        Ok(())
    }

    async fn remove_all_messages(&self) -> RemoteResult<()> {
        self.write()?.clear();
        Ok(())
    }
}
