//! Domain types for the message gateway.
//!
//! Pure data: no transport, no storage. Every type is serialisable via serde
//! with the camelCase field names the remote store uses.

mod ids;
mod message;
mod payload;
mod role;

pub use ids::{INBOX_SESSION_ID, MessageId, SessionId, TopicId, normalize_session_id};
pub use message::{ChatMessage, CreateMessageParams, MessageItem, MessageUpdate};
pub use payload::{ClearOr, ErrorPayload, PluginArguments, PluginPayload, Translation, TtsRecord};
pub use role::{ParseRoleError, Role};
