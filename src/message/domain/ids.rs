//! Identifier newtypes for messages, sessions, and topics.
//!
//! Identifiers are minted by the remote store, so they wrap opaque strings
//! rather than UUIDs. Wrapping them keeps message, session, and topic
//! identifiers from being mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved session identifier for the default (inbox) conversation.
///
/// The remote store has no session row for the inbox; messages in it carry
/// no session association at all.
pub const INBOX_SESSION_ID: &str = "inbox";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id! {
    /// Identifier of a single message in the remote store.
    ///
    /// # Examples
    ///
    /// ```
    /// use courier::message::domain::MessageId;
    ///
    /// let id = MessageId::new("msg_123");
    /// assert_eq!(id.as_str(), "msg_123");
    /// ```
    MessageId
}

string_id! {
    /// Identifier of a chat session (an assistant conversation).
    SessionId
}

string_id! {
    /// Identifier of a topic within a session.
    TopicId
}

impl SessionId {
    /// Returns the reserved inbox session identifier.
    #[must_use]
    pub fn inbox() -> Self {
        Self::new(INBOX_SESSION_ID)
    }

    /// Returns `true` if this is the reserved inbox identifier.
    #[must_use]
    pub fn is_inbox(&self) -> bool {
        self.0 == INBOX_SESSION_ID
    }
}

/// Maps a caller-facing session identifier to the one the remote store
/// expects.
///
/// The inbox sentinel becomes `None`; every other value passes through
/// unchanged.
///
/// # Examples
///
/// ```
/// use courier::message::domain::{SessionId, normalize_session_id};
///
/// assert_eq!(normalize_session_id(Some(SessionId::inbox())), None);
/// assert_eq!(
///     normalize_session_id(Some(SessionId::new("sess-1"))),
///     Some(SessionId::new("sess-1")),
/// );
/// assert_eq!(normalize_session_id(None), None);
/// ```
#[must_use]
pub fn normalize_session_id(session_id: Option<SessionId>) -> Option<SessionId> {
    session_id.filter(|id| !id.is_inbox())
}
