//! Adapters for the message gateway's port.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryMessageStore`]: thread-safe in-memory stand-in for the
//!   remote store
//!
//! Network transports live outside this crate and implement
//! [`RemoteMessageClient`] directly.
//!
//! [`RemoteMessageClient`]: crate::message::ports::RemoteMessageClient

pub mod memory;
