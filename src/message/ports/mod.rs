//! Port trait definitions for the message gateway.
//!
//! The gateway depends only on [`RemoteMessageClient`]; transports and test
//! substitutes implement it.

pub mod remote;

pub use remote::{
    BatchCreateOutcome, MessageScope, PluginUpdate, RemoteError, RemoteMessageClient,
    RemoteResult, RemoveMessageRequest, RemoveMessagesRequest, SessionScope, UpdateRequest,
};
