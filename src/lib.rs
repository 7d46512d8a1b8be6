//! Courier: typed client-side gateway for a remote chat message store.
//!
//! The crate maps local, strongly typed calls onto the remote procedures of
//! a message store. It owns no transport and no storage; both sit behind
//! the [`message::ports::RemoteMessageClient`] port.
//!
//! # Architecture
//!
//! Courier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure data types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`message`]: Message records, the remote port, and the gateway

pub mod message;
