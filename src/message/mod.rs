//! Message gateway: a typed forwarding layer over a remote message store.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Message records and identifiers ([`domain::ChatMessage`], [`domain::SessionId`], etc.)
//! - **Ports**: The remote procedure interface ([`ports::RemoteMessageClient`])
//! - **Services**: The forwarding façade ([`services::MessageGateway`])
//! - **Adapters**: Substitute implementations ([`adapters::memory::InMemoryMessageStore`])
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use mockable::DefaultClock;
//! use courier::message::{
//!     adapters::memory::InMemoryMessageStore,
//!     domain::{ClearOr, CreateMessageParams, Role},
//!     services::MessageGateway,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), courier::message::ports::RemoteError> {
//! let gateway = MessageGateway::new(Arc::new(InMemoryMessageStore::<DefaultClock>::default()));
//!
//! let id = gateway
//!     .create_message(CreateMessageParams::new(Role::User, "Hello!").with_session("sess-1"))
//!     .await?;
//! gateway.update_message_translate(id, ClearOr::Clear).await?;
//!
//! assert!(gateway.has_messages().await?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
