//! Application services for the message gateway.

mod gateway;


pub use gateway::{MessageGateway, TRACE_CHECK_THRESHOLD};
