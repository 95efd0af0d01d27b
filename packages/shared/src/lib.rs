//! Shared building blocks for the Keyrace server and client.
//!
//! - `protocol`: JSON messages exchanged over the WebSocket connection
//! - `time`: clock abstraction used by the race scheduler and clock sync
//! - `logger`: tracing subscriber setup for the binaries

pub mod logger;
pub mod protocol;
pub mod time;
