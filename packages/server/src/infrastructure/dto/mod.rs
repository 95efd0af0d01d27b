//! Data Transfer Objects (DTOs) for the race server.
//!
//! DTOs are organized by protocol:
//! - `http`: HTTP API response DTOs
//! - WebSocket messages live in `keyrace_shared::protocol`; `conversion`
//!   maps domain entities onto them

pub mod conversion;
pub mod http;
