//! Keyrace terminal client.
//!
//! - `clock_sync`: offset between the local and the server clock
//! - `controller`: mirrored room state and input gating
//! - `typing`: scoring of typed input
//! - `session` / `runner`: the interactive connection and its reconnect loop

pub mod clock_sync;
pub mod command;
pub mod controller;
mod domain;
pub mod error;
pub mod formatter;
pub mod link;
mod runner;
pub mod session;
pub mod typing;
mod ui;

pub use runner::run_client;
pub use session::SessionOptions;
