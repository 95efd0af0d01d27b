//! Keyrace race server.
//!
//! Hosts typing-race rooms over WebSocket and schedules synchronized starts.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin keyrace-server
//! cargo run --bin keyrace-server -- --host 0.0.0.0 --port 3000 --lead-ms 3000
//! ```

use std::{collections::HashMap, sync::Arc, time::Duration};

use clap::Parser;
use keyrace_server::{
    config::{DEFAULT_RACE_TIME_LIMIT_SECS, ServerConfig},
    domain::DEFAULT_LEAD_MS,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{AppState, Server},
};
use keyrace_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "keyrace-server")]
#[command(about = "Multiplayer typing race server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Milliseconds between a start request and the race start
    #[arg(long, default_value_t = DEFAULT_LEAD_MS as u64)]
    lead_ms: u64,

    /// Seconds after the start before an unfinished race is reset (0 disables)
    #[arg(long, default_value_t = DEFAULT_RACE_TIME_LIMIT_SECS)]
    race_time_limit_secs: u64,

    /// Refuse to start a race until every player is ready
    #[arg(long)]
    require_all_ready: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            lead: Duration::from_millis(args.lead_ms),
            race_time_limit: ServerConfig::time_limit_from_secs(args.race_time_limit_secs),
            require_all_ready: args.require_all_ready,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());
    tracing::info!(
        "Race lead {} ms, time limit {:?}, readiness {}",
        config.lead.as_millis(),
        config.race_time_limit,
        if config.require_all_ready {
            "required"
        } else {
            "advisory"
        }
    );

    // 1. Repository (in-memory room registry)
    let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. UseCases
    let state = AppState::new(repository, message_pusher, Arc::new(SystemClock), &config);

    // 4. Run the server
    let server = Server::new(state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
