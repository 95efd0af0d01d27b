//! Keyrace terminal client.
//!
//! Connects to a race server, measures the clock offset, then reads commands
//! and typing input from the terminal. Reconnects on disconnection (max 5
//! attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin keyrace-client -- --name Alice
//! cargo run --bin keyrace-client -- -n Bob -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;

use keyrace_client::{SessionOptions, clock_sync::DEFAULT_SAMPLES, run_client};
use keyrace_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "keyrace-client")]
#[command(about = "Terminal client for multiplayer typing races", long_about = None)]
struct Args {
    /// Display name shown to other players
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Number of clock sync round trips per connection
    #[arg(short = 's', long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let options = SessionOptions {
        url: args.url,
        name: args.name,
        samples: args.samples,
    };
    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
