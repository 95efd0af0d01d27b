//! WebSocket message protocol.
//!
//! Every frame is a JSON text message tagged by its `type` field, with
//! camelCase field names:
//!
//! ```text
//! {"type":"room:join","room":"ABCD","name":"P"}
//! {"type":"room:error","error":"Room not found"}
//! ```
//!
//! The client request to start a race (`race:startRequest`) and the server
//! broadcast announcing it (`race:started`) carry different payloads and use
//! distinct names.

use serde::{Deserialize, Serialize};

/// Messages sent from a client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Create a room; the sender becomes its host.
    #[serde(rename = "room:create")]
    CreateRoom {
        room: String,
        text: String,
        name: String,
    },
    /// Join an existing room as a non-host player.
    #[serde(rename = "room:join")]
    JoinRoom { room: String, name: String },
    /// Replace the shared prompt (host only).
    #[serde(rename = "room:setText")]
    SetText { room: String, text: String },
    /// Live typing stats of the sender.
    #[serde(rename = "room:progress")]
    Progress {
        room: String,
        progress: f64,
        wpm: f64,
        accuracy: f64,
    },
    /// Toggle the sender's readiness.
    #[serde(rename = "player:ready")]
    Ready { room: String, ready: bool },
    /// Ask the server to schedule the race (host only).
    #[serde(rename = "race:startRequest")]
    StartRequest { room: String },
    /// Clear a scheduled or finished race so another one can start (host only).
    #[serde(rename = "race:reset")]
    ResetRace { room: String },
    /// Explicit departure from a room.
    #[serde(rename = "room:leave")]
    LeaveRoom { room: String },
    /// Clock sync probe carrying the client's local send time.
    #[serde(rename = "time:request")]
    TimeRequest { client_sent: i64 },
}

impl ClientMessage {
    /// Parse a text frame into a client message
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize the message into a text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// The room this message targets, if any
    pub fn room(&self) -> Option<&str> {
        match self {
            Self::CreateRoom { room, .. }
            | Self::JoinRoom { room, .. }
            | Self::SetText { room, .. }
            | Self::Progress { room, .. }
            | Self::Ready { room, .. }
            | Self::StartRequest { room }
            | Self::ResetRace { room }
            | Self::LeaveRoom { room } => Some(room),
            Self::TimeRequest { .. } => None,
        }
    }
}

/// Messages sent from the server to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// First message on every connection: the id the server assigned to it.
    #[serde(rename = "session:welcome")]
    Welcome { player_id: String, server_time: i64 },
    /// Full room snapshot, broadcast to every member after each mutation.
    #[serde(rename = "room:state")]
    RoomState(RoomSnapshot),
    /// One-shot announcement of the scheduled start (absolute server time).
    #[serde(rename = "race:started")]
    RaceStarted {
        room: String,
        start_at: i64,
        host: String,
    },
    /// Failure of the requester's last operation. Only the requester sees it.
    #[serde(rename = "room:error")]
    Error { error: String },
    /// Echo of a `time:request` with the server's clock reading.
    #[serde(rename = "time:response")]
    TimeResponse { client_sent: i64, server_time: i64 },
}

impl ServerMessage {
    /// Parse a text frame into a server message
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize the message into a text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Complete state of a room as seen by its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub room: String,
    pub text: String,
    /// Players in join order
    pub players: Vec<PlayerSnapshot>,
    pub host: Option<String>,
    /// Scheduled start (server clock, epoch milliseconds)
    pub race_start: Option<i64>,
    pub finished_order: Vec<String>,
    /// Monotonic per-room revision; a snapshot with a lower version is stale
    pub version: u64,
}

impl RoomSnapshot {
    /// Look up a player by id
    pub fn player(&self, player_id: &str) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.id == player_id)
    }
}

/// One roster entry of a [`RoomSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: String,
    pub name: String,
    pub progress: f64,
    pub wpm: f64,
    pub accuracy: f64,
    pub ready: bool,
    pub finished: bool,
}
