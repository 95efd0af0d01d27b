//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room list entry for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    /// Display names in join order
    pub players: Vec<String>,
    pub host: Option<String>,
    /// RFC 3339
    pub race_start: Option<String>,
    pub phase: String,
    /// RFC 3339
    pub created_at: String,
}

/// Room detail for `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub text: String,
    pub players: Vec<PlayerDetailDto>,
    pub host: Option<String>,
    pub race_start: Option<String>,
    pub finished_order: Vec<String>,
    pub phase: String,
    pub version: u64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetailDto {
    pub id: String,
    pub name: String,
    pub progress: f64,
    pub wpm: f64,
    pub accuracy: f64,
    pub ready: bool,
    pub finished: bool,
}
