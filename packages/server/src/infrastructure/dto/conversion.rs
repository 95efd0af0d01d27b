//! Conversion logic from domain entities to DTOs.

use keyrace_shared::{
    protocol::{PlayerSnapshot, RoomSnapshot},
    time::timestamp_to_rfc3339,
};

use crate::domain::{PlayerState, Room, Timestamp};
use crate::infrastructure::dto::http::{PlayerDetailDto, RoomDetailDto, RoomSummaryDto};

// ========================================
// Domain Entity → WebSocket snapshot
// ========================================

impl From<&PlayerState> for PlayerSnapshot {
    fn from(player: &PlayerState) -> Self {
        Self {
            id: player.id.as_str().to_string(),
            name: player.name.as_str().to_string(),
            progress: player.progress.value(),
            wpm: player.wpm,
            accuracy: player.accuracy,
            ready: player.ready,
            finished: player.finished,
        }
    }
}

impl From<&Room> for RoomSnapshot {
    fn from(room: &Room) -> Self {
        Self {
            room: room.id().as_str().to_string(),
            text: room.text().as_str().to_string(),
            players: room.players().iter().map(PlayerSnapshot::from).collect(),
            host: room.host().map(|h| h.as_str().to_string()),
            race_start: room.race_start().map(|t| t.value()),
            finished_order: room
                .finished_order()
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            version: room.version(),
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&PlayerState> for PlayerDetailDto {
    fn from(player: &PlayerState) -> Self {
        Self {
            id: player.id.as_str().to_string(),
            name: player.name.as_str().to_string(),
            progress: player.progress.value(),
            wpm: player.wpm,
            accuracy: player.accuracy,
            ready: player.ready,
            finished: player.finished,
        }
    }
}

impl RoomSummaryDto {
    /// Build a summary; `now` decides the reported race phase
    pub fn from_room(room: &Room, now: Timestamp) -> Self {
        Self {
            id: room.id().as_str().to_string(),
            players: room
                .players()
                .iter()
                .map(|p| p.name.as_str().to_string())
                .collect(),
            host: room.host().map(|h| h.as_str().to_string()),
            race_start: room.race_start().map(|t| timestamp_to_rfc3339(t.value())),
            phase: room.race_phase(now).as_str().to_string(),
            created_at: timestamp_to_rfc3339(room.created_at().value()),
        }
    }
}

impl RoomDetailDto {
    /// Build a detail view; `now` decides the reported race phase
    pub fn from_room(room: &Room, now: Timestamp) -> Self {
        Self {
            id: room.id().as_str().to_string(),
            text: room.text().as_str().to_string(),
            players: room.players().iter().map(PlayerDetailDto::from).collect(),
            host: room.host().map(|h| h.as_str().to_string()),
            race_start: room.race_start().map(|t| timestamp_to_rfc3339(t.value())),
            finished_order: room
                .finished_order()
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            phase: room.race_phase(now).as_str().to_string(),
            version: room.version(),
            created_at: timestamp_to_rfc3339(room.created_at().value()),
        }
    }
}
