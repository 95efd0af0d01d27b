//! Client room controller.
//!
//! Mirrors the latest `room:state` of the joined room and gates typing input
//! on the race deadline. The deadline is the server's `raceStart` converted
//! to the local clock with the measured offset. Gating is re-evaluated on
//! every tick, so input unlocks on the first tick at or after the deadline.

use std::time::Duration;

use keyrace_shared::protocol::RoomSnapshot;

use crate::clock_sync::ClockOffset;

/// How often the countdown is re-evaluated
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// No race scheduled
    Idle,
    /// Race scheduled, input still locked
    Waiting { remaining_ms: i64 },
    /// This tick crossed the deadline and unlocked input
    Started,
    /// Input was already unlocked
    Running,
}

pub struct ClientRoomController {
    offset: ClockOffset,
    player_id: Option<String>,
    room: Option<RoomSnapshot>,
    /// Room left with `/leave`; its snapshots still in flight are dropped
    left_room: Option<String>,
    deadline: Option<i64>,
    unlocked: bool,
}

impl ClientRoomController {
    pub fn new(offset: ClockOffset) -> Self {
        Self {
            offset,
            player_id: None,
            room: None,
            left_room: None,
            deadline: None,
            unlocked: false,
        }
    }

    pub fn apply_welcome(&mut self, player_id: String) {
        self.player_id = Some(player_id);
    }

    /// Apply a snapshot. Returns `false` when it was stale and ignored.
    pub fn apply_state(&mut self, snapshot: RoomSnapshot) -> bool {
        if self.left_room.as_deref() == Some(snapshot.room.as_str()) {
            tracing::debug!(
                "Ignored snapshot of left room '{}' (version {})",
                snapshot.room,
                snapshot.version
            );
            return false;
        }
        if let Some(current) = &self.room
            && current.room == snapshot.room
            && snapshot.version <= current.version
        {
            tracing::debug!(
                "Ignored stale snapshot of '{}' (version {} <= {})",
                snapshot.room,
                snapshot.version,
                current.version
            );
            return false;
        }

        let deadline = snapshot.race_start.map(|ts| self.offset.to_local(ts));
        self.set_deadline(deadline);
        self.room = Some(snapshot);
        true
    }

    /// Record the deadline announced by `race:started`
    pub fn apply_race_started(&mut self, room: &str, start_at: i64) {
        if self.left_room.as_deref() == Some(room)
            || self.room.as_ref().is_some_and(|r| r.room != room)
        {
            return;
        }
        self.set_deadline(Some(self.offset.to_local(start_at)));
    }

    /// Forget the room after leaving it
    pub fn leave(&mut self) {
        self.left_room = self.room.take().map(|r| r.room);
        self.set_deadline(None);
    }

    /// Called when a create or join is sent; snapshots of any room are
    /// accepted again
    pub fn enter(&mut self) {
        self.left_room = None;
    }

    /// Re-evaluate gating against the local clock
    pub fn tick(&mut self, now_local: i64) -> Countdown {
        let Some(deadline) = self.deadline else {
            return Countdown::Idle;
        };
        if self.unlocked {
            return Countdown::Running;
        }
        if now_local >= deadline {
            self.unlocked = true;
            return Countdown::Started;
        }
        Countdown::Waiting {
            remaining_ms: deadline - now_local,
        }
    }

    /// Whether a keystroke may be accepted right now
    pub fn accept_keystroke(&self) -> bool {
        self.unlocked
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    pub fn room(&self) -> Option<&RoomSnapshot> {
        self.room.as_ref()
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room.as_ref().map(|r| r.room.as_str())
    }

    /// Race start on the local clock
    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }

    pub fn offset(&self) -> ClockOffset {
        self.offset
    }

    fn set_deadline(&mut self, deadline: Option<i64>) {
        if self.deadline != deadline {
            self.deadline = deadline;
            self.unlocked = false;
        }
    }
}
