//! UseCase: Room 作成処理
//!
//! 作成者がホストかつ唯一のプレイヤーになる。同じ ID の Room が既にある場合は
//! `RoomExists` で拒否し、既存の Room は上書きしない。

use std::sync::Arc;

use keyrace_shared::time::Clock;

use crate::domain::{
    MessagePusher, PlayerId, PlayerName, PlayerState, RaceText, Room, RoomError, RoomId,
    RoomRepository, Timestamp,
};

use super::broadcast::broadcast_room_state;

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl CreateRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// Room を作成し、作成者に `room:state` を送る
    pub async fn execute(
        &self,
        player_id: PlayerId,
        room_id: RoomId,
        text: RaceText,
        name: PlayerName,
    ) -> Result<Room, RoomError> {
        let host = PlayerState::new(player_id, name);
        let created_at = Timestamp::new(self.clock.now_millis());
        let room = self
            .repository
            .create_room(Room::new(room_id, text, host, created_at))
            .await?;

        broadcast_room_state(self.message_pusher.as_ref(), &room).await;
        Ok(room)
    }
}
