//! UseCase: 準備状態の切り替え
//!
//! 準備状態はデフォルトでは助言扱いで、開始要求の前提条件にはならない
//! （`RacePolicy::require_all_ready` で必須にできる）。

use std::sync::Arc;

use crate::domain::{MessagePusher, PlayerId, Room, RoomError, RoomId, RoomRepository};

use super::broadcast::broadcast_room_state;

pub struct SetReadyUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SetReadyUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(
        &self,
        player_id: PlayerId,
        room_id: RoomId,
        ready: bool,
    ) -> Result<Room, RoomError> {
        let room = self
            .repository
            .set_ready(&room_id, &player_id, ready)
            .await?;

        broadcast_room_state(self.message_pusher.as_ref(), &room).await;
        Ok(room)
    }
}
