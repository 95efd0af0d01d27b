//! UseCase: レースのリセット処理
//!
//! ホストだけが実行できる。開始時刻・ゴール順・各プレイヤーの統計を消し、
//! Room を待機状態に戻す。

use std::sync::Arc;

use crate::domain::{MessagePusher, PlayerId, Room, RoomError, RoomId, RoomRepository};

use super::broadcast::broadcast_room_state;

pub struct ResetRaceUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ResetRaceUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(&self, player_id: PlayerId, room_id: RoomId) -> Result<Room, RoomError> {
        let room = self.repository.reset_race(&room_id, &player_id).await?;
        tracing::info!("Race in room '{}' was reset by '{}'", room_id, player_id);

        broadcast_room_state(self.message_pusher.as_ref(), &room).await;
        Ok(room)
    }
}
