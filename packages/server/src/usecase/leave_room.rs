//! UseCase: Room からの退出処理
//!
//! 退出したプレイヤーがホストだった場合は残りの先頭プレイヤーがホストになる。
//! 最後の一人が抜けた Room は削除され、通知先がいないので何も送らない。

use std::sync::Arc;

use crate::domain::{MessagePusher, PlayerId, Room, RoomError, RoomId, RoomRepository};

use super::broadcast::broadcast_room_state;

pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 退出後の Room を返す。Room が削除された場合は `None`
    pub async fn execute(
        &self,
        player_id: PlayerId,
        room_id: RoomId,
    ) -> Result<Option<Room>, RoomError> {
        let remaining = self.repository.leave_room(&room_id, &player_id).await?;
        tracing::info!("Player '{}' left room '{}'", player_id, room_id);

        if let Some(room) = &remaining {
            broadcast_room_state(self.message_pusher.as_ref(), room).await;
        }
        Ok(remaining)
    }
}
