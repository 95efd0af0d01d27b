//! UseCase: 進捗更新処理
//!
//! 進捗は `[0, 1]` に丸めて保存し、後から届いた値で上書きする（後勝ち）。
//! プレイヤー間の順序はサーバーへの到着順以上には保証しない。

use std::sync::Arc;

use crate::domain::{
    MessagePusher, PlayerId, ProgressReport, Room, RoomError, RoomId, RoomRepository,
};

use super::broadcast::broadcast_room_state;

pub struct UpdateProgressUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdateProgressUseCase {
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
        report: ProgressReport,
    ) -> Result<Room, RoomError> {
        let (room, newly_finished) = self
            .repository
            .update_progress(&room_id, &player_id, report)
            .await?;

        if newly_finished {
            tracing::info!(
                "Player '{}' finished in room '{}' (position {})",
                player_id,
                room_id,
                room.finished_order().len()
            );
        }

        broadcast_room_state(self.message_pusher.as_ref(), &room).await;
        Ok(room)
    }
}
