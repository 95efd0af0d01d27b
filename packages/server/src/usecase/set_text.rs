//! UseCase: 課題テキスト変更処理（ホストのみ）

use std::sync::Arc;

use crate::domain::{MessagePusher, PlayerId, RaceText, Room, RoomError, RoomId, RoomRepository};

use super::broadcast::broadcast_room_state;

pub struct SetTextUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SetTextUseCase {
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
        text: RaceText,
    ) -> Result<Room, RoomError> {
        let room = self
            .repository
            .set_text(&room_id, &player_id, text)
            .await?;

        broadcast_room_state(self.message_pusher.as_ref(), &room).await;
        Ok(room)
    }
}
