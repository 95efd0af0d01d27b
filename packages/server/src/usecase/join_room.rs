//! UseCase: Room 参加処理

use std::sync::Arc;

use crate::domain::{
    MessagePusher, PlayerId, PlayerName, PlayerState, Room, RoomError, RoomId, RoomRepository,
};

use super::broadcast::broadcast_room_state;

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 非ホストのプレイヤーとして参加し、全メンバーに `room:state` を送る
    ///
    /// # Errors
    ///
    /// * `RoomNotFound` - Room が存在しない
    /// * `AlreadyInRoom` - 既に参加している
    pub async fn execute(
        &self,
        player_id: PlayerId,
        room_id: RoomId,
        name: PlayerName,
    ) -> Result<Room, RoomError> {
        let room = self
            .repository
            .join_room(&room_id, PlayerState::new(player_id, name))
            .await?;

        broadcast_room_state(self.message_pusher.as_ref(), &room).await;
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{
        RecordingPusher, create_test_repository, name, pid, rid, seed_room,
    };
    use keyrace_shared::protocol::ServerMessage;

    #[tokio::test]
    async fn test_join_broadcasts_full_roster_to_all_members() {
        // テスト項目: 参加すると既存メンバーと参加者の両方に全員入りの room:state が届く
        // given (前提条件):
        let repository = create_test_repository();
        seed_room(&repository, &[]).await;
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = JoinRoomUseCase::new(repository.clone(), pusher.clone());

        // when (操作):
        usecase
            .execute(pid("p"), rid("ABCD"), name("P"))
            .await
            .unwrap();

        // then (期待する結果):
        let broadcasts = pusher.broadcasts();
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].0, vec![pid("h"), pid("p")]);
        let ServerMessage::RoomState(snapshot) = &broadcasts[0].1 else {
            panic!("expected room:state");
        };
        let names: Vec<&str> = snapshot.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["H", "P"]);
        assert_eq!(snapshot.host.as_deref(), Some("h"));
    }

    #[tokio::test]
    async fn test_join_unknown_room_changes_nothing() {
        // テスト項目: 存在しない Room への参加は RoomNotFound で、誰にも送信しない
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = JoinRoomUseCase::new(repository.clone(), pusher.clone());

        // when (操作):
        let result = usecase.execute(pid("p"), rid("ZZZZ"), name("P")).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::RoomNotFound));
        assert!(pusher.broadcasts().is_empty());
        assert!(repository.list_rooms().await.is_empty());
    }
}
