//! UseCase: プレイヤー切断処理
//!
//! ## 流れ
//!
//! 1. 送信チャンネルの登録を解除
//! 2. 全 Room からプレイヤーを取り除く（空になった Room は削除）
//! 3. 残った Room それぞれに `room:state` を送る
//!
//! 接続が一つの Room に束縛されていても、取り残しがないよう全 Room を走査する。

use std::sync::Arc;

use crate::domain::{MessagePusher, PlayerId, RoomRepository};

use super::broadcast::broadcast_room_state;

pub struct DisconnectPlayerUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectPlayerUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(&self, player_id: PlayerId) {
        self.message_pusher.unregister_client(&player_id).await;

        let affected = self.repository.remove_player_everywhere(&player_id).await;
        for room in &affected {
            broadcast_room_state(self.message_pusher.as_ref(), room).await;
        }
        tracing::info!(
            "Player '{}' disconnected ({} room(s) updated)",
            player_id,
            affected.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoomError;
    use crate::domain::message_pusher::MockMessagePusher;
    use crate::usecase::test_support::{
        RecordingPusher, create_test_repository, pid, rid, seed_room,
    };
    use keyrace_shared::protocol::ServerMessage;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_host_disconnect_promotes_remaining_player() {
        // テスト項目: ホストが切断すると残ったプレイヤーがホストとして通知される
        // given (前提条件):
        let repository = create_test_repository();
        seed_room(&repository, &["p"]).await;
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = DisconnectPlayerUseCase::new(repository.clone(), pusher.clone());

        // when (操作):
        usecase.execute(pid("h")).await;

        // then (期待する結果):
        let broadcasts = pusher.broadcasts();
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].0, vec![pid("p")]);
        let ServerMessage::RoomState(snapshot) = &broadcasts[0].1 else {
            panic!("expected room:state");
        };
        assert_eq!(snapshot.host.as_deref(), Some("p"));
        assert_eq!(snapshot.players.len(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_unregisters_and_removes_empty_room() {
        // テスト項目: 唯一のプレイヤーが切断すると登録解除され、Room も削除される
        // given (前提条件):
        let repository = create_test_repository();
        seed_room(&repository, &[]).await;
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_unregister_client()
            .with(eq(pid("h")))
            .times(1)
            .returning(|_| ());
        pusher.expect_broadcast().never();
        let usecase = DisconnectPlayerUseCase::new(repository.clone(), Arc::new(pusher));

        // when (操作):
        usecase.execute(pid("h")).await;

        // then (期待する結果):
        assert_eq!(
            repository.get_room(&rid("ABCD")).await.unwrap_err(),
            RoomError::RoomNotFound
        );
    }
}
