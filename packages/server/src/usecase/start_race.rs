//! UseCase: レース開始処理
//!
//! ## 流れ
//!
//! 1. Race Scheduler が開始時刻 `now + lead` を決める
//! 2. Repository で開始時刻を確定（ホストのみ、一度だけ）
//! 3. `race:started` を一度だけブロードキャスト（再送・訂正はしない）
//! 4. 続けて `room:state` をブロードキャスト
//! 5. 制限時間が設定されていれば、`start_at + limit` に未完了のレースを戻すタイマーを仕掛ける

use std::{sync::Arc, time::Duration};

use keyrace_shared::protocol::ServerMessage;

use crate::domain::{
    MessagePusher, PlayerId, RaceScheduler, RoomError, RoomId, RoomRepository, Timestamp,
};

use super::broadcast::{broadcast_room_state, broadcast_to_room};

/// レース開始に関するサーバーの方針
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RacePolicy {
    /// 全員の準備完了を開始の前提条件にする
    pub require_all_ready: bool,
    /// 開始からこの時間が経っても全員ゴールしていなければレースを戻す
    pub time_limit: Option<Duration>,
}

/// レース開始のユースケース
pub struct StartRaceUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    scheduler: Arc<RaceScheduler>,
    policy: RacePolicy,
}

impl StartRaceUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        scheduler: Arc<RaceScheduler>,
        policy: RacePolicy,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            scheduler,
            policy,
        }
    }

    /// レースを予定し、確定した開始時刻（サーバー時計）を返す
    ///
    /// # Errors
    ///
    /// * `RoomNotFound` - Room が存在しない
    /// * `NotInRoom` / `NotHost` - 要求者がホストではない
    /// * `RaceAlreadyScheduled` - 既に予定済み（開始時刻は変わらない）
    /// * `PlayersNotReady` - 準備必須の設定で未準備のプレイヤーがいる
    pub async fn execute(
        &self,
        player_id: PlayerId,
        room_id: RoomId,
    ) -> Result<Timestamp, RoomError> {
        let start_at = self.scheduler.next_start();
        let room = self
            .repository
            .schedule_race(
                &room_id,
                &player_id,
                start_at,
                self.policy.require_all_ready,
            )
            .await?;

        tracing::info!(
            "Race in room '{}' scheduled at {} ({} ms lead)",
            room_id,
            start_at.value(),
            self.scheduler.lead().as_millis()
        );

        let started = ServerMessage::RaceStarted {
            room: room_id.as_str().to_string(),
            start_at: start_at.value(),
            host: player_id.as_str().to_string(),
        };
        broadcast_to_room(self.message_pusher.as_ref(), &room, &started).await;
        broadcast_room_state(self.message_pusher.as_ref(), &room).await;

        if let Some(limit) = self.policy.time_limit {
            self.arm_time_limit(room_id, start_at, limit);
        }

        Ok(start_at)
    }

    fn arm_time_limit(&self, room_id: RoomId, start_at: Timestamp, limit: Duration) {
        let repository = self.repository.clone();
        let message_pusher = self.message_pusher.clone();
        let delay = self.scheduler.until(start_at).saturating_add(limit);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(room) = repository.expire_race(&room_id, start_at).await {
                tracing::info!(
                    "Race in room '{}' hit the time limit and was reset",
                    room_id
                );
                broadcast_room_state(message_pusher.as_ref(), &room).await;
            }
        });
    }
}
