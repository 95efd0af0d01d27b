//! UseCase: プレイヤー接続処理
//!
//! WebSocket 接続ごとに PlayerId を発行し、送信チャンネルを登録して
//! `session:welcome` を送る。この時点ではどの Room にも属さない。

use std::sync::Arc;

use keyrace_shared::{protocol::ServerMessage, time::Clock};

use crate::domain::{MessagePusher, PlayerId, PlayerIdFactory, PusherChannel};

use super::broadcast::push_message;

/// プレイヤー接続のユースケース
pub struct ConnectPlayerUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectPlayerUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 接続を登録し、発行した PlayerId を返す
    pub async fn execute(&self, sender: PusherChannel) -> PlayerId {
        let player_id = PlayerIdFactory::generate();
        self.message_pusher
            .register_client(player_id.clone(), sender)
            .await;

        let welcome = ServerMessage::Welcome {
            player_id: player_id.as_str().to_string(),
            server_time: self.clock.now_millis(),
        };
        push_message(self.message_pusher.as_ref(), &player_id, &welcome).await;

        player_id
    }
}
