//! UseCase: 時刻同期の応答
//!
//! `time:request` の `clientSent` をそのまま返し、サーバー時計の現在時刻を添える。
//! Room の状態には一切触れない。

use std::sync::Arc;

use keyrace_shared::{protocol::ServerMessage, time::Clock};

use crate::domain::{MessagePusher, PlayerId};

use super::broadcast::push_message;

pub struct SyncTimeUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SyncTimeUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 要求元に `time:response` を返す
    pub async fn execute(&self, player_id: &PlayerId, client_sent: i64) {
        let response = ServerMessage::TimeResponse {
            client_sent,
            server_time: self.clock.now_millis(),
        };
        push_message(self.message_pusher.as_ref(), player_id, &response).await;
    }
}
