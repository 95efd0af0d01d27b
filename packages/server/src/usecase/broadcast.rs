//! Room メンバーへの送信ヘルパー
//!
//! 送信は fire-and-forget。失敗はログに残すだけで、呼び出し元の操作は失敗させない。
//! 毎回完全なスナップショットを送るので、取りこぼした更新は次の更新で上書きされる。

use keyrace_shared::protocol::{RoomSnapshot, ServerMessage};

use crate::domain::{MessagePusher, PlayerId, Room};

/// Room の全メンバーに `room:state` を送る
pub async fn broadcast_room_state(message_pusher: &dyn MessagePusher, room: &Room) {
    let message = ServerMessage::RoomState(RoomSnapshot::from(room));
    broadcast_to_room(message_pusher, room, &message).await;
}

/// Room の全メンバーにメッセージを送る
pub async fn broadcast_to_room(
    message_pusher: &dyn MessagePusher,
    room: &Room,
    message: &ServerMessage,
) {
    let json = match message.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize message for room '{}': {}", room.id(), e);
            return;
        }
    };
    if let Err(e) = message_pusher.broadcast(room.player_ids(), &json).await {
        tracing::warn!("Failed to broadcast to room '{}': {}", room.id(), e);
    } else {
        tracing::debug!(
            "Broadcasted to room '{}' (version {})",
            room.id(),
            room.version()
        );
    }
}

/// 一人のプレイヤーにだけメッセージを送る
pub async fn push_message(
    message_pusher: &dyn MessagePusher,
    player_id: &PlayerId,
    message: &ServerMessage,
) {
    let json = match message.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize message for '{}': {}", player_id, e);
            return;
        }
    };
    if let Err(e) = message_pusher.push_to(player_id, &json).await {
        tracing::warn!("Failed to push message to '{}': {}", player_id, e);
    }
}
