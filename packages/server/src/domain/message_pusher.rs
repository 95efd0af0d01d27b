//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信（通知）を抽象化します。
//! 送信は fire-and-forget で、「送信した」は「届いた」を意味しません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, PlayerId};

/// クライアントごとの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, player_id: PlayerId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, player_id: &PlayerId);

    /// 特定のクライアントに送信
    async fn push_to(&self, player_id: &PlayerId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントに送信（一部の失敗は許容）
    async fn broadcast(&self, targets: Vec<PlayerId>, content: &str)
    -> Result<(), MessagePushError>;
}
