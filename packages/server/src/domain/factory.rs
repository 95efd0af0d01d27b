//! ID の生成

use uuid::Uuid;

use super::PlayerId;

/// PlayerId を発行するファクトリ
pub struct PlayerIdFactory;

impl PlayerIdFactory {
    /// 接続ごとに一意な PlayerId を生成（UUID v4）
    pub fn generate() -> PlayerId {
        PlayerId::from(Uuid::new_v4())
    }
}
