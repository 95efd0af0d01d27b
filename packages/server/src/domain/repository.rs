//! Repository trait 定義
//!
//! ドメイン層が必要とする Room Registry のインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 原子性
//!
//! 各メソッドは「Room の取得 → 検証 → 変更 → スナップショット」を一つの操作として行い、
//! 変更後の Room を返します。同じ Room に対する変更が並行して観測されることはありません。
//! 共有ストア（Redis など）で置き換える場合もこの契約を守る必要があります。

use async_trait::async_trait;

use super::{
    PlayerId, PlayerState, ProgressReport, RaceText, Room, RoomError, RoomId, Timestamp,
};

/// Room Registry trait
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を登録する。同じ ID が既にあれば `RoomExists`（上書きはしない）
    async fn create_room(&self, room: Room) -> Result<Room, RoomError>;

    /// プレイヤーを Room に追加する
    async fn join_room(&self, room_id: &RoomId, player: PlayerState) -> Result<Room, RoomError>;

    /// 課題テキストを差し替える（ホストのみ）
    async fn set_text(
        &self,
        room_id: &RoomId,
        requester: &PlayerId,
        text: RaceText,
    ) -> Result<Room, RoomError>;

    /// 進捗を更新する
    ///
    /// 変更後の Room と、今回新たにゴールが記録されたかを返す。
    async fn update_progress(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
        report: ProgressReport,
    ) -> Result<(Room, bool), RoomError>;

    /// 準備状態を設定する
    async fn set_ready(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
        ready: bool,
    ) -> Result<Room, RoomError>;

    /// レース開始時刻を確定する（ホストのみ、一度だけ）
    async fn schedule_race(
        &self,
        room_id: &RoomId,
        requester: &PlayerId,
        start_at: Timestamp,
        require_all_ready: bool,
    ) -> Result<Room, RoomError>;

    /// レースを待機状態に戻す（ホストのみ）
    async fn reset_race(&self, room_id: &RoomId, requester: &PlayerId) -> Result<Room, RoomError>;

    /// 制限時間切れのレースを戻す。戻した場合だけ `Some`
    async fn expire_race(&self, room_id: &RoomId, start_at: Timestamp) -> Option<Room>;

    /// プレイヤーを Room から外す。Room が空になったら削除して `None` を返す
    async fn leave_room(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
    ) -> Result<Option<Room>, RoomError>;

    /// 全ての Room からプレイヤーを外す（切断時）
    ///
    /// 削除されずに残った、変更のあった Room を返す
    async fn remove_player_everywhere(&self, player_id: &PlayerId) -> Vec<Room>;

    /// Room を取得する
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RoomError>;

    /// 全ての Room を ID 順で取得する
    async fn list_rooms(&self) -> Vec<Room>;
}
