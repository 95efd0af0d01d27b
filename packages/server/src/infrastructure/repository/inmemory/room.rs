//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 全ての変更は一つの Mutex の中で「取得 → 検証 → 変更 → クローン」まで行うため、
//! 同じ Room に対する書き込みは常に直列化されます。プロセスを再起動すると状態は消えます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    PlayerId, PlayerState, ProgressReport, RaceText, Room, RoomError, RoomId, RoomRepository,
    Timestamp,
};

/// インメモリ Room Repository 実装
#[derive(Clone, Default)]
pub struct InMemoryRoomRepository {
    /// Key: RoomId, Value: Room ドメインモデル
    rooms: Arc<Mutex<HashMap<RoomId, Room>>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(rooms: Arc<Mutex<HashMap<RoomId, Room>>>) -> Self {
        Self { rooms }
    }

    /// Room を一つ取り出して変更し、変更後のスナップショットを返す
    async fn mutate<F>(&self, room_id: &RoomId, f: F) -> Result<Room, RoomError>
    where
        F: FnOnce(&mut Room) -> Result<(), RoomError> + Send,
    {
        self.mutate_with(room_id, f).await.map(|(room, ())| room)
    }

    /// `mutate` と同じだが、変更処理の戻り値も一緒に返す
    async fn mutate_with<F, T>(&self, room_id: &RoomId, f: F) -> Result<(Room, T), RoomError>
    where
        F: FnOnce(&mut Room) -> Result<T, RoomError> + Send,
    {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        let output = f(room)?;
        Ok((room.clone(), output))
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, room: Room) -> Result<Room, RoomError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(room.id()) {
            return Err(RoomError::RoomExists);
        }
        tracing::info!("Room '{}' created", room.id());
        rooms.insert(room.id().clone(), room.clone());
        Ok(room)
    }

    async fn join_room(&self, room_id: &RoomId, player: PlayerState) -> Result<Room, RoomError> {
        self.mutate(room_id, |room| room.add_player(player)).await
    }

    async fn set_text(
        &self,
        room_id: &RoomId,
        requester: &PlayerId,
        text: RaceText,
    ) -> Result<Room, RoomError> {
        self.mutate(room_id, |room| room.set_text(requester, text))
            .await
    }

    async fn update_progress(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
        report: ProgressReport,
    ) -> Result<(Room, bool), RoomError> {
        self.mutate_with(room_id, |room| room.update_progress(player_id, report))
            .await
    }

    async fn set_ready(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
        ready: bool,
    ) -> Result<Room, RoomError> {
        self.mutate(room_id, |room| room.set_ready(player_id, ready))
            .await
    }

    async fn schedule_race(
        &self,
        room_id: &RoomId,
        requester: &PlayerId,
        start_at: Timestamp,
        require_all_ready: bool,
    ) -> Result<Room, RoomError> {
        self.mutate(room_id, |room| {
            room.schedule_race(requester, start_at, require_all_ready)
        })
        .await
    }

    async fn reset_race(&self, room_id: &RoomId, requester: &PlayerId) -> Result<Room, RoomError> {
        self.mutate(room_id, |room| room.reset_race(requester)).await
    }

    async fn expire_race(&self, room_id: &RoomId, start_at: Timestamp) -> Option<Room> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id)?;
        room.expire_race(start_at).then(|| room.clone())
    }

    async fn leave_room(
        &self,
        room_id: &RoomId,
        player_id: &PlayerId,
    ) -> Result<Option<Room>, RoomError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or(RoomError::RoomNotFound)?;
        room.remove_player(player_id)?;
        if room.is_empty() {
            rooms.remove(room_id);
            tracing::info!("Room '{}' is empty and was removed", room_id);
            return Ok(None);
        }
        Ok(Some(room.clone()))
    }

    async fn remove_player_everywhere(&self, player_id: &PlayerId) -> Vec<Room> {
        let mut rooms = self.rooms.lock().await;
        let mut changed = Vec::new();
        let mut emptied = Vec::new();

        for (room_id, room) in rooms.iter_mut() {
            if room.remove_player(player_id).is_err() {
                continue;
            }
            if room.is_empty() {
                emptied.push(room_id.clone());
            } else {
                changed.push(room.clone());
            }
        }

        for room_id in emptied {
            rooms.remove(&room_id);
            tracing::info!("Room '{}' is empty and was removed", room_id);
        }

        changed.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        changed
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RoomError> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned().ok_or(RoomError::RoomNotFound)
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        list.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));
        list
    }
}
