//! UseCase: Room 詳細取得処理

use std::sync::Arc;

use keyrace_shared::time::Clock;

use crate::{
    domain::{RoomError, RoomId, RoomRepository, Timestamp},
    infrastructure::dto::http::RoomDetailDto,
};

pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// URL パスの ID をそのまま受け取る。不正な ID は存在しない Room と同じ扱い
    pub async fn execute(&self, room_id: String) -> Result<RoomDetailDto, RoomError> {
        let room_id = RoomId::new(room_id).map_err(|_| RoomError::RoomNotFound)?;
        let room = self.repository.get_room(&room_id).await?;
        let now = Timestamp::new(self.clock.now_millis());
        Ok(RoomDetailDto::from_room(&room, now))
    }
}
