//! UseCase: Room 一覧取得処理

use std::sync::Arc;

use keyrace_shared::time::Clock;

use crate::{
    domain::{RoomRepository, Timestamp},
    infrastructure::dto::http::RoomSummaryDto,
};

pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Room ID 順の一覧を返す
    pub async fn execute(&self) -> Vec<RoomSummaryDto> {
        let now = Timestamp::new(self.clock.now_millis());
        self.repository
            .list_rooms()
            .await
            .iter()
            .map(|room| RoomSummaryDto::from_room(room, now))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerState, Room};
    use crate::usecase::test_support::{create_test_repository, name, pid, rid, seed_room, text};
    use keyrace_shared::time::FixedClock;

    #[tokio::test]
    async fn test_get_rooms_empty() {
        // テスト項目: Room がなければ空の一覧を返す
        // given (前提条件):
        let usecase = GetRoomsUseCase::new(create_test_repository(), Arc::new(FixedClock::new(0)));

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_get_rooms_lists_summaries_in_id_order() {
        // テスト項目: 全 Room の概要が ID 順に返される
        // given (前提条件):
        let repository = create_test_repository();
        seed_room(&repository, &["p"]).await;
        repository
            .create_room(Room::new(
                rid("AAAA"),
                text("abc"),
                PlayerState::new(pid("z"), name("Z")),
                Timestamp::new(0),
            ))
            .await
            .unwrap();
        let usecase = GetRoomsUseCase::new(repository, Arc::new(FixedClock::new(0)));

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["AAAA", "ABCD"]);
        assert_eq!(rooms[1].players, vec!["H".to_string(), "P".to_string()]);
        assert_eq!(rooms[1].phase, "idle");
    }
}
