//! Shared application state.

use std::sync::Arc;

use keyrace_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::{MessagePusher, RaceScheduler, RoomRepository},
    usecase::{
        ConnectPlayerUseCase, CreateRoomUseCase, DisconnectPlayerUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase, RacePolicy, ResetRaceUseCase,
        SetReadyUseCase, SetTextUseCase, StartRaceUseCase, SyncTimeUseCase,
        UpdateProgressUseCase,
    },
};

/// Shared application state
///
/// ハンドラはここに並ぶユースケースだけを通して Room を操作する。
pub struct AppState {
    pub connect_player_usecase: Arc<ConnectPlayerUseCase>,
    pub disconnect_player_usecase: Arc<DisconnectPlayerUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub set_text_usecase: Arc<SetTextUseCase>,
    pub update_progress_usecase: Arc<UpdateProgressUseCase>,
    pub set_ready_usecase: Arc<SetReadyUseCase>,
    pub start_race_usecase: Arc<StartRaceUseCase>,
    pub reset_race_usecase: Arc<ResetRaceUseCase>,
    pub sync_time_usecase: Arc<SyncTimeUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// 送信ヘルパーが直接使う（`room:error` など）
    pub message_pusher: Arc<dyn MessagePusher>,
}

impl AppState {
    /// Wire every use case to the given repository, pusher and clock
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: &ServerConfig,
    ) -> Self {
        let scheduler = Arc::new(RaceScheduler::new(clock.clone(), config.lead));
        let policy = RacePolicy {
            require_all_ready: config.require_all_ready,
            time_limit: config.race_time_limit,
        };

        Self {
            connect_player_usecase: Arc::new(ConnectPlayerUseCase::new(
                message_pusher.clone(),
                clock.clone(),
            )),
            disconnect_player_usecase: Arc::new(DisconnectPlayerUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            set_text_usecase: Arc::new(SetTextUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            update_progress_usecase: Arc::new(UpdateProgressUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            set_ready_usecase: Arc::new(SetReadyUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            start_race_usecase: Arc::new(StartRaceUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                scheduler,
                policy,
            )),
            reset_race_usecase: Arc::new(ResetRaceUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            sync_time_usecase: Arc::new(SyncTimeUseCase::new(
                message_pusher.clone(),
                clock.clone(),
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone(), clock.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository, clock)),
            message_pusher,
        }
    }
}
