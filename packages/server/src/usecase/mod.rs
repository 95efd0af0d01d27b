//! UseCase 層
//!
//! WebSocket / HTTP ハンドラから呼ばれるアプリケーション操作。
//! 各ユースケースは Repository で状態を更新し、MessagePusher で結果を通知する。

pub mod broadcast;
pub mod connect_player;
pub mod create_room;
pub mod disconnect_player;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod reset_race;
pub mod set_ready;
pub mod set_text;
pub mod start_race;
pub mod sync_time;
pub mod update_progress;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_player::ConnectPlayerUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_player::DisconnectPlayerUseCase;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use reset_race::ResetRaceUseCase;
pub use set_ready::SetReadyUseCase;
pub use set_text::SetTextUseCase;
pub use start_race::{RacePolicy, StartRaceUseCase};
pub use sync_time::SyncTimeUseCase;
pub use update_progress::UpdateProgressUseCase;
