//! 接続ごとのセッション
//!
//! 受信したテキストフレームを `ClientMessage` に変換し、対応するユースケースへ振り分ける。
//! 接続は同時に一つの Room にだけ属し、別の Room を作成・参加に成功すると前の Room から抜ける。
//! どのエラーも要求元に `room:error` で返すだけで、接続は切らない。

use std::sync::Arc;

use keyrace_shared::protocol::{ClientMessage, ServerMessage};

use crate::{
    domain::{PlayerId, PlayerName, ProgressReport, RaceText, RoomError, RoomId},
    ui::state::AppState,
    usecase::broadcast::push_message,
};

/// 不正なフレームに返すエラーメッセージ
pub const MALFORMED_MESSAGE: &str = "Malformed message";

pub struct ConnectionSession {
    state: Arc<AppState>,
    player_id: PlayerId,
    current_room: Option<RoomId>,
}

impl ConnectionSession {
    pub fn new(state: Arc<AppState>, player_id: PlayerId) -> Self {
        Self {
            state,
            player_id,
            current_room: None,
        }
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn current_room(&self) -> Option<&RoomId> {
        self.current_room.as_ref()
    }

    /// テキストフレームを一つ処理する
    pub async fn handle_text(&mut self, text: &str) {
        let message = match ClientMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Malformed message from '{}': {}", self.player_id, e);
                self.send_error(MALFORMED_MESSAGE).await;
                return;
            }
        };

        tracing::debug!(
            "Message from '{}' for room {:?}",
            self.player_id,
            message.room()
        );
        let is_progress = matches!(message, ClientMessage::Progress { .. });
        if let Err(e) = self.dispatch(message).await {
            if is_progress {
                // 退出直後などに届く進捗は黙って捨てる
                tracing::debug!("Dropped progress from '{}': {}", self.player_id, e);
            } else {
                tracing::warn!("Rejected request from '{}': {}", self.player_id, e);
                self.send_error(&e.to_string()).await;
            }
        }
    }

    async fn dispatch(&mut self, message: ClientMessage) -> Result<(), RoomError> {
        match message {
            ClientMessage::CreateRoom { room, text, name } => {
                let room_id = RoomId::new(room)?;
                let text = RaceText::new(text)?;
                let name = PlayerName::new(name)?;
                self.state
                    .create_room_usecase
                    .execute(self.player_id.clone(), room_id.clone(), text, name)
                    .await?;
                self.bind_to(room_id).await;
            }
            ClientMessage::JoinRoom { room, name } => {
                let room_id = RoomId::new(room)?;
                let name = PlayerName::new(name)?;
                self.state
                    .join_room_usecase
                    .execute(self.player_id.clone(), room_id.clone(), name)
                    .await?;
                self.bind_to(room_id).await;
            }
            ClientMessage::SetText { room, text } => {
                let room_id = self.bound_room(room)?;
                let text = RaceText::new(text)?;
                self.state
                    .set_text_usecase
                    .execute(self.player_id.clone(), room_id, text)
                    .await?;
            }
            ClientMessage::Progress {
                room,
                progress,
                wpm,
                accuracy,
            } => {
                let room_id = self.bound_room(room)?;
                let report = ProgressReport::new(progress, wpm, accuracy);
                self.state
                    .update_progress_usecase
                    .execute(self.player_id.clone(), room_id, report)
                    .await?;
            }
            ClientMessage::Ready { room, ready } => {
                let room_id = self.bound_room(room)?;
                self.state
                    .set_ready_usecase
                    .execute(self.player_id.clone(), room_id, ready)
                    .await?;
            }
            ClientMessage::StartRequest { room } => {
                let room_id = self.bound_room(room)?;
                self.state
                    .start_race_usecase
                    .execute(self.player_id.clone(), room_id)
                    .await?;
            }
            ClientMessage::ResetRace { room } => {
                let room_id = self.bound_room(room)?;
                self.state
                    .reset_race_usecase
                    .execute(self.player_id.clone(), room_id)
                    .await?;
            }
            ClientMessage::LeaveRoom { room } => {
                let room_id = self.bound_room(room)?;
                self.state
                    .leave_room_usecase
                    .execute(self.player_id.clone(), room_id)
                    .await?;
                self.current_room = None;
            }
            ClientMessage::TimeRequest { client_sent } => {
                self.state
                    .sync_time_usecase
                    .execute(&self.player_id, client_sent)
                    .await;
            }
        }
        Ok(())
    }

    /// メッセージの Room がこの接続の Room と一致することを確認する
    fn bound_room(&self, room: String) -> Result<RoomId, RoomError> {
        let room_id = RoomId::new(room)?;
        match &self.current_room {
            Some(current) if *current == room_id => Ok(room_id),
            _ => Err(RoomError::NotInRoom),
        }
    }

    async fn bind_to(&mut self, room_id: RoomId) {
        if let Some(previous) = self.current_room.replace(room_id) {
            if Some(&previous) == self.current_room.as_ref() {
                return;
            }
            if let Err(e) = self
                .state
                .leave_room_usecase
                .execute(self.player_id.clone(), previous.clone())
                .await
            {
                tracing::debug!(
                    "Player '{}' could not leave previous room '{}': {}",
                    self.player_id,
                    previous,
                    e
                );
            }
        }
    }

    async fn send_error(&self, error: &str) {
        let message = ServerMessage::Error {
            error: error.to_string(),
        };
        push_message(
            self.state.message_pusher.as_ref(),
            &self.player_id,
            &message,
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ServerConfig,
        domain::RoomRepository,
        usecase::test_support::{RecordingPusher, create_test_repository, pid, rid, seed_room},
    };
    use keyrace_shared::time::FixedClock;

    struct Fixture {
        repository: Arc<crate::infrastructure::repository::InMemoryRoomRepository>,
        pusher: Arc<RecordingPusher>,
        state: Arc<AppState>,
    }

    fn fixture() -> Fixture {
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingPusher::default());
        let state = Arc::new(AppState::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(1_000)),
            &ServerConfig {
                race_time_limit: None,
                ..ServerConfig::default()
            },
        ));
        Fixture {
            repository,
            pusher,
            state,
        }
    }

    fn errors_for(pusher: &RecordingPusher, player: &str) -> Vec<String> {
        pusher
            .pushed()
            .into_iter()
            .filter(|(id, _)| *id == pid(player))
            .filter_map(|(_, message)| match message {
                ServerMessage::Error { error } => Some(error),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_malformed_frame_gets_error_reply() {
        // テスト項目: JSON として解釈できないフレームには "Malformed message" を返す
        // given (前提条件):
        let f = fixture();
        let mut session = ConnectionSession::new(f.state.clone(), pid("a"));

        // when (操作):
        session.handle_text("not json").await;
        session.handle_text(r#"{"type":"room:unknown"}"#).await;

        // then (期待する結果):
        assert_eq!(
            errors_for(&f.pusher, "a"),
            vec![MALFORMED_MESSAGE.to_string(), MALFORMED_MESSAGE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_join_unknown_room_reports_room_not_found() {
        // テスト項目: 存在しない Room への参加は要求元にだけ "Room not found" を返す
        // given (前提条件):
        let f = fixture();
        let mut session = ConnectionSession::new(f.state.clone(), pid("a"));

        // when (操作):
        session
            .handle_text(r#"{"type":"room:join","room":"ZZZZ","name":"A"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(errors_for(&f.pusher, "a"), vec!["Room not found".to_string()]);
        assert!(f.pusher.broadcasts().is_empty());
        assert!(session.current_room().is_none());
    }

    #[tokio::test]
    async fn test_create_binds_session_to_room() {
        // テスト項目: Room を作成すると接続がその Room に束縛される
        // given (前提条件):
        let f = fixture();
        let mut session = ConnectionSession::new(f.state.clone(), pid("a"));

        // when (操作):
        session
            .handle_text(r#"{"type":"room:create","room":"ABCD","text":"hi there","name":"A"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(session.current_room(), Some(&rid("ABCD")));
        let room = f.repository.get_room(&rid("ABCD")).await.unwrap();
        assert_eq!(room.host(), Some(&pid("a")));
    }

    #[tokio::test]
    async fn test_joining_another_room_leaves_the_previous_one() {
        // テスト項目: 別の Room に参加すると前の Room から抜ける
        // given (前提条件):
        let f = fixture();
        seed_room(&f.repository, &[]).await;
        let mut session = ConnectionSession::new(f.state.clone(), pid("a"));
        session
            .handle_text(r#"{"type":"room:create","room":"OTHER","text":"abc","name":"A"}"#)
            .await;

        // when (操作):
        session
            .handle_text(r#"{"type":"room:join","room":"ABCD","name":"A"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(session.current_room(), Some(&rid("ABCD")));
        assert_eq!(
            f.repository.get_room(&rid("OTHER")).await.unwrap_err(),
            RoomError::RoomNotFound
        );
        let room = f.repository.get_room(&rid("ABCD")).await.unwrap();
        assert!(room.contains(&pid("a")));
    }

    #[tokio::test]
    async fn test_failed_join_keeps_current_room() {
        // テスト項目: 参加に失敗しても今の Room には残る
        // given (前提条件):
        let f = fixture();
        let mut session = ConnectionSession::new(f.state.clone(), pid("a"));
        session
            .handle_text(r#"{"type":"room:create","room":"OTHER","text":"abc","name":"A"}"#)
            .await;

        // when (操作):
        session
            .handle_text(r#"{"type":"room:join","room":"ZZZZ","name":"A"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(session.current_room(), Some(&rid("OTHER")));
        assert!(f.repository.get_room(&rid("OTHER")).await.is_ok());
    }

    #[tokio::test]
    async fn test_message_for_unbound_room_is_rejected() {
        // テスト項目: 束縛されていない Room 宛てのメッセージは NotInRoom で拒否される
        // given (前提条件):
        let f = fixture();
        seed_room(&f.repository, &[]).await;
        let mut session = ConnectionSession::new(f.state.clone(), pid("h"));

        // when (操作):
        session
            .handle_text(r#"{"type":"race:startRequest","room":"ABCD"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(
            errors_for(&f.pusher, "h"),
            vec![RoomError::NotInRoom.to_string()]
        );
        let room = f.repository.get_room(&rid("ABCD")).await.unwrap();
        assert_eq!(room.race_start(), None);
    }

    #[tokio::test]
    async fn test_progress_errors_are_silently_dropped() {
        // テスト項目: 失敗した進捗報告にはエラーを返さない
        // given (前提条件):
        let f = fixture();
        let mut session = ConnectionSession::new(f.state.clone(), pid("a"));

        // when (操作):
        session
            .handle_text(
                r#"{"type":"room:progress","room":"ABCD","progress":0.5,"wpm":10,"accuracy":100}"#,
            )
            .await;

        // then (期待する結果):
        assert!(errors_for(&f.pusher, "a").is_empty());
    }

    #[tokio::test]
    async fn test_time_request_is_answered_outside_rooms() {
        // テスト項目: Room に属していなくても時刻同期には応答する
        // given (前提条件):
        let f = fixture();
        let mut session = ConnectionSession::new(f.state.clone(), pid("a"));

        // when (操作):
        session
            .handle_text(r#"{"type":"time:request","clientSent":42}"#)
            .await;

        // then (期待する結果):
        let pushed = f.pusher.pushed();
        assert_eq!(
            pushed[0].1,
            ServerMessage::TimeResponse {
                client_sent: 42,
                server_time: 1_000,
            }
        );
    }

    #[tokio::test]
    async fn test_leave_unbinds_session() {
        // テスト項目: 退出すると接続の Room 束縛が外れる
        // given (前提条件):
        let f = fixture();
        let mut session = ConnectionSession::new(f.state.clone(), pid("a"));
        session
            .handle_text(r#"{"type":"room:create","room":"ABCD","text":"abc","name":"A"}"#)
            .await;

        // when (操作):
        session
            .handle_text(r#"{"type":"room:leave","room":"ABCD"}"#)
            .await;

        // then (期待する結果):
        assert!(session.current_room().is_none());
        assert!(f.repository.get_room(&rid("ABCD")).await.is_err());
    }
}
