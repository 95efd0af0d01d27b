//! WebSocket client session management.
//!
//! One session is one connection lifetime:
//!
//! 1. connect and wait for `session:welcome`
//! 2. measure the clock offset
//! 3. run the read task, the countdown ticker and the input loop until the
//!    user quits or the connection drops

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use keyrace_shared::{
    protocol::{ClientMessage, ServerMessage},
    time::{Clock, SystemClock},
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::{
    clock_sync::{ClockSync, DEFAULT_SAMPLE_INTERVAL},
    command::{Command, HELP},
    controller::{ClientRoomController, Countdown, POLL_INTERVAL},
    error::ClientError,
    formatter::MessageFormatter,
    link::{ServerLink, parse_server_message},
    typing::TypingTracker,
    ui::redisplay_prompt,
};

/// Connection settings for one session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub url: String,
    pub name: String,
    pub samples: usize,
}

/// Apply a server message to the controller and return what to print
pub async fn handle_server_message(
    controller: &Mutex<ClientRoomController>,
    message: ServerMessage,
) -> Option<String> {
    let mut controller = controller.lock().await;
    match message {
        ServerMessage::Welcome { player_id, .. } => {
            controller.apply_welcome(player_id);
            None
        }
        ServerMessage::RoomState(snapshot) => {
            let formatted = MessageFormatter::format_room_state(&snapshot, controller.player_id());
            controller.apply_state(snapshot).then_some(formatted)
        }
        ServerMessage::RaceStarted { room, start_at, .. } => {
            controller.apply_race_started(&room, start_at);
            Some(MessageFormatter::format_race_started(
                controller.offset().to_local(start_at),
            ))
        }
        ServerMessage::Error { error } => Some(MessageFormatter::format_error(&error)),
        ServerMessage::TimeResponse { .. } => {
            tracing::debug!("Ignored late time:response");
            None
        }
    }
}

/// What to do with one line of input
#[derive(Debug, Clone, PartialEq)]
pub struct LineOutcome {
    pub send: Option<ClientMessage>,
    pub print: Option<String>,
    pub quit: bool,
}

impl LineOutcome {
    fn send(message: ClientMessage) -> Self {
        Self {
            send: Some(message),
            print: None,
            quit: false,
        }
    }

    fn print(text: impl Into<String>) -> Self {
        Self {
            send: None,
            print: Some(text.into()),
            quit: false,
        }
    }
}

/// Turns terminal lines into outgoing messages
pub struct InputHandler {
    controller: Arc<Mutex<ClientRoomController>>,
    name: String,
    /// Tracker for the race identified by (room, local deadline)
    tracker: Option<(String, i64, TypingTracker)>,
}

impl InputHandler {
    pub fn new(controller: Arc<Mutex<ClientRoomController>>, name: String) -> Self {
        Self {
            controller,
            name,
            tracker: None,
        }
    }

    pub async fn handle_line(&mut self, line: &str, now_local: i64) -> LineOutcome {
        let command = Command::parse(line);
        let shared = self.controller.clone();
        let mut controller = shared.lock().await;

        match command {
            Command::Create { room, text } => {
                controller.enter();
                LineOutcome::send(ClientMessage::CreateRoom {
                    room,
                    text,
                    name: self.name.clone(),
                })
            }
            Command::Join { room } => {
                controller.enter();
                LineOutcome::send(ClientMessage::JoinRoom {
                    room,
                    name: self.name.clone(),
                })
            }
            Command::Help => LineOutcome::print(format!("{}\n", HELP)),
            Command::Quit => LineOutcome {
                send: None,
                print: None,
                quit: true,
            },
            Command::Invalid(message) => LineOutcome::print(MessageFormatter::format_error(&message)),
            command => {
                let Some(room) = controller.room_id().map(str::to_string) else {
                    return LineOutcome::print(MessageFormatter::format_error(
                        "You are not in a room (use /create or /join)",
                    ));
                };
                match command {
                    Command::SetText { text } => {
                        LineOutcome::send(ClientMessage::SetText { room, text })
                    }
                    Command::Ready(ready) => LineOutcome::send(ClientMessage::Ready { room, ready }),
                    Command::Start => LineOutcome::send(ClientMessage::StartRequest { room }),
                    Command::Reset => LineOutcome::send(ClientMessage::ResetRace { room }),
                    Command::Leave => {
                        controller.leave();
                        self.tracker = None;
                        LineOutcome::send(ClientMessage::LeaveRoom { room })
                    }
                    Command::Type(typed) => self.type_line(&controller, room, &typed, now_local),
                    _ => LineOutcome::print(String::new()),
                }
            }
        }
    }

    fn type_line(
        &mut self,
        controller: &ClientRoomController,
        room: String,
        typed: &str,
        now_local: i64,
    ) -> LineOutcome {
        let (Some(deadline), Some(snapshot)) = (controller.deadline(), controller.room()) else {
            return LineOutcome::print(MessageFormatter::format_locked());
        };
        if !controller.accept_keystroke() {
            return LineOutcome::print(MessageFormatter::format_locked());
        }

        let is_current = self
            .tracker
            .as_ref()
            .is_some_and(|(r, d, _)| *r == room && *d == deadline);
        if !is_current {
            self.tracker = Some((
                room.clone(),
                deadline,
                TypingTracker::new(&snapshot.text, deadline),
            ));
        }
        let Some((_, _, tracker)) = self.tracker.as_mut() else {
            return LineOutcome::print(MessageFormatter::format_locked());
        };

        let stats = tracker.type_line(typed, now_local);
        LineOutcome {
            send: Some(ClientMessage::Progress {
                room,
                progress: stats.progress,
                wpm: stats.wpm,
                accuracy: stats.accuracy,
            }),
            print: Some(MessageFormatter::format_progress(
                &stats,
                &tracker.remaining(),
            )),
            quit: false,
        }
    }
}

/// Run the WebSocket client session
///
/// Returns `Ok(())` when the user quits and an error when the connection is lost.
pub async fn run_client_session(options: &SessionOptions) -> Result<(), ClientError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let mut link = ServerLink::connect(&options.url).await?;
    let (player_id, _server_time) = link.recv_welcome().await?;

    let offset = ClockSync::new(clock.clone(), options.samples, DEFAULT_SAMPLE_INTERVAL)
        .measure(&mut link)
        .await
        .map_err(|e| match e {
            ClientError::ClockSync(_) | ClientError::Protocol(_) => e,
            other => ClientError::ClockSync(other.to_string()),
        })?;

    let controller = Arc::new(Mutex::new(ClientRoomController::new(offset)));
    controller.lock().await.apply_welcome(player_id.clone());
    println!("{}", MessageFormatter::format_welcome(&player_id, offset.millis()));

    let (stream, pending) = link.into_parts();
    let (mut write, mut read) = stream.split();
    let name = options.name.clone();

    // Spawn a task to handle incoming messages
    let controller_for_read = controller.clone();
    let name_for_read = name.clone();
    let mut read_task = tokio::spawn(async move {
        for message in pending {
            if let Some(output) = handle_server_message(&controller_for_read, message).await {
                print!("{}", output);
                redisplay_prompt(&name_for_read);
            }
        }

        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    let output = match parse_server_message(text.as_str()) {
                        Ok(message) => handle_server_message(&controller_for_read, message).await,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            Some(MessageFormatter::format_raw_message(text.as_str()))
                        }
                    };
                    if let Some(output) = output {
                        print!("{}", output);
                        redisplay_prompt(&name_for_read);
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Countdown ticker
    let controller_for_tick = controller.clone();
    let clock_for_tick = clock.clone();
    let name_for_tick = name.clone();
    let tick_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        let mut last_second = None;
        loop {
            interval.tick().await;
            let mut controller = controller_for_tick.lock().await;
            match controller.tick(clock_for_tick.now_millis()) {
                Countdown::Waiting { remaining_ms } => {
                    let second = (remaining_ms + 999) / 1_000;
                    if last_second != Some(second) {
                        last_second = Some(second);
                        print!("{}", MessageFormatter::format_countdown(remaining_ms));
                        redisplay_prompt(&name_for_tick);
                    }
                }
                Countdown::Started => {
                    last_second = None;
                    let text = controller
                        .room()
                        .map(|r| r.text.clone())
                        .unwrap_or_default();
                    print!("{}", MessageFormatter::format_go(&text));
                    redisplay_prompt(&name_for_tick);
                }
                Countdown::Idle | Countdown::Running => {
                    last_second = None;
                }
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let name_for_prompt = name.clone();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", name_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn input lines into messages
    let mut input = InputHandler::new(controller.clone(), name.clone());
    let clock_for_write = clock.clone();
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let outcome = input.handle_line(&line, clock_for_write.now_millis()).await;
            if let Some(text) = outcome.print {
                print!("{}", text);
            }
            if outcome.quit {
                return false;
            }
            if let Some(message) = outcome.send {
                let json = match message.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(json.into())).await {
                    tracing::warn!("Failed to send message: {}", e);
                    return true;
                }
            }
            redisplay_prompt(&name);
        }

        // Input closed (Ctrl+C / Ctrl+D)
        false
    });

    // If any one of the tasks completes, abort the others
    let result = tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                Err(ClientError::ConnectionError("Connection lost".to_string()))
            } else {
                Ok(())
            }
        }
    };
    tick_task.abort();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock_sync::ClockOffset;
    use keyrace_shared::protocol::RoomSnapshot;

    fn snapshot(version: u64, race_start: Option<i64>) -> RoomSnapshot {
        RoomSnapshot {
            room: "ABCD".to_string(),
            text: "hello world".to_string(),
            players: vec![],
            host: Some("me".to_string()),
            race_start,
            finished_order: vec![],
            version,
        }
    }

    fn create_handler() -> (InputHandler, Arc<Mutex<ClientRoomController>>) {
        let controller = Arc::new(Mutex::new(ClientRoomController::new(ClockOffset::default())));
        (
            InputHandler::new(controller.clone(), "Alice".to_string()),
            controller,
        )
    }

    #[tokio::test]
    async fn test_create_uses_display_name() {
        // テスト項目: /create は表示名付きの room:create になる
        // given (前提条件):
        let (mut handler, _controller) = create_handler();

        // when (操作):
        let outcome = handler.handle_line("/create ABCD hello world", 0).await;

        // then (期待する結果):
        assert_eq!(
            outcome.send,
            Some(ClientMessage::CreateRoom {
                room: "ABCD".to_string(),
                text: "hello world".to_string(),
                name: "Alice".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_room_commands_need_a_room() {
        // テスト項目: Room に入っていなければ /start は送信されない
        // given (前提条件):
        let (mut handler, _controller) = create_handler();

        // when (操作):
        let outcome = handler.handle_line("/start", 0).await;

        // then (期待する結果):
        assert!(outcome.send.is_none());
        assert!(outcome.print.is_some());
    }

    #[tokio::test]
    async fn test_typing_is_ignored_while_locked() {
        // テスト項目: ロック中の入力は送信されない
        // given (前提条件):
        let (mut handler, controller) = create_handler();
        controller.lock().await.apply_state(snapshot(1, Some(10_000)));

        // when (操作):
        let outcome = handler.handle_line("hello", 9_000).await;

        // then (期待する結果):
        assert!(outcome.send.is_none());
        assert_eq!(outcome.print, Some(MessageFormatter::format_locked()));
    }

    #[tokio::test]
    async fn test_typing_after_unlock_sends_progress() {
        // テスト項目: ロック解除後の入力は採点されて room:progress になる
        // given (前提条件):
        let (mut handler, controller) = create_handler();
        {
            let mut controller = controller.lock().await;
            controller.apply_state(snapshot(1, Some(10_000)));
            controller.tick(10_000);
        }

        // when (操作):
        let outcome = handler.handle_line("hello", 70_000).await;

        // then (期待する結果):
        let Some(ClientMessage::Progress {
            room,
            progress,
            accuracy,
            ..
        }) = outcome.send
        else {
            panic!("expected room:progress");
        };
        assert_eq!(room, "ABCD");
        assert!((progress - 5.0 / 11.0).abs() < 1e-9);
        assert_eq!(accuracy, 100.0);
    }

    #[tokio::test]
    async fn test_quit_ends_session() {
        // テスト項目: /quit でセッションを終了する
        // given (前提条件):
        let (mut handler, _controller) = create_handler();

        // when (操作):
        let outcome = handler.handle_line("/quit", 0).await;

        // then (期待する結果):
        assert!(outcome.quit);
        assert!(outcome.send.is_none());
    }

    #[tokio::test]
    async fn test_stale_state_is_not_printed() {
        // テスト項目: 古いスナップショットは表示も適用もされない
        // given (前提条件):
        let controller = Mutex::new(ClientRoomController::new(ClockOffset::default()));
        handle_server_message(&controller, ServerMessage::RoomState(snapshot(3, None))).await;

        // when (操作):
        let output =
            handle_server_message(&controller, ServerMessage::RoomState(snapshot(2, Some(5))))
                .await;

        // then (期待する結果):
        assert!(output.is_none());
        assert_eq!(controller.lock().await.deadline(), None);
    }

    #[tokio::test]
    async fn test_leave_drops_in_flight_state_and_accepts_recreated_room() {
        // テスト項目: /leave 後に届いた room:state は適用されず、作り直した Room の version 1 は適用される
        // given (前提条件):
        let (mut handler, controller) = create_handler();
        handle_server_message(&controller, ServerMessage::RoomState(snapshot(12, None))).await;
        let leave = handler.handle_line("/leave", 0).await;

        // when (操作):
        let in_flight =
            handle_server_message(&controller, ServerMessage::RoomState(snapshot(13, None)))
                .await;
        let room_after_leave = controller.lock().await.room_id().map(str::to_string);
        handler.handle_line("/create ABCD hello world", 0).await;
        let fresh =
            handle_server_message(&controller, ServerMessage::RoomState(snapshot(1, None))).await;

        // then (期待する結果):
        assert_eq!(
            leave.send,
            Some(ClientMessage::LeaveRoom {
                room: "ABCD".to_string()
            })
        );
        assert!(in_flight.is_none());
        assert_eq!(room_after_leave, None);
        assert!(fresh.is_some());
        assert_eq!(controller.lock().await.room().map(|r| r.version), Some(1));
    }
}
