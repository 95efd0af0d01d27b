//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の生成に失敗した理由
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must be at most {max_len} characters")]
    TooLong { field: &'static str, max_len: usize },

    #[error("{0} contains invalid characters")]
    InvalidCharacter(&'static str),
}

/// Room 操作のエラー
///
/// どのエラーも要求したクライアントにだけ `room:error` として通知され、
/// 接続は維持される。失敗した操作は Room の状態を変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Room already exists")]
    RoomExists,

    #[error("Only the host can do that")]
    NotHost,

    #[error("You are not in this room")]
    NotInRoom,

    #[error("You are already in this room")]
    AlreadyInRoom,

    #[error("A race is already scheduled")]
    RaceAlreadyScheduled,

    #[error("Cannot change the text while a race is scheduled")]
    RaceInProgress,

    #[error("Not all players are ready")]
    PlayersNotReady,

    #[error("Invalid request: {0}")]
    InvalidInput(#[from] ValueObjectError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
