//! Value Object 定義
//!
//! 不変で、生成時にバリデーションを行う値の型。
//! トランスポート境界で文字列・数値からこれらの型へ変換し、
//! 以降のドメイン層では検証済みの値だけを扱う。

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Room ID の最大文字数
pub const ROOM_ID_MAX_LEN: usize = 32;
/// プレイヤー表示名の最大文字数
pub const PLAYER_NAME_MAX_LEN: usize = 32;
/// 課題テキストの最大文字数
pub const RACE_TEXT_MAX_LEN: usize = 5_000;

fn validate_text(
    field: &'static str,
    value: String,
    max_len: usize,
) -> Result<String, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValueObjectError::Empty(field));
    }
    if trimmed.chars().count() > max_len {
        return Err(ValueObjectError::TooLong { field, max_len });
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ValueObjectError::InvalidCharacter(field));
    }
    Ok(trimmed.to_string())
}

/// Room の識別子（例: "ABCD"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoomId(String);

impl RoomId {
    /// 新しい RoomId を作成（前後の空白は除去される）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let value = validate_text("room id", value, ROOM_ID_MAX_LEN)?;
        if value.chars().any(char::is_whitespace) {
            return Err(ValueObjectError::InvalidCharacter("room id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// プレイヤーの識別子
///
/// WebSocket 接続ごとにサーバーが発行する。永続的なアカウントではなく、
/// 再接続すると新しい ID になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("player id"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for PlayerId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// プレイヤーの表示名
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_text("player name", value, PLAYER_NAME_MAX_LEN).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// レースの課題テキスト（外部で生成された不透明な文字列）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceText(String);

impl RaceText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::Empty("text"));
        }
        if value.chars().count() > RACE_TEXT_MAX_LEN {
            return Err(ValueObjectError::TooLong {
                field: "text",
                max_len: RACE_TEXT_MAX_LEN,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RaceText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 進捗率（常に `[0, 1]` に収まる）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct Progress(f64);

impl Progress {
    /// 任意の入力を `[0, 1]` に丸める。NaN / 無限大は 0 として扱う。
    pub fn clamped(value: f64) -> Self {
        if !value.is_finite() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_complete(&self) -> bool {
        self.0 >= 1.0
    }
}

/// `room:progress` で送られてくるタイピング統計
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressReport {
    pub progress: Progress,
    pub wpm: f64,
    pub accuracy: f64,
}

impl ProgressReport {
    /// 範囲外の値を丸めて作成する
    ///
    /// - `progress`: `[0, 1]`
    /// - `wpm`: 0 以上
    /// - `accuracy`: `[0, 100]`
    pub fn new(progress: f64, wpm: f64, accuracy: f64) -> Self {
        let non_negative = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            progress: Progress::clamped(progress),
            wpm: non_negative(wpm),
            accuracy: non_negative(accuracy).min(100.0),
        }
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// `millis` ミリ秒後のタイムスタンプ
    pub fn add_millis(&self, millis: i64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}
