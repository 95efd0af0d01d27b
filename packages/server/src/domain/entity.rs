//! Entity 定義
//!
//! Room はレースの集約ルート。ロスター、ホスト、課題テキスト、
//! 予定開始時刻、ゴール順をまとめて保持し、全ての変更はこの型のメソッドを通す。
//!
//! ## 不変条件
//!
//! - `host` が `Some` なら、そのプレイヤーは必ず `players` に含まれる
//! - ホストが抜けたら、残ったプレイヤーのうち参加順で最初の人がホストになる
//! - `finished_order` は追記のみで、同じプレイヤーは一度しか入らない
//! - 失敗した操作は状態を変えない（検証してから変更する）
//! - 成功した変更ごとに `version` が 1 増える

use serde::Serialize;

use super::{
    error::RoomError,
    value_object::{PlayerId, PlayerName, Progress, ProgressReport, RaceText, RoomId, Timestamp},
};

/// Room に参加しているプレイヤーの状態
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: PlayerName,
    pub progress: Progress,
    pub wpm: f64,
    pub accuracy: f64,
    pub ready: bool,
    pub finished: bool,
}

impl PlayerState {
    /// 参加直後の状態（進捗 0、未準備）
    pub fn new(id: PlayerId, name: PlayerName) -> Self {
        Self {
            id,
            name,
            progress: Progress::default(),
            wpm: 0.0,
            accuracy: 0.0,
            ready: false,
            finished: false,
        }
    }

    fn clear_race_stats(&mut self) {
        self.progress = Progress::default();
        self.wpm = 0.0;
        self.accuracy = 0.0;
        self.ready = false;
        self.finished = false;
    }
}

/// レースの進行段階
///
/// `Active` はサーバーから通知されず、各クライアントが自分の時計で判断する。
/// サーバー側では HTTP API やログのために計算する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    Idle,
    Scheduled,
    Active,
    Finished,
}

impl RacePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }
}

/// Room エンティティ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    id: RoomId,
    text: RaceText,
    /// 参加順
    players: Vec<PlayerState>,
    host: Option<PlayerId>,
    race_start: Option<Timestamp>,
    finished_order: Vec<PlayerId>,
    version: u64,
    created_at: Timestamp,
}

impl Room {
    /// 作成者をホストとして Room を作成
    pub fn new(id: RoomId, text: RaceText, host: PlayerState, created_at: Timestamp) -> Self {
        let host_id = host.id.clone();
        Self {
            id,
            text,
            players: vec![host],
            host: Some(host_id),
            race_start: None,
            finished_order: Vec::new(),
            version: 1,
            created_at,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn text(&self) -> &RaceText {
        &self.text
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn host(&self) -> Option<&PlayerId> {
        self.host.as_ref()
    }

    pub fn race_start(&self) -> Option<Timestamp> {
        self.race_start
    }

    pub fn finished_order(&self) -> &[PlayerId] {
        &self.finished_order
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| &p.id == player_id)
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.player(player_id).is_some()
    }

    pub fn is_host(&self, player_id: &PlayerId) -> bool {
        self.host.as_ref() == Some(player_id)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// 全員がゴールしたか（プレイヤーがいない場合は false）
    pub fn is_race_finished(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|p| p.finished)
    }

    /// `now` 時点でのレースの段階
    pub fn race_phase(&self, now: Timestamp) -> RacePhase {
        match self.race_start {
            None => RacePhase::Idle,
            Some(_) if self.is_race_finished() => RacePhase::Finished,
            Some(start) if now < start => RacePhase::Scheduled,
            Some(_) => RacePhase::Active,
        }
    }

    /// プレイヤーを追加（ホストは変わらない）
    pub fn add_player(&mut self, player: PlayerState) -> Result<(), RoomError> {
        if self.contains(&player.id) {
            return Err(RoomError::AlreadyInRoom);
        }
        self.players.push(player);
        self.touch();
        Ok(())
    }

    /// プレイヤーを削除し、必要ならホストを付け替える
    ///
    /// ゴール順の記録は残す（追記のみ）。
    pub fn remove_player(&mut self, player_id: &PlayerId) -> Result<(), RoomError> {
        let index = self
            .players
            .iter()
            .position(|p| &p.id == player_id)
            .ok_or(RoomError::NotInRoom)?;
        self.players.remove(index);
        if self.is_host(player_id) {
            self.host = self.players.first().map(|p| p.id.clone());
        }
        self.touch();
        Ok(())
    }

    /// 課題テキストを差し替える（ホストのみ、レース予定中は不可）
    pub fn set_text(&mut self, requester: &PlayerId, text: RaceText) -> Result<(), RoomError> {
        self.ensure_host(requester)?;
        if self.race_start.is_some() {
            return Err(RoomError::RaceInProgress);
        }
        self.text = text;
        self.touch();
        Ok(())
    }

    /// 進捗を更新する（後勝ち）
    ///
    /// レースが予定されていて進捗が 1 に達したら、`mark_finished` でゴールとして記録する。
    /// 今回新たにゴールを記録した場合は true。
    pub fn update_progress(
        &mut self,
        player_id: &PlayerId,
        report: ProgressReport,
    ) -> Result<bool, RoomError> {
        let race_scheduled = self.race_start.is_some();
        let player = self.player_mut(player_id)?;
        player.progress = report.progress;
        player.wpm = report.wpm;
        player.accuracy = report.accuracy;

        let newly_finished =
            race_scheduled && report.progress.is_complete() && self.mark_finished(player_id)?;
        // 記録した場合は mark_finished が version を進めている
        if !newly_finished {
            self.touch();
        }
        Ok(newly_finished)
    }

    pub fn set_ready(&mut self, player_id: &PlayerId, ready: bool) -> Result<(), RoomError> {
        self.player_mut(player_id)?.ready = ready;
        self.touch();
        Ok(())
    }

    /// レース開始時刻を確定する
    ///
    /// 一度確定した開始時刻は `reset_race` まで変わらない。
    pub fn schedule_race(
        &mut self,
        requester: &PlayerId,
        start_at: Timestamp,
        require_all_ready: bool,
    ) -> Result<(), RoomError> {
        self.ensure_host(requester)?;
        if self.race_start.is_some() {
            return Err(RoomError::RaceAlreadyScheduled);
        }
        if require_all_ready && !self.players.iter().all(|p| p.ready) {
            return Err(RoomError::PlayersNotReady);
        }
        self.race_start = Some(start_at);
        self.touch();
        Ok(())
    }

    /// レースを待機状態に戻す（ホストのみ）
    pub fn reset_race(&mut self, requester: &PlayerId) -> Result<(), RoomError> {
        self.ensure_host(requester)?;
        self.clear_race();
        Ok(())
    }

    /// 制限時間切れのレースを待機状態に戻す
    ///
    /// `start_at` が現在のレースと一致し、まだ全員がゴールしていない場合だけ戻す。
    /// 戻した場合は true。
    pub fn expire_race(&mut self, start_at: Timestamp) -> bool {
        if self.race_start != Some(start_at) || self.is_race_finished() {
            return false;
        }
        self.clear_race();
        true
    }

    /// ゴールを記録する。既に記録済みなら何もしない。
    ///
    /// 新たに記録した場合は true。
    pub fn mark_finished(&mut self, player_id: &PlayerId) -> Result<bool, RoomError> {
        if self.finished_order.contains(player_id) {
            return Ok(false);
        }
        self.player_mut(player_id)?.finished = true;
        self.finished_order.push(player_id.clone());
        self.touch();
        Ok(true)
    }

    fn clear_race(&mut self) {
        self.race_start = None;
        self.finished_order.clear();
        for player in &mut self.players {
            player.clear_race_stats();
        }
        self.touch();
    }

    fn ensure_host(&self, requester: &PlayerId) -> Result<(), RoomError> {
        if !self.contains(requester) {
            return Err(RoomError::NotInRoom);
        }
        if !self.is_host(requester) {
            return Err(RoomError::NotHost);
        }
        Ok(())
    }

    fn player_mut(&mut self, player_id: &PlayerId) -> Result<&mut PlayerState, RoomError> {
        self.players
            .iter_mut()
            .find(|p| &p.id == player_id)
            .ok_or(RoomError::NotInRoom)
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}
