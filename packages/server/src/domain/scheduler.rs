//! Race Scheduler
//!
//! レース開始時刻を決める唯一の権威。サーバー時計の「今」に固定のリードタイムを足した
//! 絶対時刻を開始時刻とし、全クライアントは時計のずれを補正したうえで同じ瞬間に
//! カウントダウンを終える。リードタイムはクライアントごとに交渉しない。

use std::{sync::Arc, time::Duration};

use keyrace_shared::time::Clock;

use super::Timestamp;

/// デフォルトのリードタイム（ミリ秒）
pub const DEFAULT_LEAD_MS: i64 = 5_000;

pub struct RaceScheduler {
    clock: Arc<dyn Clock>,
    lead: Duration,
}

impl RaceScheduler {
    pub fn new(clock: Arc<dyn Clock>, lead: Duration) -> Self {
        Self { clock, lead }
    }

    /// サーバー時計の現在時刻
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    pub fn lead(&self) -> Duration {
        self.lead
    }

    /// 今リクエストされたレースの開始時刻（`now + lead`）
    pub fn next_start(&self) -> Timestamp {
        let lead_ms = i64::try_from(self.lead.as_millis()).unwrap_or(i64::MAX);
        self.now().add_millis(lead_ms)
    }

    /// `deadline` までの残り時間（過ぎていれば 0）
    pub fn until(&self, deadline: Timestamp) -> Duration {
        let remaining = deadline.value().saturating_sub(self.now().value());
        Duration::from_millis(u64::try_from(remaining).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyrace_shared::time::{FixedClock, ManualClock};

    #[test]
    fn test_next_start_adds_fixed_lead() {
        // テスト項目: 開始時刻は現在時刻 + リードタイムになる
        // given (前提条件):
        let clock = Arc::new(FixedClock::new(1_700_000_000_000));
        let scheduler = RaceScheduler::new(clock, Duration::from_millis(DEFAULT_LEAD_MS as u64));

        // when (操作):
        let start = scheduler.next_start();

        // then (期待する結果):
        assert_eq!(start.value(), 1_700_000_005_000);
    }

    #[test]
    fn test_until_counts_down_and_saturates() {
        // テスト項目: 残り時間は時計の進みに合わせて減り、過ぎたら 0 になる
        // given (前提条件):
        let clock = ManualClock::new(10_000);
        let scheduler = RaceScheduler::new(Arc::new(clock.clone()), Duration::from_secs(5));
        let start = scheduler.next_start();

        // when (操作) / then (期待する結果):
        assert_eq!(scheduler.until(start), Duration::from_millis(5_000));
        clock.advance(4_750);
        assert_eq!(scheduler.until(start), Duration::from_millis(250));
        clock.advance(1_000);
        assert_eq!(scheduler.until(start), Duration::ZERO);
    }
}
