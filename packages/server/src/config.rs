//! Server configuration.

use std::time::Duration;

use crate::domain::DEFAULT_LEAD_MS;

/// Default race time limit in seconds (0 disables the limit)
pub const DEFAULT_RACE_TIME_LIMIT_SECS: u64 = 300;

/// Runtime settings collected from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port number to bind to
    pub port: u16,
    /// Delay between a start request and the race start
    pub lead: Duration,
    /// Unfinished races are reset this long after they start
    pub race_time_limit: Option<Duration>,
    /// Refuse to start until every player is ready
    pub require_all_ready: bool,
}

impl ServerConfig {
    /// Build the limit from a seconds value where 0 means "no limit"
    pub fn time_limit_from_secs(secs: u64) -> Option<Duration> {
        (secs > 0).then(|| Duration::from_secs(secs))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            lead: Duration::from_millis(DEFAULT_LEAD_MS as u64),
            race_time_limit: Self::time_limit_from_secs(DEFAULT_RACE_TIME_LIMIT_SECS),
            require_all_ready: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // テスト項目: デフォルト設定はリード 5 秒・制限 300 秒・準備は任意
        // when (操作):
        let config = ServerConfig::default();

        // then (期待する結果):
        assert_eq!(config.lead, Duration::from_millis(5_000));
        assert_eq!(config.race_time_limit, Some(Duration::from_secs(300)));
        assert!(!config.require_all_ready);
    }

    #[test]
    fn test_zero_time_limit_disables_it() {
        // テスト項目: 制限時間 0 秒は無効を意味する
        // then (期待する結果):
        assert_eq!(ServerConfig::time_limit_from_secs(0), None);
        assert_eq!(
            ServerConfig::time_limit_from_secs(30),
            Some(Duration::from_secs(30))
        );
    }
}
