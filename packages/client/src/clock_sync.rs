//! Clock sync service.
//!
//! Estimates `serverClock − localClock` with NTP-style round trips:
//!
//! ```text
//! t0 = localNow()          --- time:request {clientSent: t0} --->
//!                          <-- time:response {clientSent, serverTime} ---
//! t2 = localNow()
//! rtt    = t2 - t0
//! sample = serverTime - (t0 + rtt / 2)
//! ```
//!
//! The final offset is the plain mean of all samples. It is measured once per
//! connection and never re-synced.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use keyrace_shared::time::Clock;

use crate::error::ClientError;

/// Number of round trips per measurement
pub const DEFAULT_SAMPLES: usize = 6;
/// Pause between two round trips
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

/// Transport for one request/response exchange
#[async_trait]
pub trait TimeExchange: Send {
    /// Send `time:request {clientSent}`
    async fn send_request(&mut self, client_sent: i64) -> Result<(), ClientError>;

    /// Wait for the next `time:response`, returning `(clientSent, serverTime)`
    async fn recv_response(&mut self) -> Result<(i64, i64), ClientError>;
}

/// Estimated `serverClock − localClock` in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClockOffset(f64);

impl ClockOffset {
    pub fn new(millis: f64) -> Self {
        Self(millis)
    }

    pub fn millis(&self) -> f64 {
        self.0
    }

    /// Convert a server timestamp to the local clock
    pub fn to_local(&self, server_ts: i64) -> i64 {
        server_ts - self.0.round() as i64
    }
}

pub struct ClockSync {
    clock: Arc<dyn Clock>,
    samples: usize,
    interval: Duration,
}

impl ClockSync {
    pub fn new(clock: Arc<dyn Clock>, samples: usize, interval: Duration) -> Self {
        Self {
            clock,
            samples,
            interval,
        }
    }

    /// Run the round trips and return the mean offset
    ///
    /// Responses whose `clientSent` does not match the outstanding request
    /// are discarded.
    pub async fn measure<E: TimeExchange>(
        &self,
        exchange: &mut E,
    ) -> Result<ClockOffset, ClientError> {
        if self.samples == 0 {
            return Err(ClientError::ClockSync(
                "at least one sample is required".to_string(),
            ));
        }

        let mut total = 0.0;
        for i in 0..self.samples {
            if i > 0 && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }

            let t0 = self.clock.now_millis();
            exchange.send_request(t0).await?;
            let server_time = loop {
                let (client_sent, server_time) = exchange.recv_response().await?;
                if client_sent == t0 {
                    break server_time;
                }
                tracing::debug!(
                    "Discarded stale time:response (clientSent {}, expected {})",
                    client_sent,
                    t0
                );
            };
            let t2 = self.clock.now_millis();

            let rtt = (t2 - t0) as f64;
            let sample = server_time as f64 - (t0 as f64 + rtt / 2.0);
            tracing::debug!(
                "Clock sample {}/{}: offset {:.1} ms, rtt {} ms",
                i + 1,
                self.samples,
                sample,
                t2 - t0
            );
            total += sample;
        }

        let offset = ClockOffset::new(total / self.samples as f64);
        tracing::info!("Clock offset {:.1} ms", offset.millis());
        Ok(offset)
    }
}
