use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Periodic game clock that can be re-armed with a new period
///
/// Re-arming replaces the pending deadline: the next tick fires one full new
/// period after the call, never immediately.
pub struct Ticker {
    interval: Interval,
    period: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            interval: Self::arm(period),
            period,
        }
    }

    fn arm(period: Duration) -> Interval {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    /// Cancel the scheduled tick and schedule the next one `period` from now
    pub fn rearm(&mut self, period: Duration) {
        let period = period.max(Duration::from_millis(1));
        self.interval = Self::arm(period);
        self.period = period;
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
