use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

fn as_micros<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_micros() as u64)
}

/// Tick scheduler operational metrics. Survive `reset`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickMetrics {
    /// Ticks that ran the allocation pass.
    pub ticks_executed: u64,
    /// Ticks skipped because the simulation was paused.
    pub ticks_skipped: u64,
    #[serde(rename = "last_tick_duration_us", serialize_with = "as_micros")]
    pub last_tick_duration: Duration,
    #[serde(rename = "avg_tick_duration_us", serialize_with = "as_micros")]
    pub avg_tick_duration: Duration,
    pub last_tick_at: Option<DateTime<Utc>>,
}

impl TickMetrics {
    /// Record an executed tick.
    pub fn record_execution(&mut self, duration: Duration) {
        self.ticks_executed += 1;
        self.last_tick_duration = duration;
        self.last_tick_at = Some(Utc::now());

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        self.avg_tick_duration = if self.ticks_executed == 1 {
            duration
        } else {
            let prev_nanos = self.avg_tick_duration.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / self.ticks_executed as f64;
            Duration::from_nanos(avg_nanos as u64)
        };
    }

    pub fn record_skip(&mut self) {
        self.ticks_skipped += 1;
    }
}
