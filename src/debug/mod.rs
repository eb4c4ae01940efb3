pub mod ring;
pub mod timer;

use self::ring::RingBuffer;

/// Number of tick times to keep for the rolling stats.
const TICK_HISTORY_LEN: usize = 300;

/// Wall-clock seconds between periodic log lines.
const LOG_INTERVAL: f64 = 5.0;

/// Rolling wall-clock cost of simulation ticks, logged every few seconds.
pub struct TickStats {
    /// Rolling window of tick times (seconds).
    pub tick_times: RingBuffer<f64>,

    pub tick_time_avg: f64,
    pub tick_time_min: f64,
    pub tick_time_max: f64,

    tick_count: u64,
    log_timer: f64,
    log_tick_count: u32,
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new()
    }
}

impl TickStats {
    pub fn new() -> Self {
        Self {
            tick_times: RingBuffer::new(TICK_HISTORY_LEN),
            tick_time_avg: 0.0,
            tick_time_min: 0.0,
            tick_time_max: 0.0,
            tick_count: 0,
            log_timer: 0.0,
            log_tick_count: 0,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Record how long one tick took. Returns true when a periodic log line
    /// is due, so the caller can log its own stats alongside.
    pub fn record_tick(&mut self, cost: f64, wall_dt: f64) -> bool {
        self.tick_count += 1;
        self.tick_times.push(cost);

        let len = self.tick_times.len();
        if len > 0 {
            let mut sum = 0.0;
            let mut min = f64::MAX;
            let mut max = 0.0f64;
            for &t in self.tick_times.iter() {
                sum += t;
                min = min.min(t);
                max = max.max(t);
            }
            self.tick_time_avg = sum / len as f64;
            self.tick_time_min = min;
            self.tick_time_max = max;
        }

        self.log_tick_count += 1;
        self.log_timer += wall_dt;
        if self.log_timer < LOG_INTERVAL {
            return false;
        }

        log::info!(
            "ticks/s: {:.0} | avg: {:.3}ms | min: {:.3}ms | max: {:.3}ms | total ticks: {}",
            self.log_tick_count as f64 / self.log_timer,
            self.tick_time_avg * 1000.0,
            self.tick_time_min * 1000.0,
            self.tick_time_max * 1000.0,
            self.tick_count,
        );
        self.log_timer = 0.0;
        self.log_tick_count = 0;
        true
    }
}
