use instant::Instant;

/// Which phase of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TickPhase {
    Plants = 0,
    Spatial = 1,
    Creatures = 2,
    Feeding = 3,
    Cleanup = 4,
}

impl TickPhase {
    pub const COUNT: usize = 5;

    pub const ALL: [TickPhase; Self::COUNT] = [
        Self::Plants,
        Self::Spatial,
        Self::Creatures,
        Self::Feeding,
        Self::Cleanup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Plants => "Plants",
            Self::Spatial => "Spatial",
            Self::Creatures => "Creatures",
            Self::Feeding => "Feeding",
            Self::Cleanup => "Cleanup",
        }
    }
}

/// Per-phase timing with exponential moving average smoothing.
pub struct SystemTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; TickPhase::COUNT],
    start: Instant,
}

const EMA_ALPHA: f64 = 0.1;

impl Default for SystemTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; TickPhase::COUNT],
            start: Instant::now(),
        }
    }

    /// Call before a phase runs.
    pub fn begin(&mut self) {
        self.start = Instant::now();
    }

    /// Call after a phase finishes. Records elapsed time for `phase`.
    pub fn end(&mut self, phase: TickPhase) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        self.record(phase, elapsed_us);
    }

    fn record(&mut self, phase: TickPhase, elapsed_us: f64) {
        let idx = phase as usize;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;
    }

    pub fn get(&self, phase: TickPhase) -> f64 {
        self.durations_us[phase as usize]
    }

    /// Sum of all phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }

    /// One line, e.g. `Plants 3us | Spatial 12us | ...`.
    pub fn summary(&self) -> String {
        TickPhase::ALL
            .iter()
            .map(|&p| format!("{} {:.0}us", p.label(), self.get(p)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_moves_a_tenth_of_the_way() {
        let mut timers = SystemTimers::new();
        timers.record(TickPhase::Feeding, 100.0);
        assert!((timers.get(TickPhase::Feeding) - 10.0).abs() < 1e-9);
        timers.record(TickPhase::Feeding, 100.0);
        assert!((timers.get(TickPhase::Feeding) - 19.0).abs() < 1e-9);
        assert_eq!(timers.get(TickPhase::Plants), 0.0);
        assert!((timers.total_us() - 19.0).abs() < 1e-9);
    }

    #[test]
    fn summary_names_every_phase() {
        let timers = SystemTimers::new();
        let line = timers.summary();
        for phase in TickPhase::ALL {
            assert!(line.contains(phase.label()));
        }
    }
}
