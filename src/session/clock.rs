//! Elapsed-time display and the wall-clock tick source.

use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

/// Formats whole seconds as `MM:SS`. Minutes are not wrapped at 60.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Turns wall-clock time into whole-second ticks.
///
/// Created when a session starts and dropped when it ends; dropping it is
/// what stops ticks reaching the state machine.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    last: Instant,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { last: start }
    }

    /// Number of whole seconds that passed since the previous call.
    /// Fractions carry over to the next call.
    pub fn take_ticks_at(&mut self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.last);
        let ticks = elapsed.as_secs();
        self.last += Duration::from_secs(ticks);
        ticks
    }

    pub fn take_ticks(&mut self) -> u64 {
        self.take_ticks_at(Instant::now())
    }

    /// How long until the next tick is due.
    pub fn until_next_tick_at(&self, now: Instant) -> Duration {
        TICK.saturating_sub(now.saturating_duration_since(self.last))
    }

    pub fn until_next_tick(&self) -> Duration {
        self.until_next_tick_at(Instant::now())
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new()
    }
}
