//! Periodic tasks driven by simulation time
//!
//! Replaces wall-clock interval timers: a task is advanced by the same elapsed
//! value the tick receives, so fire counts are exact for a given tick sequence.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_CATCH_UP_FIRES;

/// A fixed-interval task with its own clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    interval_ms: f64,
    /// Time accumulated since the task was created
    clock_ms: f64,
    /// Clock value at which the next fire is due
    next_fire_ms: f64,
    cancelled: bool,
}

impl ScheduledTask {
    /// First fire happens one full interval after creation
    pub fn every(interval_ms: f64) -> Self {
        let interval_ms = interval_ms.max(1.0);
        Self {
            interval_ms,
            clock_ms: 0.0,
            next_fire_ms: interval_ms,
            cancelled: false,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Advance the clock and return how many times the task fired
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if self.cancelled {
            return 0;
        }

        self.clock_ms += elapsed_ms.max(0.0);

        let mut fires = 0;
        while self.clock_ms >= self.next_fire_ms && fires < MAX_CATCH_UP_FIRES {
            fires += 1;
            self.next_fire_ms += self.interval_ms;
        }

        // Still behind after the cap: drop the backlog instead of bursting later
        if self.clock_ms >= self.next_fire_ms {
            self.next_fire_ms = self.clock_ms + self.interval_ms;
        }

        fires
    }

    /// Stop firing; later advances are no-ops
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_interval() {
        let mut task = ScheduledTask::every(700.0);
        let fires: u32 = (0..20).map(|_| task.advance(100.0)).sum();
        // 2000 ms elapsed: fires at 700 and 1400
        assert_eq!(fires, 2);
    }

    #[test]
    fn test_exact_boundary_fires() {
        let mut task = ScheduledTask::every(1000.0);
        assert_eq!(task.advance(999.0), 0);
        assert_eq!(task.advance(1.0), 1);
        assert_eq!(task.advance(999.0), 0);
        assert_eq!(task.advance(1.0), 1);
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut task = ScheduledTask::every(10.0);
        assert_eq!(task.advance(1000.0), MAX_CATCH_UP_FIRES);
        // Backlog dropped: next fire one interval later
        assert_eq!(task.advance(5.0), 0);
        assert_eq!(task.advance(5.0), 1);
    }

    #[test]
    fn test_cancel_stops_fires() {
        let mut task = ScheduledTask::every(100.0);
        task.cancel();
        assert!(task.is_cancelled());
        assert_eq!(task.advance(10_000.0), 0);
    }
}
