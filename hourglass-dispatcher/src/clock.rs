//! Slot clock
//!
//! Reads the wall clock once per activation and turns it into a slot.

use chrono::{Local, Utc};
use hourglass_core::domain::slot::Slot;

use crate::config::ClockMode;

/// Source of the current slot
pub trait Clock: Send + Sync {
    fn current_slot(&self) -> Slot;
}

/// Wall clock in either UTC or the executor's local zone
pub struct SystemClock {
    mode: ClockMode,
}

impl SystemClock {
    pub fn new(mode: ClockMode) -> Self {
        Self { mode }
    }
}

impl Clock for SystemClock {
    fn current_slot(&self) -> Slot {
        match self.mode {
            ClockMode::Utc => Slot::of(&Utc::now()),
            ClockMode::Local => Slot::of(&Local::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_utc_clock_matches_utc_hour() {
        let clock = SystemClock::new(ClockMode::Utc);
        let before = Utc::now().hour() as usize;
        let slot = clock.current_slot().index();
        let after = Utc::now().hour() as usize;
        assert!(slot == before || slot == after);
    }
}
