//! Slot domain type
//!
//! A slot is an hour of the day. Each activation maps the wall clock to
//! exactly one slot, and the slot indexes the roster.

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

/// Number of schedulable slots in a day
pub const SLOTS_PER_DAY: usize = 24;

/// Hour-of-day index in `0..24`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Slot(u8);

impl Slot {
    /// Creates a slot from an hour of the day
    ///
    /// Returns `None` if `hour` is not in `0..24`.
    pub fn new(hour: u32) -> Option<Self> {
        if (hour as usize) < SLOTS_PER_DAY {
            Some(Self(hour as u8))
        } else {
            None
        }
    }

    /// Slot for the hour of `time` in its own time zone
    pub fn of<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        // chrono guarantees hour() < 24
        Self(time.hour() as u8)
    }

    /// Position of this slot in the roster
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// All slots of a day, in order
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOTS_PER_DAY as u8).map(Slot)
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(hour: u8) -> Result<Self, Self::Error> {
        Self::new(hour.into()).ok_or_else(|| format!("hour {} is not in 0..24", hour))
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.0
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}
