//! Roster domain type
//!
//! The roster is the ordered list of task identifiers, one candidate per
//! hourly slot. It is built once per activation and never mutated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::slot::{SLOTS_PER_DAY, Slot};

/// Hard ceiling on roster length
///
/// Twice the number of usable slots, leaving room for schedule changes.
pub const MAX_ROSTER_LEN: usize = 48;

/// Errors raised while building a roster
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Roster holds more entries than the configured limit
    #[error("roster has {len} entries, more than the maximum of {max}")]
    TooLong { len: usize, max: usize },

    /// An entry is empty or whitespace only
    #[error("roster entry at position {position} is empty")]
    EmptyEntry { position: usize },

    /// The requested limit is above the hard ceiling
    #[error("roster limit {limit} exceeds the hard ceiling of {}", MAX_ROSTER_LEN)]
    LimitAboveCeiling { limit: usize },
}

/// Ordered, validated list of task identifiers
///
/// Serialized as a plain list. Deserializing applies the same checks as
/// [`Roster::new`] against the hard ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    entries: Vec<String>,
}

impl Roster {
    /// Builds a roster from entries in the order given
    ///
    /// Entries must be non-empty and there must be at most `max_len` of them.
    pub fn new(entries: Vec<String>, max_len: usize) -> Result<Self, RosterError> {
        if max_len > MAX_ROSTER_LEN {
            return Err(RosterError::LimitAboveCeiling { limit: max_len });
        }

        if entries.len() > max_len {
            return Err(RosterError::TooLong {
                len: entries.len(),
                max: max_len,
            });
        }

        if let Some(position) = entries.iter().position(|e| e.trim().is_empty()) {
            return Err(RosterError::EmptyEntry { position });
        }

        Ok(Self { entries })
    }

    /// Builds a roster from raw identifiers
    ///
    /// Each identifier is trimmed, empty ones are dropped and the rest are
    /// sorted ascending. Duplicates are kept.
    pub fn from_unsorted<I, S>(raw: I, max_len: usize) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = raw
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        entries.sort();

        Self::new(entries, max_len)
    }

    /// Builds a roster from newline-delimited text
    pub fn from_lines(source: &str, max_len: usize) -> Result<Self, RosterError> {
        Self::from_unsorted(source.lines(), max_len)
    }

    /// Task assigned to `slot`, if the roster reaches that far
    pub fn task_for(&self, slot: Slot) -> Option<&str> {
        self.entries.get(slot.index()).map(String::as_str)
    }

    /// Every slot of the day paired with its task
    pub fn schedule(&self) -> impl Iterator<Item = (Slot, Option<&str>)> + '_ {
        Slot::all().map(move |slot| (slot, self.task_for(slot)))
    }

    /// Entries that no slot of the day ever selects
    pub fn unreachable(&self) -> &[String] {
        self.entries.get(SLOTS_PER_DAY..).unwrap_or_default()
    }

    /// Identifiers that appear more than once, each reported once
    pub fn duplicates(&self) -> Vec<&str> {
        let mut sorted: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        sorted.sort_unstable();

        let mut duplicates: Vec<&str> = sorted
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        duplicates.dedup();
        duplicates
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<String>> for Roster {
    type Error = RosterError;

    fn try_from(entries: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(entries, MAX_ROSTER_LEN)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.entries
    }
}
