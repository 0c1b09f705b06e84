//! Activation
//!
//! One activation is one pass through: load roster, read the slot, dispatch.
//! The roster is validated before the clock is consulted, so a bad roster
//! fails the activation regardless of the hour.

use anyhow::{Context, Result};
use hourglass_core::domain::dispatch::DispatchOutcome;
use hourglass_core::domain::roster::Roster;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::repository::RosterRepository;
use crate::service::DispatchService;

/// Runs a single activation
///
/// # Arguments
/// * `roster_repository` - Where the roster comes from
/// * `max_roster_len` - Largest roster accepted
/// * `clock` - Source of the current slot
/// * `dispatcher` - Performs the dispatch for the slot
pub async fn activate(
    roster_repository: &dyn RosterRepository,
    max_roster_len: usize,
    clock: &dyn Clock,
    dispatcher: &dyn DispatchService,
) -> Result<DispatchOutcome> {
    let roster = load_roster(roster_repository, max_roster_len).await?;

    let slot = clock.current_slot();
    tracing::Span::current().record("slot", slot.index());
    info!("Activation for slot {} ({})", slot.index(), slot);

    dispatcher.dispatch(&roster, slot).await
}

/// Loads the roster and reports anything suspicious about it
async fn load_roster(repository: &dyn RosterRepository, max_len: usize) -> Result<Roster> {
    let roster = repository
        .load(max_len)
        .await
        .with_context(|| format!("Failed to load roster from {}", repository.describe()))?;

    info!(
        "Loaded roster of {} entries from {}",
        roster.len(),
        repository.describe()
    );

    let duplicates = roster.duplicates();
    if !duplicates.is_empty() {
        warn!(
            "Roster lists {} more than once; each occurrence gets its own slot",
            duplicates.join(", ")
        );
    }

    if !roster.unreachable().is_empty() {
        warn!(
            "Roster entries past slot 23 are never dispatched: {}",
            roster.unreachable().join(", ")
        );
    }

    for (slot, task) in roster.schedule() {
        debug!("  {} -> {}", slot, task.unwrap_or("(idle)"));
    }

    Ok(roster)
}
