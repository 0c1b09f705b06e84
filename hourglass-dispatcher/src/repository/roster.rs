//! Roster repository
//!
//! Loads the roster from one of its sources:
//! - The list compiled into the binary
//! - A newline-delimited file
//! - A directory of scraper modules
//!
//! Every source produces a validated [`Roster`]; a roster longer than the
//! configured limit is an error here, before any slot is computed.

use anyhow::{Context, Result};
use async_trait::async_trait;
use hourglass_core::domain::roster::Roster;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Scrapers dispatched when no roster file or directory is configured
///
/// Declared in ascending order; slot `n` runs entry `n`.
pub const STATIC_ROSTER: &[&str] = &[
    "chi_animal",
    "chi_board_elections",
    "chi_boardofethics",
    "chi_buildings",
    "chi_city_college",
    "chi_citycouncil",
    "chi_community_development",
    "chi_design",
    "chi_development_fund",
    "chi_fire_benefit_fund",
    "chi_housing_authority",
    "chi_human_relations",
    "chi_il_medical_district",
    "chi_infrastructure_trust",
    "chi_labor_retirement_fund",
    "chi_landmark_commission",
    "chi_library",
    "chi_license_appeal",
    "chi_localschoolcouncil",
    "chi_metro_pier_exposition",
];

/// Extension of scraper modules in a roster directory
const MODULE_EXTENSION: &str = "py";

/// Module stem that never names a scraper
const PACKAGE_MARKER: &str = "__init__";

/// Repository trait for roster loading
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Loads and validates the roster
    ///
    /// # Arguments
    /// * `max_len` - Largest roster accepted
    async fn load(&self, max_len: usize) -> Result<Roster>;

    /// Human-readable description of the source, for logs
    fn describe(&self) -> String;
}

/// Roster held in memory, in declared order
pub struct StaticRosterRepository {
    entries: Vec<String>,
}

impl StaticRosterRepository {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// The compiled-in roster
    pub fn builtin() -> Self {
        Self::new(STATIC_ROSTER.iter().copied())
    }
}

#[async_trait]
impl RosterRepository for StaticRosterRepository {
    async fn load(&self, max_len: usize) -> Result<Roster> {
        Roster::new(self.entries.clone(), max_len).context("Invalid built-in roster")
    }

    fn describe(&self) -> String {
        format!("built-in list of {} entries", self.entries.len())
    }
}

/// Newline-delimited roster file
pub struct FileRosterRepository {
    path: PathBuf,
}

impl FileRosterRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RosterRepository for FileRosterRepository {
    async fn load(&self, max_len: usize) -> Result<Roster> {
        let source = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read roster file {}", self.path.display()))?;

        Roster::from_lines(&source, max_len)
            .with_context(|| format!("Invalid roster in {}", self.path.display()))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Directory of scraper modules
///
/// Each `<name>.py` file contributes `<name>`; the package marker
/// `__init__.py` and anything that is not a regular file are skipped.
pub struct DirectoryRosterRepository {
    path: PathBuf,
}

impl DirectoryRosterRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RosterRepository for DirectoryRosterRepository {
    async fn load(&self, max_len: usize) -> Result<Roster> {
        let mut dir = tokio::fs::read_dir(&self.path)
            .await
            .with_context(|| format!("Failed to open roster directory {}", self.path.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .with_context(|| format!("Failed to list roster directory {}", self.path.display()))?
        {
            let file_type = entry
                .file_type()
                .await
                .with_context(|| format!("Failed to inspect {}", entry.path().display()))?;
            if !file_type.is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MODULE_EXTENSION) {
                continue;
            }

            match path.file_stem().map(|s| s.to_str()) {
                Some(Some(PACKAGE_MARKER)) | None => {}
                Some(Some(stem)) => names.push(stem.to_string()),
                Some(None) => warn!(
                    "Skipping scraper module with a non UTF-8 name: {}",
                    path.display()
                ),
            }
        }

        debug!(
            "Found {} scraper module(s) in {}",
            names.len(),
            self.path.display()
        );

        Roster::from_unsorted(names, max_len)
            .with_context(|| format!("Invalid roster from {}", self.path.display()))
    }

    fn describe(&self) -> String {
        format!("directory {}", self.path.display())
    }
}
