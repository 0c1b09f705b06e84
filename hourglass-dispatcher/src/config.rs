//! Dispatcher configuration
//!
//! Deploy-time constants for one activation: the unit-of-work naming prefix,
//! the target cluster, where the roster comes from and which clock selects
//! the slot. Nothing here changes while the process runs.

use anyhow::{Context, Result};
use hourglass_core::domain::dispatch::{DEFAULT_CLUSTER, DEFAULT_UNIT_PREFIX};
use hourglass_core::domain::roster::MAX_ROSTER_LEN;
use std::path::PathBuf;

/// Where the roster is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    /// The list compiled into the binary
    Static,
    /// Newline-delimited file
    File(PathBuf),
    /// Directory of scraper modules, one task per `*.py` file
    Directory(PathBuf),
}

/// Clock used to derive the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    Utc,
    Local,
}

impl std::str::FromStr for ClockMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(ClockMode::Utc),
            "local" => Ok(ClockMode::Local),
            other => anyhow::bail!("unknown slot clock '{}', expected 'utc' or 'local'", other),
        }
    }
}

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace prepended to every task to form the unit-of-work name
    pub unit_prefix: String,

    /// Cluster the unit of work runs in
    pub cluster: String,

    /// Control plane base URL (e.g., "http://localhost:8080")
    pub control_plane_url: String,

    /// Bearer credential for the control plane
    pub control_plane_token: Option<String>,

    /// Roster location
    pub roster_source: RosterSource,

    /// Largest roster accepted at startup
    pub max_roster_len: usize,

    /// Clock the slot is read from
    pub clock: ClockMode,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - UNIT_PREFIX (default: documenters_aggregator)
    /// - CLUSTER_NAME (default: documenters-aggregator-production)
    /// - CONTROL_PLANE_URL (default: http://localhost:8080)
    /// - CONTROL_PLANE_TOKEN
    /// - ROSTER_FILE or ROSTER_DIR (default: compiled-in roster)
    /// - MAX_ROSTER_LEN (default: 48)
    /// - SLOT_CLOCK (utc or local, default: utc)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let roster_source = match (var("ROSTER_FILE"), var("ROSTER_DIR")) {
            (Some(_), Some(_)) => anyhow::bail!("ROSTER_FILE and ROSTER_DIR are mutually exclusive"),
            (Some(file), None) => RosterSource::File(PathBuf::from(file)),
            (None, Some(dir)) => RosterSource::Directory(PathBuf::from(dir)),
            (None, None) => RosterSource::Static,
        };

        let max_roster_len = match var("MAX_ROSTER_LEN") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("MAX_ROSTER_LEN is not a number: '{}'", raw))?,
            None => defaults.max_roster_len,
        };

        let clock = match var("SLOT_CLOCK") {
            Some(raw) => raw.parse()?,
            None => defaults.clock,
        };

        Ok(Self {
            unit_prefix: var("UNIT_PREFIX").unwrap_or(defaults.unit_prefix),
            cluster: var("CLUSTER_NAME").unwrap_or(defaults.cluster),
            control_plane_url: var("CONTROL_PLANE_URL").unwrap_or(defaults.control_plane_url),
            control_plane_token: var("CONTROL_PLANE_TOKEN"),
            roster_source,
            max_roster_len,
            clock,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.unit_prefix.is_empty() {
            anyhow::bail!("unit_prefix cannot be empty");
        }

        if self.cluster.is_empty() {
            anyhow::bail!("cluster cannot be empty");
        }

        if !self.control_plane_url.starts_with("http://")
            && !self.control_plane_url.starts_with("https://")
        {
            anyhow::bail!("control_plane_url must start with http:// or https://");
        }

        if self.max_roster_len == 0 || self.max_roster_len > MAX_ROSTER_LEN {
            anyhow::bail!("max_roster_len must be between 1 and {}", MAX_ROSTER_LEN);
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit_prefix: DEFAULT_UNIT_PREFIX.to_string(),
            cluster: DEFAULT_CLUSTER.to_string(),
            control_plane_url: "http://localhost:8080".to_string(),
            control_plane_token: None,
            roster_source: RosterSource::Static,
            max_roster_len: MAX_ROSTER_LEN,
            clock: ClockMode::Utc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.unit_prefix, "documenters_aggregator");
        assert_eq!(config.cluster, "documenters-aggregator-production");
        assert_eq!(config.max_roster_len, 48);
        assert_eq!(config.roster_source, RosterSource::Static);
        assert_eq!(config.clock, ClockMode::Utc);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_with_nothing_set_matches_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.unit_prefix, Config::default().unit_prefix);
        assert_eq!(config.roster_source, RosterSource::Static);
        assert!(config.control_plane_token.is_none());
    }

    #[test]
    fn test_from_lookup_reads_every_variable() {
        let config = from_pairs(&[
            ("UNIT_PREFIX", "city_scrapers"),
            ("CLUSTER_NAME", "staging"),
            ("CONTROL_PLANE_URL", "https://ecs.example.com"),
            ("CONTROL_PLANE_TOKEN", "t0ken"),
            ("ROSTER_FILE", "/etc/hourglass/spiders.txt"),
            ("MAX_ROSTER_LEN", "24"),
            ("SLOT_CLOCK", "Local"),
        ])
        .unwrap();

        assert_eq!(config.unit_prefix, "city_scrapers");
        assert_eq!(config.cluster, "staging");
        assert_eq!(config.control_plane_url, "https://ecs.example.com");
        assert_eq!(config.control_plane_token.as_deref(), Some("t0ken"));
        assert_eq!(
            config.roster_source,
            RosterSource::File(PathBuf::from("/etc/hourglass/spiders.txt"))
        );
        assert_eq!(config.max_roster_len, 24);
        assert_eq!(config.clock, ClockMode::Local);
    }

    #[test]
    fn test_roster_dir() {
        let config = from_pairs(&[("ROSTER_DIR", "city_scrapers/spiders")]).unwrap();
        assert_eq!(
            config.roster_source,
            RosterSource::Directory(PathBuf::from("city_scrapers/spiders"))
        );
    }

    #[test]
    fn test_malformed_values_are_errors() {
        assert!(from_pairs(&[("MAX_ROSTER_LEN", "many")]).is_err());
        assert!(from_pairs(&[("SLOT_CLOCK", "mars")]).is_err());
        assert!(from_pairs(&[("ROSTER_FILE", "a"), ("ROSTER_DIR", "b")]).is_err());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = from_pairs(&[("CONTROL_PLANE_TOKEN", ""), ("ROSTER_FILE", "  ")]).unwrap();
        assert!(config.control_plane_token.is_none());
        assert_eq!(config.roster_source, RosterSource::Static);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.cluster = String::new();
        assert!(config.validate().is_err());
        config.cluster = "c".to_string();

        config.control_plane_url = "not-a-url".to_string();
        assert!(config.validate().is_err());
        config.control_plane_url = "http://localhost:8080".to_string();

        config.max_roster_len = 49;
        assert!(config.validate().is_err());
        config.max_roster_len = 0;
        assert!(config.validate().is_err());
        config.max_roster_len = 24;
        assert!(config.validate().is_ok());
    }
}
