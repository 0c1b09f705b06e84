//! Hourglass Dispatcher
//!
//! A one-shot activation that starts the scraper assigned to the current hour.
//!
//! Architecture:
//! - Configuration: Deploy-time settings from the environment
//! - Repositories: Roster sources and the execution backend
//! - Services: Slot selection and the single dispatch call
//! - Activation: Load roster, read the clock, dispatch
//!
//! An external scheduler runs the binary once per hour. Exit status 0 means
//! the slot was dispatched or had nothing to do; any failure exits non-zero
//! so the scheduler sees it.

mod activation;
mod clock;
mod config;
mod repository;
mod service;

use anyhow::Result;
use std::sync::Arc;
use tracing::{Instrument, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::clock::SystemClock;
use crate::config::{Config, RosterSource};
use crate::repository::{
    DirectoryRosterRepository, ExecutionBackend, FileRosterRepository, HttpExecutionBackend,
    RosterRepository, StaticRosterRepository,
};
use crate::service::StandardDispatchService;
use hourglass_client::ControlPlaneClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hourglass_dispatcher=info,hourglass_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let activation_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "activation",
        id = %activation_id,
        slot = tracing::field::Empty
    );

    run(activation_id).instrument(span).await
}

async fn run(activation_id: Uuid) -> Result<()> {
    info!("Starting Hourglass dispatcher");

    let config = load_config()?;
    info!(
        "Loaded configuration: cluster={}, unit_prefix={}, control_plane_url={}, clock={:?}",
        config.cluster, config.unit_prefix, config.control_plane_url, config.clock
    );

    let roster_repository = roster_repository(&config.roster_source);

    let mut client = ControlPlaneClient::new(config.control_plane_url.clone());
    if let Some(token) = &config.control_plane_token {
        client = client.with_token(token.clone());
    }
    let backend: Arc<dyn ExecutionBackend> = Arc::new(HttpExecutionBackend::new(
        client,
        Some(format!("hourglass/{}", activation_id)),
    ));

    let dispatcher = StandardDispatchService::new(backend, &config.unit_prefix, &config.cluster);
    let clock = SystemClock::new(config.clock);

    match activation::activate(
        roster_repository.as_ref(),
        config.max_roster_len,
        &clock,
        &dispatcher,
    )
    .await
    {
        Ok(outcome) => {
            info!("Activation complete: {}", outcome);
            Ok(())
        }
        Err(e) => {
            error!("Activation failed: {:#}", e);
            Err(e)
        }
    }
}

/// Loads configuration from environment variables and validates it
fn load_config() -> Result<Config> {
    checked_config(Config::from_env())
}

/// Validates a parsed configuration, logging any failure before returning it
fn checked_config(parsed: Result<Config>) -> Result<Config> {
    let result = parsed.and_then(|config| {
        config.validate()?;
        Ok(config)
    });

    if let Err(e) = &result {
        error!("Configuration failed: {:#}", e);
    }
    result
}

/// Picks the roster repository for the configured source
fn roster_repository(source: &RosterSource) -> Box<dyn RosterRepository> {
    match source {
        RosterSource::Static => Box::new(StaticRosterRepository::builtin()),
        RosterSource::File(path) => Box::new(FileRosterRepository::new(path.clone())),
        RosterSource::Directory(path) => Box::new(DirectoryRosterRepository::new(path.clone())),
    }
}
