//! # Relay Node
//!
//! Binary entry point for the Relay message service.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load configuration (from defaults/env)
//! 3. Load the credential file (startup fails if it is absent)
//! 4. Wire session store, bus, adapter, and service
//! 5. Run until Ctrl+C, then shut down the dispatch worker

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use relay_auth::{PropertyFileValidator, RoleBasedAdapter};
use relay_bus::{InMemoryMessageBus, MessageSender};
use relay_runtime::{RelayConfig, RelayService};
use shared_types::SessionStore;

/// Load configuration from defaults and environment overrides.
fn load_config() -> RelayConfig {
    let mut config = RelayConfig::default();

    if let Ok(path) = std::env::var("RELAY_CREDENTIAL_FILE") {
        config.credential_file = path.into();
    }
    if let Ok(motd) = std::env::var("RELAY_MOTD") {
        config.motd = Some(motd);
    }
    if let Ok(capacity) = std::env::var("RELAY_BUS_CAPACITY") {
        if let Ok(c) = capacity.parse() {
            config.bus_capacity = c;
        }
    }

    config
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = load_config();
    info!(credential_file = %config.credential_file.display(), "Starting Relay");

    // The service must not start without a usable credential store.
    let validator = PropertyFileValidator::from_file(&config.credential_file)
        .context("Failed to load credential file")?;
    info!(principals = validator.len(), "Credential store loaded");

    // Wire the core components
    let sessions = SessionStore::new_shared();
    let bus = Arc::new(InMemoryMessageBus::with_capacity(config.bus_capacity));
    let mut adapter = RoleBasedAdapter::new(
        sessions,
        Arc::new(validator),
        Arc::clone(&bus) as Arc<dyn MessageSender>,
    );
    if let Some(motd) = config.motd {
        adapter = adapter.with_motd(motd);
    }

    let service = RelayService::new(bus, Arc::new(adapter));

    info!("Relay service is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    service.shutdown();
    info!("Shutdown complete");

    Ok(())
}
