//! # Runtime Configuration
//!
//! Configuration for the Relay service. All external resources are named
//! here explicitly; nothing is located through process-global state.

use relay_bus::DEFAULT_CHANNEL_CAPACITY;
use std::path::PathBuf;

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Path to the credential file (`name=sha256-hex-digest` entries).
    /// Startup fails if the file cannot be loaded.
    pub credential_file: PathBuf,

    /// Optional message of the day attached to successful logins.
    pub motd: Option<String>,

    /// Bus channel capacity (messages buffered per subscriber).
    pub bus_capacity: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            credential_file: PathBuf::from("./login.credentials"),
            motd: None,
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
