//! # Relay Runtime
//!
//! The service layer tying the bus and the authorization adapter together:
//!
//! - [`RelayService`] - single entry point for message storage/dispatch;
//!   owns the shared bus reference and the dispatch queue.
//! - [`RelayConfig`] - runtime configuration with environment overrides.
//!
//! ## Dispatch flow
//!
//! ```text
//! store(message)
//!     │                        (mpsc queue, FIFO)
//!     ▼
//! dispatch worker ── subject == AuthorizationService? ──→ challenge /
//!     │                                                    end-session
//!     ▼
//! requires_authorization && !is_authenticated? ──→ reject + denial reply
//!     │
//!     ▼
//! process (role convergence) ──→ bus.send ──→ subscribers
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod service;

// Re-export main types
pub use config::RelayConfig;
pub use service::{MessageService, RelayService};
