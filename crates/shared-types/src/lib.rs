//! # Shared Types - Common Types for Relay Crates
//!
//! Leaf crate holding the types every other Relay crate builds on:
//!
//! - [`Message`] - the addressable envelope routed by the bus
//! - [`Session`] / [`SessionStore`] - per-client session state and roles
//! - [`AuthError`] / [`ConfigError`] - shared error taxonomy
//!
//! ## Protocol
//!
//! Messages carry named parts keyed by [`PartKey`]. The credential exchange
//! uses the `Name` and `Password` parts; outcome notifications are sent to
//! the [`LOGIN_CLIENT_SUBJECT`] reply subject as [`Command::SuccessfulAuth`]
//! or [`Command::FailedAuth`] messages. Messages addressed to
//! [`AUTHORIZATION_SERVICE_SUBJECT`] drive the authentication lifecycle
//! instead of being delivered to subscribers.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod errors;
pub mod message;
pub mod session;

// Re-export main types
pub use errors::{AuthError, ConfigError};
pub use message::{Command, Message, PartKey};
pub use session::{RoleToken, Session, SessionId, SessionStore};

/// Well-known reply subject receiving authentication outcome notifications.
pub const LOGIN_CLIENT_SUBJECT: &str = "LoginClient";

/// Well-known subject driving the authentication lifecycle (challenge,
/// end-session). Messages addressed here are consumed by the service, not
/// delivered to subscribers.
pub const AUTHORIZATION_SERVICE_SUBJECT: &str = "AuthorizationService";
