//! # Relay Auth - Session Authentication & Subject Authorization
//!
//! Policy layer gating bus delivery:
//!
//! - [`RoleBasedAdapter`] - authenticates principals, tracks per-session
//!   authorization state, and enforces per-subject security rules.
//! - [`RequiredRoles`] - the per-subject rule: which roles a session must
//!   hold for its messages to be delivered.
//! - [`CredentialValidator`] - pluggable port for validating name/password
//!   pairs against an external credential store.
//!
//! ## Session lifecycle
//!
//! ```text
//! Anonymous ──(successful challenge)──→ Authenticated
//!     ↑                                      │
//!     └──────────────(end_session)───────────┘
//! ```
//!
//! A failed challenge leaves the session Anonymous. There is no pending
//! state; a challenge is a single atomic attempt against the validator.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapter;
pub mod rules;
pub mod validator;

// Re-export main types
pub use adapter::RoleBasedAdapter;
pub use rules::RequiredRoles;
pub use validator::{
    CredentialOutcome, CredentialRequest, CredentialValidator, PropertyFileValidator,
    StaticValidator,
};
