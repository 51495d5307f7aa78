//! # Relay Test Suite
//!
//! Unified test crate for cross-crate scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/       # Cross-crate flows
//!     ├── auth_round_trip.rs   # Login lifecycle through the service
//!     ├── bus_routing.rs       # Subject routing, ordering, streams
//!     └── concurrency.rs       # Session isolation under contention
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p relay-tests
//! cargo test -p relay-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;
