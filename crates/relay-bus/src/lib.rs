//! # Relay Bus - Subject-Routed Message Delivery
//!
//! In-memory transport delivering [`shared_types::Message`] envelopes to
//! subject-registered subscribers.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Sender     │                    │  Subscriber  │
//! │              │     send()         │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │ Message Bus  │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe(filter)
//! ```
//!
//! ## Semantics
//!
//! - Delivery is fire-and-forget: `send` returns the receiver count and
//!   never retries.
//! - Messages published to a subject with no subscribers are dropped (and
//!   logged).
//! - A single broadcast channel backs the bus, so messages sent by one
//!   sender to one subject are received in publication order (FIFO per
//!   sender/subject pair).
//! - Authorization is NOT enforced here; the dispatch layer gates messages
//!   before they reach `send`.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod filter;
pub mod sender;
pub mod subscriber;

// Re-export main types
pub use filter::SubjectFilter;
pub use sender::{InMemoryMessageBus, MessageSender};
pub use subscriber::{MessageStream, Subscription, SubscriptionError};

/// Maximum messages to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
