//! Cross-crate integration scenarios.

pub mod auth_round_trip;
pub mod bus_routing;
