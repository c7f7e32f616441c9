//! Core types and service wiring for the cowin-cowboy vaccination slot checker.

/// Configuration file model.
pub mod config;
/// Conversion of calendar dates to the API's date format.
pub mod date;
/// Filtering of merged centers by user criteria.
pub mod filter;
/// Session-level union of center maps.
pub mod merge;
/// Domain models for centers, sessions and locations.
pub mod model;
/// Traits describing the slot lookup backends.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use config::*;
pub use date::*;
pub use filter::*;
pub use merge::*;
pub use model::*;
pub use ports::*;
pub use service::*;
