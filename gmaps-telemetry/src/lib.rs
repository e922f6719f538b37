//! # gmaps-telemetry
//!
//! Structured logging for the Google Maps agent workspace.
//!
//! ```rust
//! use gmaps_telemetry::{init_telemetry, info};
//!
//! init_telemetry("gmaps").expect("telemetry");
//! info!(query = "강남역 스타벅스", "searching");
//! ```

pub mod init;
pub mod spans;

pub use tracing::{Instrument, debug, error, info, warn};

pub use init::{init_json_telemetry, init_telemetry};
pub use spans::*;
