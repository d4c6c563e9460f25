//! Core classification and alert de-duplication for the ICAO watch notifier.
//!
//! The modules follow one poll cycle: raw feed records are normalized, the
//! classifier decides which aircraft qualify against the sighting registry,
//! and the coordinator hands the rendered alert to a sink before marking the
//! aircraft as notified.

pub mod feed;
pub mod notify;
pub mod prelude;
pub mod telemetry;
pub mod timing;
pub mod tracking;

pub use prelude::{FilterConfig, RuleFlag};
