pub mod position;
pub mod record;

pub use position::{normalize, normalize_snapshot, NormalizedPosition};
pub use record::{AircraftRecord, Snapshot, TrailType};
