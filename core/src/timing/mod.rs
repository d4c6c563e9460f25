pub mod cadence;

pub use cadence::{next_delay, Cadence};
