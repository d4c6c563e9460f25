pub mod classifier;
pub mod lists;
pub mod registry;

pub use classifier::{Classifier, QualifyingSet};
pub use lists::RowList;
pub use registry::{AircraftRegistry, RegistryEntry};
