pub mod label;
pub mod registry;
pub mod state;

pub use label::{describe, describe_count};
pub use registry::{ALL_KEY, BoundingBox, Predicate, PredicateRegistry};
pub use state::{FilterState, KeyState};
