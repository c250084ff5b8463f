//! Ports (trait boundaries) for external collaborators.
//!
//! The decision engine owns these traits; the grid-world simulation, the
//! feature library and the advisor definitions implement them.

pub mod advisor_source;
pub mod features;
pub mod simulation;

pub use advisor_source::AdvisorSource;
pub use features::{FeatureExtractor, StateFeatures};
pub use simulation::{GameState, GridView};
