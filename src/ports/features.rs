//! Feature-extraction port.

use crate::types::{Cell, Direction, FeatureVector, Grid};

/// Situational features of a state used to resolve advisor recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct StateFeatures {
    /// Agent's current cell
    pub position: Cell,
    /// Direction the agent is currently facing
    pub direction: Direction,
    /// Wall layout
    pub walls: Grid,
    /// Threat-entity positions
    pub ghosts: Vec<(f64, f64)>,
}

/// Hand-built feature library turning states into named numeric features.
///
/// Implementations are supplied by the caller; the linear estimator reads
/// [`FeatureExtractor::features`] and the advisor resolver reads
/// [`FeatureExtractor::state_features`].
pub trait FeatureExtractor<S>: Send + Sync {
    /// Named features describing the effect of taking `action` in `state`.
    fn features(&self, state: &S, action: Direction) -> FeatureVector;

    /// Situational features of `state` itself.
    fn state_features(&self, state: &S) -> StateFeatures;
}
