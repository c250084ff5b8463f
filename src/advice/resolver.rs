//! Resolves each advisor's per-action multipliers for the current state.

use std::sync::Arc;

use crate::{
    Error, Result,
    advice::{Advice, AdviceKind},
    ports::{AdvisorSource, FeatureExtractor, StateFeatures},
    types::ActionDistribution,
};

/// Multiplier applied to the facing direction when a threat is ahead.
pub const FACING_GHOST_PENALTY: f64 = 0.5;

/// Default roster size.
pub const DEFAULT_ADVISOR_COUNT: usize = 5;

/// What one advisor said about a state.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// Per-action multipliers (scaling factors, not probabilities).
    Multipliers(ActionDistribution),
    /// The advisor's situation is not one the engine recognises; it takes no
    /// part in fusion.
    Abstain { kind: String },
}

impl Recommendation {
    pub fn multipliers(&self) -> Option<&ActionDistribution> {
        match self {
            Recommendation::Multipliers(multipliers) => Some(multipliers),
            Recommendation::Abstain { .. } => None,
        }
    }
}

/// Resolves a fixed roster of advisors `0..count`.
///
/// Advisors are stateless: records are fetched from the source on every
/// resolution.
pub struct AdvisorPolicyResolver<S> {
    source: Arc<dyn AdvisorSource>,
    extractor: Arc<dyn FeatureExtractor<S>>,
    count: usize,
}

impl<S> AdvisorPolicyResolver<S> {
    pub fn new(source: Arc<dyn AdvisorSource>, extractor: Arc<dyn FeatureExtractor<S>>) -> Self {
        Self {
            source,
            extractor,
            count: DEFAULT_ADVISOR_COUNT,
        }
    }

    /// Resolve advisors `0..count` instead of the default five.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Every advisor's recommendation for `state`, in advisor order.
    ///
    /// # Errors
    ///
    /// Fails on the first advisor whose records cannot be read or are
    /// malformed; unrecognised situations abstain instead.
    pub fn resolve(&self, state: &S) -> Result<Vec<Recommendation>> {
        if self.count == 0 {
            return Ok(Vec::new());
        }
        let features = self.extractor.state_features(state);
        (0..self.count)
            .map(|advisor| self.resolve_advisor(advisor, &features))
            .collect()
    }

    fn resolve_advisor(&self, advisor: usize, features: &StateFeatures) -> Result<Recommendation> {
        let records = self.source.records(advisor)?;
        if records.is_empty() {
            return Err(Error::MalformedAdvisorRecord {
                advisor,
                reason: "advisor has no records".to_string(),
            });
        }
        let advice = Advice::from_records(&records);
        tracing::debug!(advisor, ?advice, "resolved advice");

        match AdviceKind::from_advice(advisor, &advice) {
            Ok(AdviceKind::FacingGhost { steps }) => Ok(Recommendation::Multipliers(
                facing_ghost_multipliers(features, steps),
            )),
            Err(Error::UnrecognizedAdviceKind { kind, .. }) => {
                tracing::warn!(advisor, %kind, "advisor abstains: unrecognized advice kind");
                Ok(Recommendation::Abstain { kind })
            }
            Err(err) => Err(err),
        }
    }
}

/// Halve the facing direction when at least one threat can step onto the
/// cell `steps` ahead of the agent; every other direction keeps `1.0`.
pub fn facing_ghost_multipliers(features: &StateFeatures, steps: i32) -> ActionDistribution {
    let projected = features.position.offset(features.direction, steps);
    let threats = features
        .ghosts
        .iter()
        .filter(|ghost| features.walls.legal_neighbors(**ghost).contains(&projected))
        .count();

    let mut multipliers = ActionDistribution::uniform(1.0);
    if threats >= 1 {
        multipliers.set(features.direction, FACING_GHOST_PENALTY);
    }
    multipliers
}
