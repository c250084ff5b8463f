//! Linear function approximation over hand-built features.
//!
//! Q(s,a) = Σ_f w_f · φ_f(s,a), where φ comes from the external feature
//! extractor. Weights are keyed by feature name and grow lazily: a feature
//! gets a weight the first time an update touches it, never on read.

use std::{collections::HashMap, sync::Arc};

use crate::{
    Result,
    ports::{FeatureExtractor, GameState},
    q_learning::value::{LearningRates, QFunction, Transition, state_value},
    types::{Direction, FeatureVector},
};

/// Q-function approximated as a weighted sum of extractor features.
pub struct LinearQFunction<S> {
    extractor: Arc<dyn FeatureExtractor<S>>,
    weights: HashMap<String, f64>,
}

impl<S> LinearQFunction<S> {
    /// Create an estimator with no weights, predicting `0.0` everywhere.
    pub fn new(extractor: Arc<dyn FeatureExtractor<S>>) -> Self {
        Self {
            extractor,
            weights: HashMap::new(),
        }
    }

    /// Learned weights, one per feature seen in an update.
    pub fn weights(&self) -> &HashMap<String, f64> {
        &self.weights
    }

    /// Weight of `feature`, `0.0` if it was never updated.
    pub fn weight(&self, feature: &str) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    /// Dot product of `features` with the current weights.
    pub fn evaluate(&self, features: &FeatureVector) -> f64 {
        features
            .iter()
            .map(|(name, value)| self.weight(name) * value)
            .sum()
    }

    /// `w_f += α · δ · φ_f` for every feature present in `features`.
    fn apply_correction(&mut self, features: &FeatureVector, alpha: f64, td_error: f64) {
        for (name, value) in features.iter() {
            *self.weights.entry(name.to_string()).or_insert(0.0) += alpha * td_error * value;
        }
    }
}

impl<S> std::fmt::Debug for LinearQFunction<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearQFunction")
            .field("weights", &self.weights)
            .finish_non_exhaustive()
    }
}

impl<S: GameState> QFunction<S> for LinearQFunction<S> {
    fn predict(&mut self, state: &S, action: Direction) -> Result<f64> {
        Ok(self.evaluate(&self.extractor.features(state, action)))
    }

    fn train(&mut self, transition: &Transition<'_, S>, rates: LearningRates) -> Result<()> {
        let features = self.extractor.features(transition.state, transition.action);
        let next_value = state_value(self, transition.next_state)?;
        let td_target = transition.reward + rates.gamma * next_value;
        let td_error = td_target - self.evaluate(&features);
        self.apply_correction(&features, rates.alpha, td_error);
        Ok(())
    }

    fn name(&self) -> &str {
        "Linear"
    }

    fn reset(&mut self) {
        self.weights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ports::StateFeatures,
        types::{Cell, Grid},
    };

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Spot {
        terminal: bool,
    }

    impl GameState for Spot {
        fn legal_actions(&self) -> Vec<Direction> {
            if self.terminal {
                Vec::new()
            } else {
                vec![Direction::North, Direction::East]
            }
        }
    }

    /// `bias` always, `east` only when moving East.
    struct BiasAndEast;

    impl FeatureExtractor<Spot> for BiasAndEast {
        fn features(&self, _state: &Spot, action: Direction) -> FeatureVector {
            let mut features = FeatureVector::new();
            features.insert("bias", 1.0);
            if action == Direction::East {
                features.insert("east", 2.0);
            }
            features
        }

        fn state_features(&self, _state: &Spot) -> StateFeatures {
            StateFeatures {
                position: Cell::new(0, 0),
                direction: Direction::Stop,
                walls: Grid::new(1, 1),
                ghosts: Vec::new(),
            }
        }
    }

    fn linear() -> LinearQFunction<Spot> {
        LinearQFunction::new(Arc::new(BiasAndEast))
    }

    #[test]
    fn test_unseen_pair_predicts_zero() {
        let mut q = linear();
        let state = Spot { terminal: false };
        assert_eq!(q.predict(&state, Direction::East).unwrap(), 0.0);
        assert!(q.weights().is_empty());
    }

    #[test]
    fn test_update_touches_only_present_features() {
        let mut q = linear();
        let state = Spot { terminal: false };
        let terminal = Spot { terminal: true };
        let rates = LearningRates {
            alpha: 0.5,
            gamma: 0.9,
        };

        q.train(&Transition::new(&state, Direction::North, &terminal, 4.0), rates)
            .unwrap();

        // δ = 4.0 - 0.0; bias += 0.5 * 4.0 * 1.0
        assert!((q.weight("bias") - 2.0).abs() < 1e-12);
        assert!(!q.weights().contains_key("east"));
    }

    #[test]
    fn test_update_bootstraps_from_next_state() {
        let mut q = linear();
        let state = Spot { terminal: false };
        let terminal = Spot { terminal: true };
        let rates = LearningRates {
            alpha: 0.5,
            gamma: 0.5,
        };
        q.train(&Transition::new(&state, Direction::North, &terminal, 4.0), rates)
            .unwrap();
        // bias = 2.0, so Q(s, North) = 2.0 and Q(s, East) = 2.0 (east weight 0)
        assert!((q.predict(&state, Direction::East).unwrap() - 2.0).abs() < 1e-12);

        q.train(&Transition::new(&state, Direction::East, &state, 0.0), rates)
            .unwrap();
        // R = 0 + 0.5 * 2.0 = 1.0; δ = 1.0 - 2.0 = -1.0
        // bias += 0.5 * -1.0 * 1.0; east += 0.5 * -1.0 * 2.0
        assert!((q.weight("bias") - 1.5).abs() < 1e-12);
        assert!((q.weight("east") + 1.0).abs() < 1e-12);
    }
}
