//! Application container wiring estimators, advisors and fusion together.
//!
//! The container owns the advisor record source and hands out fully wired
//! [`EpsilonGreedyController`]s built from an [`AgentConfig`].

use std::sync::Arc;

use super::config::{AgentConfig, EstimatorKind};
use crate::{
    Error, Result,
    advice::{AdvisorPolicyResolver, CsvAdvisorDirectory},
    fusion::PolicyFusionEngine,
    ports::{AdvisorSource, FeatureExtractor, GameState, GridView},
    q_learning::{EpsilonGreedyController, LinearQFunction, NetworkQFunction, QFunction, QTable},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use multi_advice::app::App;
///
/// // Advisor records are read from the directory named in each config.
/// let app = App::new();
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use multi_advice::advice::{AdviceRecord, InMemoryAdvisorSource};
/// use multi_advice::app::App;
///
/// let records = vec![vec![AdviceRecord::new("feature", "Facing-ghost", "value", "2")]];
/// let app = App::for_testing()
///     .with_advisor_source(InMemoryAdvisorSource::new(records))
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Injected advisor records; `None` reads CSV files per config
    advisor_source: Option<Arc<dyn AdvisorSource>>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create an app that reads advisor records from CSV directories.
    pub fn new() -> Self {
        Self {
            advisor_source: None,
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Create a controller for `config`.
    ///
    /// Builds the configured estimator, installs policy fusion when advisors
    /// are configured and applies the seed from the config, falling back to
    /// the app default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the config fails
    /// validation or advisors are enabled without a record source.
    pub fn create_controller<S>(
        &self,
        config: &AgentConfig,
        extractor: Arc<dyn FeatureExtractor<S>>,
    ) -> Result<EpsilonGreedyController<S>>
    where
        S: GameState + GridView + 'static,
    {
        config.validate()?;
        let seed = config.seed.or(self.default_seed);

        let q_function: Box<dyn QFunction<S>> = match config.estimator {
            EstimatorKind::Tabular => Box::new(QTable::<S>::new()),
            EstimatorKind::Linear => Box::new(LinearQFunction::new(Arc::clone(&extractor))),
            EstimatorKind::Network => {
                let mut network = NetworkQFunction::new(config.network);
                if let Some(seed) = seed {
                    network = network.with_seed(seed);
                }
                Box::new(network)
            }
        };

        let mut controller =
            EpsilonGreedyController::new(q_function, config.epsilon, config.alpha, config.gamma)
                .with_num_training(config.num_training);

        if let Some(advisors) = &config.advisors {
            let source = match (&self.advisor_source, &advisors.directory) {
                (Some(source), _) => Arc::clone(source),
                (None, Some(directory)) => Arc::new(CsvAdvisorDirectory::new(directory)),
                (None, None) => {
                    return Err(Error::InvalidConfiguration {
                        message: "advisors are enabled but no advice directory is set".to_string(),
                    });
                }
            };
            let resolver = AdvisorPolicyResolver::new(source, extractor).with_count(advisors.count);
            controller = controller.with_fusion(PolicyFusionEngine::new(resolver));
        }

        if let Some(seed) = seed {
            controller = controller.with_seed(seed);
        }

        tracing::info!(
            estimator = controller.name(),
            advisors = config.advisors.as_ref().map_or(0, |advisors| advisors.count),
            num_training = config.num_training,
            "controller created"
        );
        Ok(controller)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory advice and control
/// randomness.
pub struct AppBuilder {
    advisor_source: Option<Arc<dyn AdvisorSource>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            advisor_source: None,
            default_seed: None,
        }
    }

    /// Serve advisor records from `source` instead of CSV files.
    pub fn with_advisor_source<A: AdvisorSource + 'static>(mut self, source: A) -> Self {
        self.advisor_source = Some(Arc::new(source));
        self
    }

    /// Set a default random seed for all controllers created by this app.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    pub fn build(self) -> App {
        App {
            advisor_source: self.advisor_source,
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        advice::{AdviceRecord, InMemoryAdvisorSource},
        app::AdvisorConfig,
        ports::StateFeatures,
        types::{Cell, Direction, FeatureVector, Grid},
    };

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Strip {
        walls: Grid,
        food: Grid,
        agent: Cell,
    }

    impl Strip {
        fn new() -> Self {
            Self {
                walls: Grid::new(3, 1),
                food: Grid::new(3, 1),
                agent: Cell::new(1, 0),
            }
        }
    }

    impl GameState for Strip {
        fn legal_actions(&self) -> Vec<Direction> {
            vec![Direction::East, Direction::West]
        }
    }

    impl GridView for Strip {
        fn walls(&self) -> &Grid {
            &self.walls
        }

        fn food(&self) -> &Grid {
            &self.food
        }

        fn ghost_positions(&self) -> Vec<(f64, f64)> {
            Vec::new()
        }

        fn agent_position(&self) -> Cell {
            self.agent
        }
    }

    struct StripFeatures;

    impl FeatureExtractor<Strip> for StripFeatures {
        fn features(&self, _state: &Strip, action: Direction) -> FeatureVector {
            [("bias", 1.0), (action.as_str(), 1.0)].into_iter().collect()
        }

        fn state_features(&self, state: &Strip) -> StateFeatures {
            StateFeatures {
                position: state.agent,
                direction: Direction::East,
                walls: state.walls.clone(),
                ghosts: Vec::new(),
            }
        }
    }

    fn extractor() -> Arc<dyn FeatureExtractor<Strip>> {
        Arc::new(StripFeatures)
    }

    #[test]
    fn test_app_creates_each_estimator() {
        let app = App::new();
        for (kind, name) in [
            (EstimatorKind::Tabular, "Tabular"),
            (EstimatorKind::Linear, "Linear"),
            (EstimatorKind::Network, "Network"),
        ] {
            let mut controller = app
                .create_controller(&AgentConfig::new(kind), extractor())
                .unwrap();
            assert_eq!(controller.name(), name);
            assert!(!controller.has_fusion());
            assert_eq!(controller.q_value(&Strip::new(), Direction::East).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_injected_source_enables_fusion() {
        let records = vec![vec![AdviceRecord::new("feature", "Facing-ghost", "value", "1")]];
        let app = App::for_testing()
            .with_advisor_source(InMemoryAdvisorSource::new(records))
            .with_default_seed(7)
            .build();
        let config = AgentConfig::default().with_advisors(AdvisorConfig {
            count: 1,
            directory: None,
        });
        let mut controller = app.create_controller(&config, extractor()).unwrap();
        assert!(controller.has_fusion());
        let outcome = controller.fused(&Strip::new()).unwrap().unwrap();
        assert_eq!(outcome.advisor_weights, vec![Some(1.0)]);
    }

    #[test]
    fn test_advisors_without_source_are_rejected() {
        let config = AgentConfig::default().with_advisors(AdvisorConfig::default());
        let err = App::new()
            .create_controller(&config, extractor())
            .err()
            .unwrap();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AgentConfig::default().with_epsilon(-0.1);
        assert!(App::new().create_controller(&config, extractor()).is_err());
    }
}
