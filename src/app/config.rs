//! Configuration types for controller creation.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, advice::resolver::DEFAULT_ADVISOR_COUNT, q_learning::NetworkConfig};

/// Which Q-function estimator a controller drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    #[default]
    Tabular,
    Linear,
    Network,
}

/// Where advisor records live and how many advisors to consult.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Number of advisors, resolved as `0..count`
    pub count: usize,
    /// Directory holding `user<i>.csv`; optional when the app injects a
    /// record source
    pub directory: Option<PathBuf>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_ADVISOR_COUNT,
            directory: None,
        }
    }
}

/// Configuration for creating a controller.
///
/// # Examples
///
/// ```
/// use multi_advice::app::{AgentConfig, EstimatorKind};
///
/// let config = AgentConfig::new(EstimatorKind::Linear)
///     .with_epsilon(0.1)
///     .with_num_training(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Exploration rate ε
    pub epsilon: f64,
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Episodes after which exploration and learning stop
    pub num_training: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Active estimator
    pub estimator: EstimatorKind,
    /// Network estimator settings
    pub network: NetworkConfig,
    /// Advisors; fusion is disabled when absent
    pub advisors: Option<AdvisorConfig>,
}

impl AgentConfig {
    /// Create a configuration for `estimator`.
    ///
    /// Uses ε = 0.05, α = 0.2, γ = 0.8, no training budget, no seed and no
    /// advisors.
    pub fn new(estimator: EstimatorKind) -> Self {
        Self {
            epsilon: 0.05,
            alpha: 0.2,
            gamma: 0.8,
            num_training: 0,
            seed: None,
            estimator,
            network: NetworkConfig::default(),
            advisors: None,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_num_training(mut self, num_training: usize) -> Self {
        self.num_training = num_training;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    pub fn with_advisors(mut self, advisors: AdvisorConfig) -> Self {
        self.advisors = Some(advisors);
        self
    }

    /// Check rates and network shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a rate outside `[0, 1]` or
    /// a zero-width hidden layer.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("epsilon", self.epsilon),
            ("alpha", self.alpha),
            ("gamma", self.gamma),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be within [0, 1], got {value}"),
                });
            }
        }
        if self.network.first_hidden == 0 || self.network.second_hidden == 0 {
            return Err(Error::InvalidConfiguration {
                message: "network hidden layers must have at least one unit".to_string(),
            });
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open config: {}", path.as_ref().display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new(EstimatorKind::default())
    }
}
