//! Network-based Q-function estimator.
//!
//! The regression network is built lazily, sized from the grid of the first
//! state it sees, and keeps that input width for its whole lifetime.

pub mod encoder;
pub mod mlp;

use serde::{Deserialize, Serialize};

pub use encoder::StateEncoder;
pub use mlp::Mlp;

use crate::{
    Result,
    ports::{GameState, GridView},
    q_learning::value::{LearningRates, QFunction, Transition, state_value},
    types::Direction,
};

/// RMSprop hyper-parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub learning_rate: f64,
    pub rho: f64,
    pub epsilon: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            rho: 0.9,
            epsilon: 1e-8,
        }
    }
}

/// How the bootstrapped target of a network update is formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRule {
    /// `r + γ · max_a Q(s', a)`, trained on `(s, a)`.
    #[default]
    NextStateMax,
    /// Historical variant: the max-search re-evaluates `Q(s, a_taken)` once
    /// per legal action of `s'` (floored at zero) and the step trains on
    /// `(s', a_taken)`.
    Literal,
}

/// Network shape, optimiser and update rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub first_hidden: usize,
    pub second_hidden: usize,
    pub optimizer: OptimizerConfig,
    pub target_rule: TargetRule,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            first_hidden: 164,
            second_hidden: 150,
            optimizer: OptimizerConfig::default(),
            target_rule: TargetRule::default(),
        }
    }
}

#[derive(Debug, Clone)]
struct Model {
    encoder: StateEncoder,
    network: Mlp,
}

/// Q-function backed by a trainable regression network over raw grid
/// encodings.
#[derive(Debug, Clone)]
pub struct NetworkQFunction {
    config: NetworkConfig,
    seed: Option<u64>,
    model: Option<Model>,
}

impl NetworkQFunction {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            seed: None,
            model: None,
        }
    }

    /// Seed the weight initialisation for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether the network has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.model.is_some()
    }

    /// Grid dimensions the network was built for.
    pub fn grid_dims(&self) -> Option<(usize, usize)> {
        self.model.as_ref().map(|model| model.encoder.dims())
    }

    fn model_for<V: GridView + ?Sized>(&mut self, view: &V) -> &mut Model {
        let config = self.config;
        let seed = self.seed;
        self.model.get_or_insert_with(|| {
            let encoder = StateEncoder::for_view(view);
            tracing::debug!(
                input_width = encoder.input_width(),
                first_hidden = config.first_hidden,
                second_hidden = config.second_hidden,
                "building regression network"
            );
            Model {
                network: Mlp::new(
                    encoder.input_width(),
                    (config.first_hidden, config.second_hidden),
                    config.optimizer,
                    seed,
                ),
                encoder,
            }
        })
    }

    /// One forward pass for `(state, action)`.
    pub fn estimate<V: GridView + ?Sized>(&mut self, state: &V, action: Direction) -> Result<f64> {
        let model = self.model_for(state);
        let input = model.encoder.encode(state, action)?;
        Ok(model.network.predict(input.view()))
    }

    /// One gradient step toward `target`; returns the loss before the step.
    pub fn train_toward<V: GridView + ?Sized>(
        &mut self,
        state: &V,
        action: Direction,
        target: f64,
    ) -> Result<f64> {
        let model = self.model_for(state);
        let input = model.encoder.encode(state, action)?;
        Ok(model.network.train_step(input.view(), target))
    }
}

impl<S: GameState + GridView> QFunction<S> for NetworkQFunction {
    fn predict(&mut self, state: &S, action: Direction) -> Result<f64> {
        self.estimate(state, action)
    }

    fn train(&mut self, transition: &Transition<'_, S>, rates: LearningRates) -> Result<()> {
        let loss = match self.config.target_rule {
            TargetRule::NextStateMax => {
                let next_value = state_value(self, transition.next_state)?;
                let target = transition.reward + rates.gamma * next_value;
                self.train_toward(transition.state, transition.action, target)?
            }
            TargetRule::Literal => {
                let mut max_q = 0.0_f64;
                for _ in transition.next_state.legal_actions() {
                    let q = self.estimate(transition.state, transition.action)?;
                    if q > max_q {
                        max_q = q;
                    }
                }
                let target = transition.reward + rates.gamma * max_q;
                self.train_toward(transition.next_state, transition.action, target)?
            }
        };
        tracing::trace!(loss, "network update");
        Ok(())
    }

    fn name(&self) -> &str {
        "Network"
    }

    fn reset(&mut self) {
        self.model = None;
    }
}
