//! Epsilon-greedy controller
//!
//! Wraps one active Q-function with ε-greedy action selection, the
//! temporal-difference update and the episode bookkeeping of a training run.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Result,
    fusion::{FusionOutcome, PolicyFusionEngine},
    ports::GameState,
    q_learning::value::{LearningRates, QFunction, Transition, state_value},
    types::Direction,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// ε-greedy agent over an interchangeable Q-function.
///
/// When a [`PolicyFusionEngine`] is installed, exploitation plays the fused
/// action instead of the plain greedy one.
pub struct EpsilonGreedyController<S> {
    q_function: Box<dyn QFunction<S>>,
    fusion: Option<PolicyFusionEngine<S>>,
    epsilon: f64,
    alpha: f64,
    gamma: f64,
    initial_epsilon: f64,
    initial_alpha: f64,
    num_training: usize,
    episodes_so_far: usize,
    episode_rewards: f64,
    accumulated_train_rewards: f64,
    accumulated_test_rewards: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl<S: GameState + 'static> EpsilonGreedyController<S> {
    /// Create a new controller
    ///
    /// # Arguments
    ///
    /// * `q_function` - Active estimator
    /// * `epsilon` - Exploration rate ε
    /// * `alpha` - Learning rate α
    /// * `gamma` - Discount factor γ
    pub fn new(q_function: Box<dyn QFunction<S>>, epsilon: f64, alpha: f64, gamma: f64) -> Self {
        Self {
            q_function,
            fusion: None,
            epsilon,
            alpha,
            gamma,
            initial_epsilon: epsilon,
            initial_alpha: alpha,
            num_training: 0,
            episodes_so_far: 0,
            episode_rewards: 0.0,
            accumulated_train_rewards: 0.0,
            accumulated_test_rewards: 0.0,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Number of training episodes; exploration and learning stop once that
    /// many episodes have ended.
    pub fn with_num_training(mut self, num_training: usize) -> Self {
        self.num_training = num_training;
        self
    }

    /// Select exploiting actions through `fusion`.
    pub fn with_fusion(mut self, fusion: PolicyFusionEngine<S>) -> Self {
        self.fusion = Some(fusion);
        self
    }

    pub fn name(&self) -> &str {
        self.q_function.name()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn has_fusion(&self) -> bool {
        self.fusion.is_some()
    }

    /// Q(state, action) from the active estimator.
    pub fn q_value(&mut self, state: &S, action: Direction) -> Result<f64> {
        self.q_function.predict(state, action)
    }

    /// max_a Q(state, a) over legal actions, `0.0` for terminal states.
    pub fn value(&mut self, state: &S) -> Result<f64> {
        state_value(self.q_function.as_mut(), state)
    }

    /// Legal action with the highest Q-value; later legal actions win ties.
    /// `None` when there are no legal actions.
    pub fn best_action(&mut self, state: &S) -> Result<Option<Direction>> {
        let mut best = None;
        let mut best_q = f64::NEG_INFINITY;
        for action in state.legal_actions() {
            let q = self.q_function.predict(state, action)?;
            if q >= best_q {
                best_q = q;
                best = Some(action);
            }
        }
        Ok(best)
    }

    /// Full fusion diagnostics for `state`; `None` when no fusion engine is
    /// installed.
    pub fn fused(&mut self, state: &S) -> Result<Option<FusionOutcome>> {
        match &self.fusion {
            Some(fusion) => fusion.fuse(self.q_function.as_mut(), state).map(Some),
            None => Ok(None),
        }
    }

    /// The exploiting action: fused when advisors are configured, greedy
    /// otherwise.
    pub fn policy(&mut self, state: &S) -> Result<Option<Direction>> {
        match self.fused(state)? {
            Some(outcome) => Ok(outcome.action),
            None => self.best_action(state),
        }
    }

    /// ε-greedy action selection
    pub fn act(&mut self, state: &S) -> Result<Option<Direction>> {
        let legal_actions = state.legal_actions();
        if legal_actions.is_empty() {
            return Ok(None);
        }
        if self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            Ok(legal_actions.choose(&mut self.rng).copied())
        } else {
            // Exploit
            self.policy(state)
        }
    }

    /// Report the outcome of taking `action` in `state`.
    pub fn observe(&mut self, state: &S, action: Direction, next_state: &S, reward: f64) -> Result<()> {
        self.episode_rewards += reward;
        let rates = LearningRates {
            alpha: self.alpha,
            gamma: self.gamma,
        };
        self.q_function
            .train(&Transition::new(state, action, next_state, reward), rates)
    }

    pub fn start_episode(&mut self) {
        self.episode_rewards = 0.0;
    }

    /// Close the current episode. Reaching the training budget switches
    /// exploration and learning off.
    pub fn stop_episode(&mut self) {
        if self.is_in_training() {
            self.accumulated_train_rewards += self.episode_rewards;
        } else {
            self.accumulated_test_rewards += self.episode_rewards;
        }
        self.episodes_so_far += 1;
        tracing::info!(
            episode = self.episodes_so_far,
            reward = self.episode_rewards,
            estimator = self.q_function.name(),
            "episode finished"
        );
        if self.episodes_so_far >= self.num_training && (self.epsilon > 0.0 || self.alpha > 0.0) {
            tracing::info!(
                episodes = self.episodes_so_far,
                "training complete, exploration and learning disabled"
            );
            self.epsilon = 0.0;
            self.alpha = 0.0;
        }
    }

    pub fn is_in_training(&self) -> bool {
        self.episodes_so_far < self.num_training
    }

    pub fn is_in_testing(&self) -> bool {
        !self.is_in_training()
    }

    pub fn episodes_so_far(&self) -> usize {
        self.episodes_so_far
    }

    /// Reward collected since the current episode started.
    pub fn episode_rewards(&self) -> f64 {
        self.episode_rewards
    }

    pub fn accumulated_train_rewards(&self) -> f64 {
        self.accumulated_train_rewards
    }

    pub fn accumulated_test_rewards(&self) -> f64 {
        self.accumulated_test_rewards
    }

    /// Forget everything learned and restart episode counting.
    pub fn reset(&mut self) {
        self.q_function.reset();
        self.epsilon = self.initial_epsilon;
        self.alpha = self.initial_alpha;
        self.episodes_so_far = 0;
        self.episode_rewards = 0.0;
        self.accumulated_train_rewards = 0.0;
        self.accumulated_test_rewards = 0.0;
        self.rng = build_rng(self.rng_seed);
    }
}
