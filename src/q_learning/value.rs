//! The shared read/update contract of every Q-value estimator.

use crate::{Result, ports::GameState, types::Direction};

/// One observed `state --action--> next_state` step and its reward.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a, S> {
    pub state: &'a S,
    pub action: Direction,
    pub next_state: &'a S,
    pub reward: f64,
}

impl<'a, S> Transition<'a, S> {
    pub fn new(state: &'a S, action: Direction, next_state: &'a S, reward: f64) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
        }
    }
}

/// Learning rate α and discount factor γ applied by a training step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningRates {
    pub alpha: f64,
    pub gamma: f64,
}

/// Q-function estimator: table lookup, linear approximation or network.
///
/// Every implementation returns exactly `0.0` for a pair it has never been
/// trained on.
pub trait QFunction<S>: Send {
    /// Estimated value of taking `action` in `state`.
    ///
    /// # Errors
    ///
    /// Only the network estimator can fail, when `state` does not fit the
    /// input shape it was built for.
    fn predict(&mut self, state: &S, action: Direction) -> Result<f64>;

    /// Move the estimate for `transition.state, transition.action` toward the
    /// bootstrapped target `reward + γ · max_a Q(next_state, a)`.
    fn train(&mut self, transition: &Transition<'_, S>, rates: LearningRates) -> Result<()>;

    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Forget everything learned.
    fn reset(&mut self);
}

/// `max_a Q(state, a)` over the legal actions of `state`; `0.0` when there
/// are none.
pub fn state_value<S, Q>(q_function: &mut Q, state: &S) -> Result<f64>
where
    S: GameState,
    Q: QFunction<S> + ?Sized,
{
    let legal_actions = state.legal_actions();
    if legal_actions.is_empty() {
        return Ok(0.0);
    }
    let mut best = f64::NEG_INFINITY;
    for action in legal_actions {
        best = best.max(q_function.predict(state, action)?);
    }
    Ok(best)
}
