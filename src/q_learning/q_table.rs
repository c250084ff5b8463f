//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::{
    Result,
    ports::GameState,
    q_learning::value::{LearningRates, QFunction, Transition},
    types::Direction,
};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Unbounded: entries are inserted on first write and never evicted, which
/// only suits small finite state spaces.
#[derive(Debug, Clone)]
pub struct QTable<S> {
    q_values: HashMap<(S, Direction), f64>,
}

impl<S: GameState> QTable<S> {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self {
            q_values: HashMap::new(),
        }
    }

    /// Get Q-value for a state-action pair, `0.0` when unseen
    pub fn get(&self, state: &S, action: Direction) -> f64 {
        // Tuple keys cannot be borrowed piecewise, so probe with a clone.
        self.q_values
            .get(&(state.clone(), action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: S, action: Direction, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Get maximum Q-value over legal actions in a state, `0.0` if none
    pub fn max_q(&self, state: &S, legal_actions: &[Direction]) -> f64 {
        if legal_actions.is_empty() {
            return 0.0;
        }
        legal_actions
            .iter()
            .map(|&action| self.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn q_learning_update(
        &mut self,
        state: S,
        action: Direction,
        reward: f64,
        next_state: &S,
        next_legal_actions: &[Direction],
        rates: LearningRates,
    ) {
        let current_q = self.get(&state, action);
        let max_next_q = self.max_q(next_state, next_legal_actions);
        let td_target = reward + rates.gamma * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + rates.alpha * td_error;
        self.set(state, action, new_q);
    }

    /// Get total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.len()
    }
}

impl<S: GameState> Default for QTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> QFunction<S> for QTable<S> {
    fn predict(&mut self, state: &S, action: Direction) -> Result<f64> {
        Ok(self.get(state, action))
    }

    fn train(&mut self, transition: &Transition<'_, S>, rates: LearningRates) -> Result<()> {
        let next_legal = transition.next_state.legal_actions();
        self.q_learning_update(
            transition.state.clone(),
            transition.action,
            transition.reward,
            transition.next_state,
            &next_legal,
            rates,
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "Tabular"
    }

    fn reset(&mut self) {
        self.q_values.clear();
    }
}
