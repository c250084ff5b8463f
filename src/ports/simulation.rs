//! Simulation port - the grid-world game the agent acts in.
//!
//! The simulation owns state representation, move generation and adversary
//! behaviour. The decision engine only needs a hashable state that can
//! report its legal actions and, for the network estimator, expose its raw
//! grid contents.

use std::hash::Hash;

use crate::types::{Cell, Direction, Grid};

/// A game state as supplied by the external simulation.
///
/// States are used as lookup keys by the tabular estimator, so they must be
/// cheap to clone and hash.
pub trait GameState: Clone + Eq + Hash + Send {
    /// Actions the agent may take in this state.
    ///
    /// Terminal states report no legal actions.
    fn legal_actions(&self) -> Vec<Direction>;

    /// Whether the episode has ended in this state.
    ///
    /// # Default Implementation
    ///
    /// A state is terminal exactly when it has no legal actions.
    fn is_terminal(&self) -> bool {
        self.legal_actions().is_empty()
    }
}

/// Raw grid observation of a state, consumed by the network encoder.
pub trait GridView {
    /// Wall layout; its dimensions are the grid dimensions.
    fn walls(&self) -> &Grid;

    /// Remaining food pellets, same dimensions as [`GridView::walls`].
    fn food(&self) -> &Grid;

    /// Threat-entity positions; may be fractional while entities move.
    fn ghost_positions(&self) -> Vec<(f64, f64)>;

    /// Cell the agent currently occupies.
    fn agent_position(&self) -> Cell;
}
