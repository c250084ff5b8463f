//! Q-value estimation and ε-greedy control
//!
//! Three interchangeable estimators share the [`QFunction`] contract:
//!
//! | Estimator | Representation | Update |
//! |-----------|----------------|--------|
//! | [`QTable`] | `(state, action) → value` map | tabular TD |
//! | [`LinearQFunction`] | weights over named features | sparse gradient TD |
//! | [`NetworkQFunction`] | ReLU regression network over a grid encoding | one RMSprop step |
//!
//! All of them return `0.0` for a pair they have never been trained on and
//! treat the value of a state without legal actions as `0.0`.
//!
//! ## Usage Example
//!
//! ```
//! use multi_advice::q_learning::{EpsilonGreedyController, QTable};
//! use multi_advice::ports::GameState;
//! use multi_advice::types::Direction;
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct Spot(u8);
//!
//! impl GameState for Spot {
//!     fn legal_actions(&self) -> Vec<Direction> {
//!         if self.0 == 0 { vec![Direction::East] } else { Vec::new() }
//!     }
//! }
//!
//! let mut agent = EpsilonGreedyController::new(Box::new(QTable::<Spot>::new()), 0.05, 0.2, 0.8)
//!     .with_seed(42);
//! let action = agent.act(&Spot(0))?;
//! assert_eq!(action, Some(Direction::East));
//! agent.observe(&Spot(0), Direction::East, &Spot(1), 1.0)?;
//! # Ok::<(), multi_advice::Error>(())
//! ```

pub mod agent;
pub mod linear;
pub mod network;
pub mod q_table;
pub mod value;

// Public re-exports
pub use agent::EpsilonGreedyController;
pub use linear::LinearQFunction;
pub use network::{NetworkConfig, NetworkQFunction, OptimizerConfig, TargetRule};
pub use q_table::QTable;
pub use value::{LearningRates, QFunction, Transition, state_value};
