//! Advisors: externally defined rules that scale the learned policy.
//!
//! Each advisor is a small record set naming a situation (currently only
//! `Facing-ghost`) and a parameter. The resolver turns it into per-action
//! multipliers for the current state, which the fusion engine blends with
//! the Boltzmann policy of the active Q-function.

pub mod record;
pub mod resolver;
pub mod source;

pub use record::{Advice, AdviceKind, AdviceRecord};
pub use resolver::{AdvisorPolicyResolver, Recommendation, facing_ghost_multipliers};
pub use source::{CsvAdvisorDirectory, InMemoryAdvisorSource};
