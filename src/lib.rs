//! Advisor-fused Q-learning decision engine for grid-world agents
//!
//! This crate provides:
//! - Interchangeable Q-function estimators: tabular, linear over named
//!   features, and a trainable regression network over grid encodings
//! - An ε-greedy controller with temporal-difference updates and episode
//!   bookkeeping
//! - Advisor records read from CSV and resolved into per-action multipliers
//! - Policy fusion blending a Boltzmann policy with weighted advice
//! - An application container building controllers from configuration
//!
//! The grid-world simulation and its feature library stay outside the crate
//! and plug in through the traits in [`ports`].

pub mod advice;
pub mod app;
pub mod error;
pub mod fusion;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use fusion::{FusionOutcome, PolicyFusionEngine, boltzmann_policy};
pub use q_learning::{EpsilonGreedyController, QFunction};
pub use types::{ActionDistribution, Cell, Direction, FeatureVector, Grid};
