//! Application layer with dependency injection container.
//!
//! The container owns infrastructure (the advisor record source) and turns
//! an [`AgentConfig`] into a wired [`crate::q_learning::EpsilonGreedyController`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │           Application Layer (app)           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │     App (container) + AgentConfig    │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ owns                      │
//! │                 ▼                           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Advisor sources (advice)            │   │
//! │  │  - CsvAdvisorDirectory               │   │
//! │  │  - InMemoryAdvisorSource (testing)   │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ implements                │
//! │                 ▼                           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Ports                               │   │
//! │  │  - AdvisorSource, FeatureExtractor   │   │
//! │  └──────────────┬───────────────────────┘   │
//! │                 │ used by                   │
//! │                 ▼                           │
//! │  ┌──────────────────────────────────────┐   │
//! │  │  Domain Logic                        │   │
//! │  │  - QTable / Linear / Network         │   │
//! │  │  - PolicyFusionEngine                │   │
//! │  └──────────────────────────────────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use multi_advice::app::{AdvisorConfig, AgentConfig, App, EstimatorKind};
//!
//! let app = App::new();
//! let config = AgentConfig::new(EstimatorKind::Linear)
//!     .with_num_training(100)
//!     .with_advisors(AdvisorConfig {
//!         count: 5,
//!         directory: Some("advices".into()),
//!     });
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod container;

pub use config::{AdvisorConfig, AgentConfig, EstimatorKind};
pub use container::{App, AppBuilder};
