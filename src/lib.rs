//! Nestegg - bootstrap simulation engine for retirement portfolio projections
//!
//! This library provides:
//! - Bootstrap resampling of historical monthly asset-class returns
//! - Accumulation projections with contributions and an optional glidepath
//! - Drawdown projections under four withdrawal-order strategies
//! - Distributional statistics: percentiles, success probability, depletion timing

pub mod dataset;
pub mod runner;
pub mod simulation;
pub mod stats;
pub mod strategy;

// Re-export commonly used types
pub use dataset::{HistoricalDataset, Instrument, ReturnRow};
pub use runner::{RunOutput, SimulationRunner};
pub use simulation::{BootstrapMatrix, SimulationEngine};
pub use strategy::{SimulationMode, StrategyConfig, WithdrawalOrder};
