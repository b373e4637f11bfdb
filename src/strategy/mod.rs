//! Strategy configuration: resolved weights, instrument selections,
//! glidepath, and withdrawal policy

mod answers;
mod config;
mod schedule;

pub use answers::{
    accumulation_from_answers, decumulation_from_answers, default_savings_answers,
    default_spending_answers,
};
pub use config::{
    AssetWeights, BondSelection, CashSelection, ConfigError, Glidepath, SimulationMode,
    StockSplit, StrategyConfig, WithdrawalOrder, MAX_HORIZON_YEARS,
};
pub use schedule::{SchedulePattern, WithdrawalSchedule};
