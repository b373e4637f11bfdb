//! Report tables assembled from the raw simulation results

use super::percentile::{mean, percentile, sorted_copy};
use serde::Serialize;

/// Distributional summary of one outcome vector
///
/// The 1/5/10% rows double as the value-at-risk measures in the key
/// metrics tables.
#[derive(Debug, Clone, Serialize)]
pub struct PercentileSummary {
    pub lowest: f64,
    pub var_1pct: f64,
    pub var_5pct: f64,
    pub var_10pct: f64,
    pub pct_20: f64,
    pub pct_40: f64,
    pub median: f64,
    pub pct_60: f64,
    pub pct_80: f64,
    pub highest: f64,
    pub mean: f64,
}

impl PercentileSummary {
    /// Summarize an unsorted, non-empty sample
    pub fn from_samples(values: &[f64]) -> Self {
        let sorted = sorted_copy(values);
        Self {
            lowest: sorted[0],
            var_1pct: percentile(&sorted, 0.01),
            var_5pct: percentile(&sorted, 0.05),
            var_10pct: percentile(&sorted, 0.10),
            pct_20: percentile(&sorted, 0.20),
            pct_40: percentile(&sorted, 0.40),
            median: percentile(&sorted, 0.50),
            pct_60: percentile(&sorted, 0.60),
            pct_80: percentile(&sorted, 0.80),
            highest: sorted[sorted.len() - 1],
            mean: mean(&sorted),
        }
    }

    /// The same summary with every value divided by `divisor`
    /// (months-to-years conversion for depletion timing)
    pub fn scaled(&self, divisor: f64) -> Self {
        Self {
            lowest: self.lowest / divisor,
            var_1pct: self.var_1pct / divisor,
            var_5pct: self.var_5pct / divisor,
            var_10pct: self.var_10pct / divisor,
            pct_20: self.pct_20 / divisor,
            pct_40: self.pct_40 / divisor,
            median: self.median / divisor,
            pct_60: self.pct_60 / divisor,
            pct_80: self.pct_80 / divisor,
            highest: self.highest / divisor,
            mean: self.mean / divisor,
        }
    }
}

/// Remaining-balance distribution at one 5-year checkpoint
#[derive(Debug, Clone, Serialize)]
pub struct CheckpointRow {
    pub end_of_year: u32,
    pub balances: PercentileSummary,
}

/// Spread of the interpolated failure months across failed samples only
#[derive(Debug, Clone, Serialize)]
pub struct FailureMonthStats {
    pub mean: Option<f64>,
    pub earliest: Option<f64>,
    pub latest: Option<f64>,
}

impl FailureMonthStats {
    pub fn from_failed(failed: &[f64]) -> Self {
        if failed.is_empty() {
            return Self {
                mean: None,
                earliest: None,
                latest: None,
            };
        }
        Self {
            mean: Some(mean(failed)),
            earliest: failed.iter().copied().reduce(f64::min),
            latest: failed.iter().copied().reduce(f64::max),
        }
    }
}

/// One retirement year's withdrawal income
#[derive(Debug, Clone, Serialize)]
pub struct IncomeYear {
    pub year: u32,
    pub annual: f64,
    pub cumulative: f64,
}

/// Annual and cumulative income schedule over the horizon
#[derive(Debug, Clone, Serialize)]
pub struct IncomeSchedule {
    pub years: Vec<IncomeYear>,
}

impl IncomeSchedule {
    pub fn from_withdrawals(withdrawals: &[f64]) -> Self {
        let mut cumulative = 0.0;
        let years = withdrawals
            .iter()
            .enumerate()
            .map(|(idx, &annual)| {
                cumulative += annual;
                IncomeYear {
                    year: idx as u32 + 1,
                    annual,
                    cumulative,
                }
            })
            .collect();
        Self { years }
    }
}

/// Full decumulation run summary
#[derive(Debug, Clone, Serialize)]
pub struct DecumulationReport {
    pub horizon_years: u32,
    pub samples: usize,
    pub failed_samples: usize,
    pub probability_of_failure: f64,
    pub probability_of_success: f64,
    pub failure_months: FailureMonthStats,
    /// Depletion timing in years over every sample, survivors pinned at the
    /// sentinel horizon
    pub depleted_years: PercentileSummary,
    /// Largest balance left at the final checkpoint, absent for horizons
    /// under five years
    pub max_remaining_balance: Option<f64>,
    pub checkpoints: Vec<CheckpointRow>,
    pub income: IncomeSchedule,
}

/// Full accumulation run summary
#[derive(Debug, Clone, Serialize)]
pub struct AccumulationReport {
    pub years: u32,
    pub samples: usize,
    pub balances: PercentileSummary,
    pub total_contributions: f64,
    pub average_annual_contribution: f64,
}
