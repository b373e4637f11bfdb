//! Statistics aggregation over the raw balance/failure matrices

mod percentile;
mod report;

pub use percentile::{mean, percentile, sorted_copy};
pub use report::{
    AccumulationReport, CheckpointRow, DecumulationReport, FailureMonthStats, IncomeSchedule,
    IncomeYear, PercentileSummary,
};

use crate::simulation::ResultMatrix;

/// Closed-form cumulative contributions over the accumulation horizon
///
/// The contribution schedule is fixed by the inputs, so the total is a
/// plain geometric sum independent of the bootstrap draws:
/// sum over k of `12 * monthly * (1 + inflation)^(k-1)`.
pub fn cumulative_contributions(monthly_contribution: f64, inflation: f64, years: u32) -> f64 {
    (1..=years)
        .map(|k| 12.0 * monthly_contribution * (1.0 + inflation).powi(k as i32 - 1))
        .sum()
}

/// Reduce accumulation terminal balances into the report tables
pub fn summarize_accumulation(
    terminal_balances: &[f64],
    monthly_contribution: f64,
    inflation: f64,
    years: u32,
) -> AccumulationReport {
    let total = cumulative_contributions(monthly_contribution, inflation, years);
    AccumulationReport {
        years,
        samples: terminal_balances.len(),
        balances: PercentileSummary::from_samples(terminal_balances),
        total_contributions: total,
        average_annual_contribution: total / years as f64,
    }
}

/// Reduce the decumulation result matrix into the report tables
pub fn summarize_decumulation(matrix: &ResultMatrix, withdrawals: &[f64]) -> DecumulationReport {
    let samples = matrix.samples();
    let failed = matrix.failed_months();
    let failed_count = failed.len();

    let checkpoints = matrix
        .checkpoints
        .iter()
        .enumerate()
        .map(|(row, balances)| CheckpointRow {
            end_of_year: ResultMatrix::checkpoint_year(row),
            balances: PercentileSummary::from_samples(balances),
        })
        .collect::<Vec<_>>();

    DecumulationReport {
        horizon_years: matrix.horizon_months / 12,
        samples,
        failed_samples: failed_count,
        probability_of_failure: failed_count as f64 / samples as f64,
        probability_of_success: (samples - failed_count) as f64 / samples as f64,
        failure_months: FailureMonthStats::from_failed(&failed),
        depleted_years: PercentileSummary::from_samples(&matrix.failure_months).scaled(12.0),
        max_remaining_balance: matrix
            .checkpoints
            .last()
            .and_then(|row| row.iter().copied().reduce(f64::max)),
        checkpoints,
        income: IncomeSchedule::from_withdrawals(withdrawals),
    }
}
