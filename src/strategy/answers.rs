//! Resolution of the positional questionnaire answers into a `StrategyConfig`
//!
//! The calculator front end collects plain numeric answers in a fixed
//! order; everything here converts those lists into validated domain types.

use super::config::{
    AssetWeights, BondSelection, CashSelection, ConfigError, Glidepath, SimulationMode,
    StockSplit, StrategyConfig, WithdrawalOrder,
};
use super::schedule::{SchedulePattern, WithdrawalSchedule};
use crate::simulation::round15;

/// Savings (accumulation) answer positions:
/// 0 years until retirement, 1 annual salary, 2 contribution % of salary,
/// 3 annual contribution increase %, 4 annual expense %, 5 current portfolio
/// value, 6 stock %, 7 stock % at retirement, 8 bond %, 9 small/midcap % of
/// stock, 10 international % of stock, 11 bond code (1 Treasury, 2 corporate,
/// 3 CD), 12 CD annual rate %, 13 cash code (1 T-bill, 2 MMF), 14 MMF annual
/// rate %.
pub const SAVINGS_ANSWER_COUNT: usize = 15;

/// Spending (decumulation) answer positions:
/// 0 current portfolio value, 1 years the money must last, 2 initial annual
/// withdrawal, 3 annual cost-of-living %, 4 pattern code (1 none, 2 one
/// change, 3 two changes), 5 first change amount, 6 first change start year,
/// 7 first change end year, 8 second change amount, 9 second change start
/// year, 10 annual expense %, 11 stock %, 12 bond %, 13 small/midcap % of
/// stock, 14 international % of stock, 15 bond code, 16 CD annual rate %,
/// 17 cash code, 18 MMF annual rate %, 19 withdrawal strategy code (1-4).
pub const SPENDING_ANSWER_COUNT: usize = 20;

/// Questionnaire defaults for the accumulation calculator
pub fn default_savings_answers() -> Vec<f64> {
    vec![
        25.0, 125_000.0, 10.0, 3.0, 1.0, 1_250_000.0, 50.0, 30.0, 40.0, 30.0, 25.0, 1.0, 0.0,
        1.0, 0.0,
    ]
}

/// Questionnaire defaults for the decumulation calculator
pub fn default_spending_answers() -> Vec<f64> {
    vec![
        250_000.0, 30.0, 15_000.0, 3.0, 1.0, 0.0, 10.0, 20.0, 0.0, 20.0, 1.0, 50.0, 40.0,
        30.0, 25.0, 3.0, 2.0, 2.0, 0.0, 1.0,
    ]
}

/// Resolve the savings questionnaire into an accumulation configuration
pub fn accumulation_from_answers(answers: &[f64]) -> Result<StrategyConfig, ConfigError> {
    expect_len(answers, SAVINGS_ANSWER_COUNT)?;

    let years = answers[0] as u32;
    let salary = answers[1];
    let contribution_pct = answers[2];
    let inflation = round15(answers[3] / 100.0);
    let expense = round15(answers[4] / 100.0);
    let starting_balance = answers[5];
    let stock_pct = answers[6];
    let retirement_stock_pct = answers[7];
    let bond_pct = answers[8];
    let split = StockSplit::from_percentages(answers[9], answers[10]);
    let bond_selection = BondSelection::from_code(answers[11] as i64)?;
    let cd_annual_rate = answers[12];
    let cash_selection = CashSelection::from_code(answers[13] as i64)?;
    let mmf_annual_rate = answers[14];

    // contribution % of salary, spread across 12 months
    let monthly_contribution = round15(contribution_pct / 100.0 * (salary / 12.0));

    // A flat stock allocation means no glidepath; otherwise the stock
    // weight walks linearly to its retirement value.
    let glidepath = if (stock_pct - retirement_stock_pct).abs() > 1e-12 {
        Some(Glidepath {
            stock_weight_at_retirement: round15(retirement_stock_pct / 100.0),
        })
    } else {
        None
    };

    let config = StrategyConfig {
        years,
        starting_balance,
        inflation,
        expense,
        weights: AssetWeights::resolve(stock_pct, bond_pct, &split),
        split,
        bond_selection,
        cash_selection,
        cd_annual_rate,
        mmf_annual_rate,
        mode: SimulationMode::Accumulation {
            monthly_contribution,
            glidepath,
        },
    };
    config.validate()?;
    Ok(config)
}

/// Resolve the spending questionnaire into a decumulation configuration
pub fn decumulation_from_answers(answers: &[f64]) -> Result<StrategyConfig, ConfigError> {
    expect_len(answers, SPENDING_ANSWER_COUNT)?;

    let starting_balance = answers[0];
    let years = answers[1] as u32;
    let initial_withdrawal = answers[2];
    let inflation = round15(answers[3] / 100.0);
    let pattern = schedule_pattern(answers)?;
    let expense = round15(answers[10] / 100.0);
    let stock_pct = answers[11];
    let bond_pct = answers[12];
    let split = StockSplit::from_percentages(answers[13], answers[14]);
    let bond_selection = BondSelection::from_code(answers[15] as i64)?;
    let cd_annual_rate = answers[16];
    let cash_selection = CashSelection::from_code(answers[17] as i64)?;
    let mmf_annual_rate = answers[18];
    let order = WithdrawalOrder::from_code(answers[19] as i64)?;

    let config = StrategyConfig {
        years,
        starting_balance,
        inflation,
        expense,
        weights: AssetWeights::resolve(stock_pct, bond_pct, &split),
        split,
        bond_selection,
        cash_selection,
        cd_annual_rate,
        mmf_annual_rate,
        mode: SimulationMode::Decumulation {
            order,
            schedule: WithdrawalSchedule {
                initial_amount: initial_withdrawal,
                pattern,
            },
        },
    };
    config.validate()?;
    Ok(config)
}

fn schedule_pattern(answers: &[f64]) -> Result<SchedulePattern, ConfigError> {
    match answers[4] as i64 {
        1 => Ok(SchedulePattern::Constant),
        2 => Ok(SchedulePattern::OneChange {
            amount: answers[5],
            start_year: answers[6] as u32,
        }),
        3 => Ok(SchedulePattern::TwoChanges {
            first_amount: answers[5],
            first_start: answers[6] as u32,
            first_end: answers[7] as u32,
            second_amount: answers[8],
            second_start: answers[9] as u32,
        }),
        code => Err(ConfigError::SelectionCode {
            field: "withdrawal change pattern",
            code,
        }),
    }
}

fn expect_len(answers: &[f64], expected: usize) -> Result<(), ConfigError> {
    if answers.len() != expected {
        return Err(ConfigError::AnswerCount {
            expected,
            got: answers.len(),
        });
    }
    Ok(())
}
