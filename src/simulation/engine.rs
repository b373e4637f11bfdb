//! Trajectory simulation engine
//!
//! Evolves one portfolio path per bootstrap sample, month by month. The
//! four withdrawal-order strategies share a single year/month loop and
//! differ only in how a year's withdrawal is distributed across the
//! sub-balances and in the decision-based harvest at year end.

use super::bootstrap::BootstrapMatrix;
use super::results::{ResultMatrix, NO_FAILURE};
use super::round15;
use super::state::PortfolioState;
use crate::dataset::{HistoricalDataset, Instrument};
use crate::strategy::{AssetWeights, Glidepath, StrategyConfig, WithdrawalOrder};

/// Outcome of one decumulation sample
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRun {
    /// Interpolated failure month, or `NO_FAILURE` for a surviving path
    pub failure_month: f64,

    /// Remaining balance at each 5-year checkpoint, 0.0 once failed
    pub checkpoints: Vec<f64>,
}

/// Per-sample simulator over a sealed dataset, configuration, and index matrix
///
/// Holds only shared read-only references, so samples can be dispatched
/// across threads freely.
pub struct SimulationEngine<'a> {
    dataset: &'a HistoricalDataset,
    config: &'a StrategyConfig,
    matrix: &'a BootstrapMatrix,
    bond: Instrument,
    cash: Instrument,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(
        dataset: &'a HistoricalDataset,
        config: &'a StrategyConfig,
        matrix: &'a BootstrapMatrix,
    ) -> Self {
        Self {
            dataset,
            config,
            matrix,
            bond: config.bond_selection.instrument(),
            cash: config.cash_selection.instrument(),
        }
    }

    /// Accumulation path: terminal balance after the full horizon
    ///
    /// Contributions are added before each month's compounding and grow
    /// annually with inflation; the expense drag comes off the total every
    /// year end. A glidepath shifts weight from stocks to bonds at each
    /// year end, holding cash fixed.
    pub fn accumulate_sample(
        &self,
        sample: usize,
        monthly_contribution: f64,
        glidepath: Option<&Glidepath>,
    ) -> f64 {
        let horizon = self.matrix.horizon_months();
        let glide_step = glidepath
            .map(|g| g.annual_step(self.config.weights.stock(), self.config.years))
            .unwrap_or(0.0);

        let mut weights = self.config.weights;
        let mut balance = self.config.starting_balance;
        let mut contribution = monthly_contribution;
        let mut state = PortfolioState::allocated(balance, &weights);

        for mn in 0..horizon {
            if mn % 12 == 0 {
                state.rebalance(&weights, balance);
            }

            let row = self.dataset.row(self.matrix.draw(mn, sample));
            state.invest(contribution, &weights);
            state.compound(row, self.bond, self.cash);
            balance = round15(state.total());

            if mn % 12 == 11 {
                balance = round15(balance * (1.0 - self.config.expense));
                contribution = round15(contribution * (1.0 + self.config.inflation));
                if glide_step != 0.0 {
                    weights = weights.with_bond_weight(weights.bond + glide_step, &self.config.split);
                }
            }
        }

        balance
    }

    /// Decumulation path: failure month and checkpoint balances
    ///
    /// `withdrawals` holds the annual amount per retirement year and must
    /// cover `horizon / 12` years. Each year begins by taking the year's
    /// withdrawal off the total; a non-positive result ends the path with
    /// an interpolated failure month.
    pub fn decumulate_sample(
        &self,
        sample: usize,
        order: WithdrawalOrder,
        withdrawals: &[f64],
    ) -> SampleRun {
        let horizon = self.matrix.horizon_months();
        let weights = &self.config.weights;

        let mut checkpoints = vec![0.0; ResultMatrix::checkpoint_rows(horizon as u32)];
        let mut balance = self.config.starting_balance;
        let mut state = PortfolioState::allocated(balance, weights);
        let mut prior_year = state.clone();
        let mut withdrawal = withdrawals[0];
        let mut failure_month = NO_FAILURE;

        for mn in 0..horizon {
            if mn % 12 == 0 {
                if order == WithdrawalOrder::DecisionBased {
                    prior_year = state.clone();
                }
                balance -= withdrawal;
                if balance <= 0.0 {
                    failure_month = interpolated_failure_month(mn, balance, withdrawal);
                    break;
                }
                self.apply_withdrawal(order, &mut state, balance, withdrawal);
            }

            let row = self.dataset.row(self.matrix.draw(mn, sample));
            state.compound(row, self.bond, self.cash);
            balance = round15(state.total());

            if mn % 12 == 11 {
                let yr = mn / 12;
                if yr + 1 < withdrawals.len() {
                    withdrawal = withdrawals[yr + 1];
                }
                state.apply_proportional_expense(self.config.expense);
                balance = round15(state.total());
                if order == WithdrawalOrder::DecisionBased {
                    harvest_gains(&mut state, &prior_year, weights, balance);
                }
            }

            if mn % 60 == 59 {
                checkpoints[mn / 60] = balance;
            }
        }

        SampleRun {
            failure_month,
            checkpoints,
        }
    }

    /// Distribute a successful year's withdrawal across the sub-balances
    ///
    /// `post_balance` is the total after the withdrawal came off.
    fn apply_withdrawal(
        &self,
        order: WithdrawalOrder,
        state: &mut PortfolioState,
        post_balance: f64,
        amount: f64,
    ) {
        let split = &self.config.split;
        match order {
            WithdrawalOrder::AnnualRebalance => {
                state.rebalance(&self.config.weights, post_balance);
            }
            WithdrawalOrder::StocksFirst => {
                let mut equity = state.equity();
                drain_sleeves(&mut equity, &mut state.bond, &mut state.cash, amount);
                state.set_equity(equity, split);
            }
            WithdrawalOrder::BondsFirst => {
                let mut equity = state.equity();
                drain_sleeves(&mut state.bond, &mut state.cash, &mut equity, amount);
                state.set_equity(equity, split);
            }
            WithdrawalOrder::DecisionBased => {
                let mut equity = state.equity();
                let equity_tapped =
                    drain_sleeves(&mut state.cash, &mut state.bond, &mut equity, amount);
                // sub-classes keep their drift unless equities funded part
                // of the withdrawal
                if equity_tapped {
                    state.set_equity(equity, split);
                }
            }
        }
    }
}

/// Drain a withdrawal through three sleeves in priority order
///
/// A sleeve absorbs the withdrawal outright only when it covers the whole
/// amount; otherwise it is emptied and the shortfall falls through to the
/// next sleeve. Returns whether the last sleeve was drawn on.
fn drain_sleeves(first: &mut f64, second: &mut f64, third: &mut f64, amount: f64) -> bool {
    if *first >= amount {
        *first -= amount;
        false
    } else if *first > 0.0 {
        if *second >= amount {
            *second += *first - amount;
            *first = 0.0;
            false
        } else {
            *third += *first + *second - amount;
            *first = 0.0;
            *second = 0.0;
            true
        }
    } else if *second >= amount {
        *second -= amount;
        false
    } else if *second > 0.0 {
        *third += *second - amount;
        *second = 0.0;
        true
    } else {
        *third -= amount;
        true
    }
}

/// Decision-based year end: classes that both grew over the year and sit
/// above their target weight are trimmed back to target, with the excess
/// parked in cash for future withdrawals. Ties on either comparison leave
/// the class alone.
fn harvest_gains(
    state: &mut PortfolioState,
    prior: &PortfolioState,
    weights: &AssetWeights,
    balance: f64,
) {
    let trim = |current: &mut f64, prior_value: f64, target_weight: f64, cash: &mut f64| {
        let target = target_weight * balance;
        if *current > prior_value && *current > target {
            *cash += *current - target;
            *current = target;
        }
    };

    let mut cash = state.cash;
    trim(&mut state.bond, prior.bond, weights.bond, &mut cash);
    trim(&mut state.large_cap, prior.large_cap, weights.large_cap, &mut cash);
    trim(&mut state.small_mid, prior.small_mid, weights.small_mid, &mut cash);
    trim(
        &mut state.international,
        prior.international,
        weights.international,
        &mut cash,
    );
    state.cash = cash;
}

/// Month inside the failing year at which the money actually runs out
///
/// `balance` is the (non-positive) total after the year's withdrawal came
/// off. The pre-withdrawal balance is translated into how many monthly
/// payments it could still fund, truncated toward zero; a degenerate
/// near-zero withdrawal funds none.
fn interpolated_failure_month(month: usize, balance: f64, withdrawal: f64) -> f64 {
    let monthly = withdrawal / 12.0;
    let payments = if monthly.abs() < 1e-12 {
        0.0
    } else {
        ((balance + withdrawal) / monthly).trunc()
    };
    (month as f64 - 1.0) + payments
}
