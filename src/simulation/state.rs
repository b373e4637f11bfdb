//! Per-sample portfolio state
//!
//! One instance per bootstrap sample, owned by that sample's month loop and
//! never shared, which is what makes the batch embarrassingly parallel.

use crate::dataset::{Instrument, ReturnRow};
use crate::strategy::{AssetWeights, StockSplit};

/// Sub-balances for the five asset classes
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub bond: f64,
    pub large_cap: f64,
    pub small_mid: f64,
    pub international: f64,
    pub cash: f64,
}

impl PortfolioState {
    /// Allocate a total balance across the target weights
    pub fn allocated(total: f64, weights: &AssetWeights) -> Self {
        Self {
            bond: weights.bond * total,
            large_cap: weights.large_cap * total,
            small_mid: weights.small_mid * total,
            international: weights.international * total,
            cash: weights.cash * total,
        }
    }

    pub fn total(&self) -> f64 {
        self.bond + self.large_cap + self.small_mid + self.international + self.cash
    }

    /// Combined equity sub-total
    pub fn equity(&self) -> f64 {
        self.large_cap + self.small_mid + self.international
    }

    /// Reset every class to its target weight of the given total
    pub fn rebalance(&mut self, weights: &AssetWeights, total: f64) {
        *self = Self::allocated(total, weights);
    }

    /// Re-proportion the equity sub-classes to their sleeve shares of a new
    /// equity total, leaving bond and cash untouched
    pub fn set_equity(&mut self, equity_total: f64, split: &StockSplit) {
        self.large_cap = split.large() * equity_total;
        self.small_mid = split.small_mid * equity_total;
        self.international = split.international * equity_total;
    }

    /// Add one month's contribution, allocated by target weight
    pub fn invest(&mut self, amount: f64, weights: &AssetWeights) {
        self.bond += amount * weights.bond;
        self.large_cap += amount * weights.large_cap;
        self.small_mid += amount * weights.small_mid;
        self.international += amount * weights.international;
        self.cash += amount * weights.cash;
    }

    /// Compound every class by its drawn monthly return
    pub fn compound(&mut self, row: &ReturnRow, bond: Instrument, cash: Instrument) {
        self.bond *= 1.0 + row.monthly_return(bond);
        self.large_cap *= 1.0 + row.monthly_return(Instrument::LargeCap);
        self.small_mid *= 1.0 + row.monthly_return(Instrument::SmallMidCap);
        self.international *= 1.0 + row.monthly_return(Instrument::International);
        self.cash *= 1.0 + row.monthly_return(cash);
    }

    /// Annual expense drag, allocated by each class's share of the total
    pub fn apply_proportional_expense(&mut self, expense: f64) {
        let total = self.total();
        if total <= 0.0 {
            return;
        }
        self.bond *= 1.0 - expense * (self.bond / total);
        self.large_cap *= 1.0 - expense * (self.large_cap / total);
        self.small_mid *= 1.0 - expense * (self.small_mid / total);
        self.international *= 1.0 - expense * (self.international / total);
        self.cash *= 1.0 - expense * (self.cash / total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::AssetWeights;
    use approx::assert_relative_eq;

    fn test_weights() -> (AssetWeights, StockSplit) {
        let split = StockSplit::diversified();
        (AssetWeights::resolve(50.0, 40.0, &split), split)
    }

    #[test]
    fn test_allocation_sums_to_total() {
        let (weights, _) = test_weights();
        let state = PortfolioState::allocated(100_000.0, &weights);
        assert_relative_eq!(state.total(), 100_000.0, epsilon = 1e-6);
        assert_relative_eq!(state.bond, 40_000.0, epsilon = 1e-6);
        assert_relative_eq!(state.equity(), 50_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_set_equity_preserves_bond_and_cash() {
        let (weights, split) = test_weights();
        let mut state = PortfolioState::allocated(100_000.0, &weights);
        state.set_equity(30_000.0, &split);
        assert_relative_eq!(state.equity(), 30_000.0, epsilon = 1e-9);
        assert_relative_eq!(state.large_cap, 13_500.0, epsilon = 1e-9);
        assert_relative_eq!(state.small_mid, 9_000.0, epsilon = 1e-9);
        assert_relative_eq!(state.international, 7_500.0, epsilon = 1e-9);
        assert_relative_eq!(state.bond, 40_000.0, epsilon = 1e-9);
        assert_relative_eq!(state.cash, 10_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_proportional_expense_undershoots_flat_drag() {
        let (weights, _) = test_weights();
        let mut state = PortfolioState::allocated(100_000.0, &weights);
        state.apply_proportional_expense(0.01);
        // each class pays expense on its own share, so the aggregate
        // deduction is expense * sum(weight^2) * total, below a flat 1%
        let flat = 100_000.0 * 0.99;
        assert!(state.total() > flat);
        assert!(state.total() < 100_000.0);
    }

    #[test]
    fn test_expense_noop_on_empty_portfolio() {
        let (weights, _) = test_weights();
        let mut state = PortfolioState::allocated(0.0, &weights);
        state.apply_proportional_expense(0.01);
        assert_eq!(state.total(), 0.0);
    }
}
