//! Resolved strategy configuration consumed by the trajectory simulator

use super::schedule::WithdrawalSchedule;
use crate::dataset::Instrument;
use crate::simulation::round15;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest supported horizon; the failure-row sentinel is this many months
pub const MAX_HORIZON_YEARS: u32 = 50;

/// Configuration problems detected before any simulation work starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("asset weights sum to {sum}, expected 1.0")]
    WeightSum { sum: f64 },

    #[error("negative target weight for {class}: {weight}")]
    NegativeWeight { class: &'static str, weight: f64 },

    #[error("horizon must be at least one year")]
    ZeroHorizon,

    #[error("horizon of {years} years exceeds the {MAX_HORIZON_YEARS}-year maximum")]
    HorizonTooLong { years: u32 },

    #[error("bootstrap sample count must be positive")]
    ZeroSamples,

    #[error("expected {expected} answers, got {got}")]
    AnswerCount { expected: usize, got: usize },

    #[error("unrecognized code {code} for {field}")]
    SelectionCode { field: &'static str, code: i64 },

    #[error("bootstrap matrix spans {matrix_months} months, horizon needs {expected_months}")]
    MatrixShape {
        matrix_months: usize,
        expected_months: usize,
    },
}

/// Which return column funds the bond sub-balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondSelection {
    /// 10 year Treasury bonds (code 1)
    TreasuryBond,
    /// US corporate bond index (code 2)
    CorporateIndex,
    /// Fixed rate CD at the configured annual rate (code 3)
    FixedCd,
}

impl BondSelection {
    pub fn from_code(code: i64) -> Result<Self, ConfigError> {
        match code {
            1 => Ok(BondSelection::TreasuryBond),
            2 => Ok(BondSelection::CorporateIndex),
            3 => Ok(BondSelection::FixedCd),
            _ => Err(ConfigError::SelectionCode {
                field: "bond investment",
                code,
            }),
        }
    }

    pub fn instrument(self) -> Instrument {
        match self {
            BondSelection::TreasuryBond => Instrument::TreasuryBond,
            BondSelection::CorporateIndex => Instrument::CorporateBond,
            BondSelection::FixedCd => Instrument::FixedCd,
        }
    }
}

/// Which return column funds the cash sub-balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashSelection {
    /// 1 year Treasury bills (code 1)
    TreasuryBill,
    /// Fixed rate money market fund (code 2)
    FixedMmf,
}

impl CashSelection {
    pub fn from_code(code: i64) -> Result<Self, ConfigError> {
        match code {
            1 => Ok(CashSelection::TreasuryBill),
            2 => Ok(CashSelection::FixedMmf),
            _ => Err(ConfigError::SelectionCode {
                field: "cash investment",
                code,
            }),
        }
    }

    pub fn instrument(self) -> Instrument {
        match self {
            CashSelection::TreasuryBill => Instrument::TreasuryBill,
            CashSelection::FixedMmf => Instrument::FixedMmf,
        }
    }
}

/// Sub-class shares of the stock sleeve, as fractions of total stock
///
/// The large cap share is the remainder after small/midcap and
/// international, mirroring the original questionnaire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockSplit {
    pub small_mid: f64,
    pub international: f64,
}

impl StockSplit {
    /// Default diversified split: 45% large cap, 30% small/mid, 25% international
    pub fn diversified() -> Self {
        Self {
            small_mid: 0.30,
            international: 0.25,
        }
    }

    pub fn from_percentages(small_mid_pct: f64, international_pct: f64) -> Self {
        Self {
            small_mid: round15(small_mid_pct / 100.0),
            international: round15(international_pct / 100.0),
        }
    }

    pub fn large(&self) -> f64 {
        1.0 - self.small_mid - self.international
    }
}

/// Absolute target weights for the five sub-balances
///
/// Cash is always the exact residual `1 - bond - stock`, so rebalancing
/// weights sum to 1 by construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssetWeights {
    pub bond: f64,
    pub large_cap: f64,
    pub small_mid: f64,
    pub international: f64,
    pub cash: f64,
}

impl AssetWeights {
    /// Resolve absolute weights from the answered stock/bond percentages
    /// and the stock sub-class split
    pub fn resolve(stock_pct: f64, bond_pct: f64, split: &StockSplit) -> Self {
        let stock = round15(stock_pct / 100.0);
        let bond = round15(bond_pct / 100.0);
        Self {
            bond,
            large_cap: round15(stock * split.large()),
            small_mid: round15(stock * split.small_mid),
            international: round15(stock * split.international),
            cash: 1.0 - bond - stock,
        }
    }

    /// Combined stock weight
    pub fn stock(&self) -> f64 {
        self.large_cap + self.small_mid + self.international
    }

    /// Glidepath step: shift weight into bonds, hold cash fixed, and
    /// re-derive the stock sub-class weights from the sleeve split
    pub fn with_bond_weight(&self, bond: f64, split: &StockSplit) -> Self {
        let stock = 1.0 - bond - self.cash;
        Self {
            bond,
            large_cap: round15(stock * split.large()),
            small_mid: round15(stock * split.small_mid),
            international: round15(stock * split.international),
            cash: self.cash,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let classes = [
            ("bond", self.bond),
            ("large cap", self.large_cap),
            ("small/midcap", self.small_mid),
            ("international", self.international),
            ("cash", self.cash),
        ];
        for (class, weight) in classes {
            if weight < -1e-12 {
                return Err(ConfigError::NegativeWeight { class, weight });
            }
        }
        let sum = self.bond + self.stock() + self.cash;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(())
    }
}

/// Linear glidepath for accumulation: stock weight falls evenly from its
/// starting value to the retirement value, bond weight absorbs the shift
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Glidepath {
    pub stock_weight_at_retirement: f64,
}

impl Glidepath {
    /// Annual bond-weight increase; zero for a one-year horizon where the
    /// `years - 1` denominator would blow up
    pub fn annual_step(&self, start_stock_weight: f64, years: u32) -> f64 {
        if years <= 1 {
            return 0.0;
        }
        (start_stock_weight - self.stock_weight_at_retirement) / (years - 1) as f64
    }
}

/// Order in which sub-balances fund each year's withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalOrder {
    /// Withdraw pro rata and restore every class to target weight (code 1)
    AnnualRebalance,
    /// Drain equities, then bonds, then cash (code 2)
    StocksFirst,
    /// Drain bonds, then cash, then equities (code 3)
    BondsFirst,
    /// Drain cash, then bonds, then equities, harvesting winners into cash
    /// at each year end (code 4)
    DecisionBased,
}

impl WithdrawalOrder {
    pub fn from_code(code: i64) -> Result<Self, ConfigError> {
        match code {
            1 => Ok(WithdrawalOrder::AnnualRebalance),
            2 => Ok(WithdrawalOrder::StocksFirst),
            3 => Ok(WithdrawalOrder::BondsFirst),
            4 => Ok(WithdrawalOrder::DecisionBased),
            _ => Err(ConfigError::SelectionCode {
                field: "withdrawal strategy",
                code,
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WithdrawalOrder::AnnualRebalance => "annual rebalancing",
            WithdrawalOrder::StocksFirst => "stocks first",
            WithdrawalOrder::BondsFirst => "bonds first",
            WithdrawalOrder::DecisionBased => "decision based",
        }
    }
}

/// Accumulation vs. decumulation, with the mode-specific parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimulationMode {
    Accumulation {
        /// First-year monthly contribution, grown annually by inflation
        monthly_contribution: f64,
        glidepath: Option<Glidepath>,
    },
    Decumulation {
        order: WithdrawalOrder,
        schedule: WithdrawalSchedule,
    },
}

/// Immutable parameters for one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub years: u32,
    pub starting_balance: f64,
    /// Annual cost-of-living / contribution growth rate, as a decimal
    pub inflation: f64,
    /// Annual investment expense drag, as a decimal
    pub expense: f64,
    pub weights: AssetWeights,
    pub split: StockSplit,
    pub bond_selection: BondSelection,
    pub cash_selection: CashSelection,
    /// Annual CD rate in percent, used when the bond selection is FixedCd
    pub cd_annual_rate: f64,
    /// Annual money market rate in percent, used when the cash selection is FixedMmf
    pub mmf_annual_rate: f64,
    pub mode: SimulationMode,
}

impl StrategyConfig {
    pub fn horizon_months(&self) -> u32 {
        self.years * 12
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years == 0 {
            return Err(ConfigError::ZeroHorizon);
        }
        if self.years > MAX_HORIZON_YEARS {
            return Err(ConfigError::HorizonTooLong { years: self.years });
        }
        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cash_is_exact_residual() {
        let split = StockSplit::diversified();
        let weights = AssetWeights::resolve(50.0, 40.0, &split);
        assert_eq!(weights.cash, 1.0 - 0.4 - 0.5);
        assert_relative_eq!(
            weights.bond + weights.stock() + weights.cash,
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_stock_split_shares() {
        let split = StockSplit::diversified();
        let weights = AssetWeights::resolve(100.0, 0.0, &split);
        assert_relative_eq!(weights.large_cap, 0.45, epsilon = 1e-12);
        assert_relative_eq!(weights.small_mid, 0.30, epsilon = 1e-12);
        assert_relative_eq!(weights.international, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_weight_sum_validated() {
        let mut weights = AssetWeights::resolve(50.0, 40.0, &StockSplit::diversified());
        weights.cash += 0.25;
        assert!(matches!(
            weights.validate(),
            Err(ConfigError::WeightSum { .. })
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        // 70% stock + 50% bond pushes cash to -0.2
        let weights = AssetWeights::resolve(70.0, 50.0, &StockSplit::diversified());
        assert!(matches!(
            weights.validate(),
            Err(ConfigError::NegativeWeight { class: "cash", .. })
        ));
    }

    #[test]
    fn test_glidepath_step() {
        let glide = Glidepath {
            stock_weight_at_retirement: 0.30,
        };
        assert_relative_eq!(glide.annual_step(0.60, 31), 0.01, epsilon = 1e-12);
        // one-year horizon must not divide by zero
        assert_eq!(glide.annual_step(0.60, 1), 0.0);
    }

    #[test]
    fn test_glidepath_shift_holds_cash() {
        let split = StockSplit::diversified();
        let weights = AssetWeights::resolve(60.0, 30.0, &split);
        let shifted = weights.with_bond_weight(weights.bond + 0.01, &split);
        assert_relative_eq!(shifted.bond, 0.31, epsilon = 1e-12);
        assert_eq!(shifted.cash, weights.cash);
        assert_relative_eq!(shifted.stock(), 0.59, epsilon = 1e-12);
        assert_relative_eq!(shifted.small_mid, 0.59 * 0.30, epsilon = 1e-12);
    }

    #[test]
    fn test_selection_codes() {
        assert_eq!(
            BondSelection::from_code(2).unwrap(),
            BondSelection::CorporateIndex
        );
        assert!(BondSelection::from_code(4).is_err());
        assert_eq!(
            CashSelection::from_code(2).unwrap().instrument(),
            crate::dataset::Instrument::FixedMmf
        );
        assert!(WithdrawalOrder::from_code(0).is_err());
    }
}
