//! Annual withdrawal schedule with inflation and scheduled step changes

use crate::simulation::round15;
use serde::{Deserialize, Serialize};

/// Step-change pattern layered on top of the annual inflation adjustment
///
/// Increases are positive amounts, decreases negative. The first change can
/// end (its amount is backed out in the end year); the second runs to the
/// horizon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SchedulePattern {
    /// Inflation only (code 1)
    Constant,
    /// One change starting in `start_year` and continuing to the horizon (code 2)
    OneChange { amount: f64, start_year: u32 },
    /// Two changes; the first spans `[first_start, first_end)` (code 3)
    TwoChanges {
        first_amount: f64,
        first_start: u32,
        first_end: u32,
        second_amount: f64,
        second_start: u32,
    },
}

/// Withdrawal amounts per retirement year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalSchedule {
    /// First-year annual withdrawal
    pub initial_amount: f64,
    pub pattern: SchedulePattern,
}

impl WithdrawalSchedule {
    pub fn constant(initial_amount: f64) -> Self {
        Self {
            initial_amount,
            pattern: SchedulePattern::Constant,
        }
    }

    /// Materialize the annual withdrawal for years `0..years`
    ///
    /// Each year starts from the prior year grown by inflation; step changes
    /// are then applied. When the first change ends in the same year the
    /// second begins, both adjustments land in that single year so the
    /// transition is not double counted.
    pub fn annual_amounts(&self, inflation: f64, years: u32) -> Vec<f64> {
        let mut amounts = Vec::with_capacity(years as usize);
        amounts.push(self.initial_amount);

        for yr in 1..years {
            let grown = amounts[yr as usize - 1] * (1.0 + inflation);
            let amount = match self.pattern {
                SchedulePattern::Constant => grown,
                SchedulePattern::OneChange { amount, start_year } => {
                    if yr == start_year {
                        grown + amount
                    } else {
                        grown
                    }
                }
                SchedulePattern::TwoChanges {
                    first_amount,
                    first_start,
                    first_end,
                    second_amount,
                    second_start,
                } => {
                    if yr == first_start {
                        grown + first_amount
                    } else if yr == first_end {
                        if first_end == second_start {
                            grown - first_amount + second_amount
                        } else {
                            grown - first_amount
                        }
                    } else if yr == second_start {
                        grown + second_amount
                    } else {
                        grown
                    }
                }
            };
            amounts.push(round15(amount));
        }

        amounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_schedule_compounds_inflation() {
        let schedule = WithdrawalSchedule::constant(10_000.0);
        let amounts = schedule.annual_amounts(0.03, 4);
        assert_eq!(amounts.len(), 4);
        assert_eq!(amounts[0], 10_000.0);
        assert_relative_eq!(amounts[1], 10_300.0, epsilon = 1e-9);
        assert_relative_eq!(amounts[3], 10_000.0 * 1.03_f64.powi(3), epsilon = 1e-6);
    }

    #[test]
    fn test_one_change_persists() {
        let schedule = WithdrawalSchedule {
            initial_amount: 10_000.0,
            pattern: SchedulePattern::OneChange {
                amount: 5_000.0,
                start_year: 2,
            },
        };
        let amounts = schedule.annual_amounts(0.0, 5);
        assert_eq!(amounts, vec![10_000.0, 10_000.0, 15_000.0, 15_000.0, 15_000.0]);
    }

    #[test]
    fn test_two_changes_with_gap() {
        let schedule = WithdrawalSchedule {
            initial_amount: 10_000.0,
            pattern: SchedulePattern::TwoChanges {
                first_amount: 2_000.0,
                first_start: 1,
                first_end: 3,
                second_amount: 4_000.0,
                second_start: 5,
            },
        };
        let amounts = schedule.annual_amounts(0.0, 7);
        // +2000 in year 1, backed out in year 3, +4000 from year 5
        assert_eq!(
            amounts,
            vec![10_000.0, 12_000.0, 12_000.0, 10_000.0, 10_000.0, 14_000.0, 14_000.0]
        );
    }

    #[test]
    fn test_coincident_end_and_start_nets_once() {
        let schedule = WithdrawalSchedule {
            initial_amount: 10_000.0,
            pattern: SchedulePattern::TwoChanges {
                first_amount: 2_000.0,
                first_start: 1,
                first_end: 3,
                second_amount: 4_000.0,
                second_start: 3,
            },
        };
        let amounts = schedule.annual_amounts(0.0, 5);
        // year 3 nets out the first change and applies the second exactly once
        assert_eq!(
            amounts,
            vec![10_000.0, 12_000.0, 12_000.0, 14_000.0, 14_000.0]
        );
    }

    #[test]
    fn test_inflation_applies_to_stepped_amount() {
        let schedule = WithdrawalSchedule {
            initial_amount: 10_000.0,
            pattern: SchedulePattern::OneChange {
                amount: 1_000.0,
                start_year: 1,
            },
        };
        let amounts = schedule.annual_amounts(0.10, 3);
        assert_relative_eq!(amounts[1], 12_000.0, epsilon = 1e-9);
        assert_relative_eq!(amounts[2], 13_200.0, epsilon = 1e-9);
    }
}
