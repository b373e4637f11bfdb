//! Result matrix collected from the per-sample decumulation runs

use super::engine::SampleRun;

/// Failure-row sentinel: months in the 50-year maximum horizon. Any value
/// below the configured horizon marks a depleted path.
pub const NO_FAILURE: f64 = 600.0;

/// Checkpoint spacing: balances are snapshot at months 59, 119, 179, ...
pub const CHECKPOINT_INTERVAL_MONTHS: u32 = 60;

/// `[checkpoint rows][nboot]` balances plus the failure-month row
#[derive(Debug, Clone)]
pub struct ResultMatrix {
    /// Interpolated failure month per sample, `NO_FAILURE` for survivors
    pub failure_months: Vec<f64>,

    /// Remaining balance per checkpoint row; samples that failed earlier
    /// hold 0.0
    pub checkpoints: Vec<Vec<f64>>,

    pub horizon_months: u32,
}

impl ResultMatrix {
    /// Number of 5-year checkpoint rows inside the horizon
    pub fn checkpoint_rows(horizon_months: u32) -> usize {
        (horizon_months / CHECKPOINT_INTERVAL_MONTHS) as usize
    }

    /// Month index snapshot into the given checkpoint row
    pub fn checkpoint_month(row: usize) -> u32 {
        CHECKPOINT_INTERVAL_MONTHS * (row as u32 + 1) - 1
    }

    /// End-of-year label for the given checkpoint row (5, 10, 15, ...)
    pub fn checkpoint_year(row: usize) -> u32 {
        (Self::checkpoint_month(row) + 1) / 12
    }

    /// Assemble the matrix from per-sample runs
    pub fn collect(runs: Vec<SampleRun>, horizon_months: u32) -> Self {
        let rows = Self::checkpoint_rows(horizon_months);
        let samples = runs.len();
        let mut failure_months = Vec::with_capacity(samples);
        let mut checkpoints = vec![vec![0.0; samples]; rows];

        for (sample, run) in runs.into_iter().enumerate() {
            failure_months.push(run.failure_month);
            for (row, balance) in run.checkpoints.into_iter().enumerate() {
                checkpoints[row][sample] = balance;
            }
        }

        Self {
            failure_months,
            checkpoints,
            horizon_months,
        }
    }

    pub fn samples(&self) -> usize {
        self.failure_months.len()
    }

    /// Samples whose balance could not fund a withdrawal within the horizon
    pub fn failed_months(&self) -> Vec<f64> {
        let horizon = self.horizon_months as f64;
        self.failure_months
            .iter()
            .copied()
            .filter(|&m| m < horizon)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_geometry() {
        assert_eq!(ResultMatrix::checkpoint_rows(360), 6);
        assert_eq!(ResultMatrix::checkpoint_rows(359), 5);
        assert_eq!(ResultMatrix::checkpoint_month(0), 59);
        assert_eq!(ResultMatrix::checkpoint_month(5), 359);
        assert_eq!(ResultMatrix::checkpoint_year(0), 5);
        assert_eq!(ResultMatrix::checkpoint_year(5), 30);
    }

    #[test]
    fn test_collect_transposes_runs() {
        let runs = vec![
            SampleRun {
                failure_month: NO_FAILURE,
                checkpoints: vec![100.0, 90.0],
            },
            SampleRun {
                failure_month: 73.0,
                checkpoints: vec![40.0, 0.0],
            },
        ];
        let matrix = ResultMatrix::collect(runs, 120);
        assert_eq!(matrix.samples(), 2);
        assert_eq!(matrix.checkpoints.len(), 2);
        assert_eq!(matrix.checkpoints[0], vec![100.0, 40.0]);
        assert_eq!(matrix.checkpoints[1], vec![90.0, 0.0]);
        assert_eq!(matrix.failed_months(), vec![73.0]);
    }
}
