//! Batch simulation runner
//!
//! Owns the loaded dataset and turns a validated configuration into the
//! per-sample fan-out: seal the dataset with the run's fixed rates,
//! generate the bootstrap matrix, simulate every sample in parallel, and
//! reduce into the report tables. Samples share nothing mutable, so the
//! fan-out is a plain `par_iter` over sample indices.

use crate::dataset::{load_returns, DatasetError, HistoricalDataset};
use crate::simulation::{BootstrapMatrix, ResultMatrix, SimulationEngine};
use crate::stats::{self, AccumulationReport, DecumulationReport};
use crate::strategy::{ConfigError, SimulationMode, StrategyConfig};
use log::{debug, info};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Results of one simulation run, by mode
#[derive(Debug, Clone)]
pub enum RunOutput {
    Accumulation {
        terminal_balances: Vec<f64>,
        report: AccumulationReport,
    },
    Decumulation {
        matrix: ResultMatrix,
        report: DecumulationReport,
    },
}

/// Pre-loaded runner for one or more simulation runs over the same dataset
pub struct SimulationRunner {
    dataset: HistoricalDataset,
}

impl SimulationRunner {
    pub fn new(dataset: HistoricalDataset) -> Self {
        Self { dataset }
    }

    /// Load the historical returns table and build a runner
    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let dataset = load_returns(path)?;
        if let Some((first, last)) = dataset.span() {
            info!(
                "loaded {} months of returns ({} to {})",
                dataset.len(),
                first.format("%Y-%m"),
                last.format("%Y-%m")
            );
        } else {
            info!("loaded {} months of returns", dataset.len());
        }
        Ok(Self { dataset })
    }

    pub fn dataset(&self) -> &HistoricalDataset {
        &self.dataset
    }

    /// Validate, draw a fresh bootstrap matrix, and simulate `nboot` samples
    pub fn run(&self, config: &StrategyConfig, nboot: usize) -> Result<RunOutput, ConfigError> {
        config.validate()?;
        if nboot == 0 {
            return Err(ConfigError::ZeroSamples);
        }

        let horizon = config.horizon_months() as usize;
        let matrix = BootstrapMatrix::generate(horizon, nboot, self.dataset.len());
        let dataset = self.sealed_dataset(config);
        Ok(Self::execute(&dataset, config, &matrix))
    }

    /// Simulate against a caller-supplied index matrix
    ///
    /// The stochastic content lives entirely in the matrix, so replaying the
    /// same matrix reproduces a run exactly.
    pub fn run_with_matrix(
        &self,
        config: &StrategyConfig,
        matrix: &BootstrapMatrix,
    ) -> Result<RunOutput, ConfigError> {
        config.validate()?;
        if matrix.samples() == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if matrix.horizon_months() != config.horizon_months() as usize {
            return Err(ConfigError::MatrixShape {
                matrix_months: matrix.horizon_months(),
                expected_months: config.horizon_months() as usize,
            });
        }

        let dataset = self.sealed_dataset(config);
        Ok(Self::execute(&dataset, config, matrix))
    }

    /// Clone the table and fill the fixed CD / money market columns for
    /// this run's rates
    fn sealed_dataset(&self, config: &StrategyConfig) -> HistoricalDataset {
        let mut dataset = self.dataset.clone();
        dataset.apply_fixed_rates(config.cd_annual_rate, config.mmf_annual_rate);
        dataset
    }

    fn execute(
        dataset: &HistoricalDataset,
        config: &StrategyConfig,
        matrix: &BootstrapMatrix,
    ) -> RunOutput {
        let nboot = matrix.samples();
        let started = Instant::now();
        let engine = SimulationEngine::new(dataset, config, matrix);

        let output = match &config.mode {
            SimulationMode::Accumulation {
                monthly_contribution,
                glidepath,
            } => {
                let terminal_balances: Vec<f64> = (0..nboot)
                    .into_par_iter()
                    .map(|sample| {
                        engine.accumulate_sample(sample, *monthly_contribution, glidepath.as_ref())
                    })
                    .collect();
                let report = stats::summarize_accumulation(
                    &terminal_balances,
                    *monthly_contribution,
                    config.inflation,
                    config.years,
                );
                RunOutput::Accumulation {
                    terminal_balances,
                    report,
                }
            }
            SimulationMode::Decumulation { order, schedule } => {
                let withdrawals = schedule.annual_amounts(config.inflation, config.years);
                let runs: Vec<_> = (0..nboot)
                    .into_par_iter()
                    .map(|sample| engine.decumulate_sample(sample, *order, &withdrawals))
                    .collect();
                let matrix = ResultMatrix::collect(runs, config.horizon_months());
                let report = stats::summarize_decumulation(&matrix, &withdrawals);
                RunOutput::Decumulation { matrix, report }
            }
        };

        debug!(
            "simulated {} samples over {} months in {:?}",
            nboot,
            matrix.horizon_months(),
            started.elapsed()
        );
        output
    }
}
