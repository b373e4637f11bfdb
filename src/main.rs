//! Nestegg CLI
//!
//! Runs one bootstrap simulation from a positional answer list and prints
//! the percentile, key-metrics, and income tables.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use nestegg::strategy::{
    accumulation_from_answers, decumulation_from_answers, default_savings_answers,
    default_spending_answers,
};
use nestegg::{RunOutput, SimulationRunner};
use nestegg::stats::{AccumulationReport, DecumulationReport, PercentileSummary};
use std::fs::File;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Accumulation: project the portfolio up to retirement
    Save,
    /// Decumulation: project withdrawals through retirement
    Spend,
}

#[derive(Debug, Parser)]
#[command(name = "nestegg", about = "Bootstrap retirement portfolio projections")]
struct Args {
    /// Monthly returns file (row number, date, then six return columns)
    #[arg(long, default_value = "data/sample_returns.txt")]
    data: PathBuf,

    /// Which calculator to run
    #[arg(long, value_enum, default_value_t = Mode::Spend)]
    mode: Mode,

    /// Number of bootstrap samples
    #[arg(long, default_value_t = 5000)]
    samples: usize,

    /// JSON file holding the positional answer list; questionnaire defaults
    /// are used when omitted
    #[arg(long)]
    answers: Option<PathBuf>,

    /// Write the full report as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Nestegg v0.1.0");
    println!("==============\n");

    let answers = match &args.answers {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening answers file {path:?}"))?;
            serde_json::from_reader::<_, Vec<f64>>(file)
                .with_context(|| format!("parsing answers file {path:?}"))?
        }
        None => match args.mode {
            Mode::Save => default_savings_answers(),
            Mode::Spend => default_spending_answers(),
        },
    };

    let config = match args.mode {
        Mode::Save => accumulation_from_answers(&answers)?,
        Mode::Spend => decumulation_from_answers(&answers)?,
    };

    let runner = SimulationRunner::from_file(&args.data)
        .with_context(|| format!("loading returns from {:?}", args.data))?;
    println!(
        "Dataset: {} months from {:?}",
        runner.dataset().len(),
        args.data
    );
    println!("Samples: {}   Horizon: {} years\n", args.samples, config.years);

    match runner.run(&config, args.samples)? {
        RunOutput::Accumulation { report, .. } => {
            print_accumulation(&report);
            if let Some(path) = &args.json {
                write_json(path, &report)?;
            }
        }
        RunOutput::Decumulation { report, .. } => {
            print_decumulation(&report);
            if let Some(path) = &args.json {
                write_json(path, &report)?;
            }
        }
    }

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &PathBuf, report: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {path:?}"))?;
    serde_json::to_writer_pretty(file, report)?;
    println!("\nFull report written to: {}", path.display());
    Ok(())
}

fn print_accumulation(report: &AccumulationReport) {
    println!("Accumulated Balance at Retirement (year {}):", report.years);
    print_summary_rows(&report.balances);

    println!("\nKey Metrics:");
    println!("  Years until retirement:          {}", report.years);
    println!(
        "  Total contributions:             {:>14.2}",
        report.total_contributions
    );
    println!(
        "  Average annual contribution:     {:>14.2}",
        report.average_annual_contribution
    );
    println!(
        "  Best case balance:               {:>14.2}",
        report.balances.highest
    );
    println!(
        "  Worst case balance:              {:>14.2}",
        report.balances.lowest
    );
}

fn print_decumulation(report: &DecumulationReport) {
    println!("Remaining Balance by Checkpoint:");
    print!("{:<24}", "");
    for row in &report.checkpoints {
        print!("{:>14}", format!("Year {}", row.end_of_year));
    }
    println!();

    let metrics: [(&str, fn(&PercentileSummary) -> f64); 9] = [
        ("80th Percentile", |s| s.pct_80),
        ("60th Percentile", |s| s.pct_60),
        ("Median", |s| s.median),
        ("40th Percentile", |s| s.pct_40),
        ("20th Percentile", |s| s.pct_20),
        ("10% Value at Risk", |s| s.var_10pct),
        ("5% Value at Risk", |s| s.var_5pct),
        ("1% Value at Risk", |s| s.var_1pct),
        ("Lowest Balance", |s| s.lowest),
    ];
    for (label, pick) in metrics {
        print!("{label:<24}");
        for row in &report.checkpoints {
            print!("{:>14.2}", pick(&row.balances));
        }
        println!();
    }

    println!("\nKey Metrics:");
    println!(
        "  Retirement horizon:              {} years",
        report.horizon_years
    );
    println!(
        "  Probability of success:          {:>8.4}",
        report.probability_of_success
    );
    println!(
        "  Probability of failure:          {:>8.4}  ({} of {} samples)",
        report.probability_of_failure, report.failed_samples, report.samples
    );
    if let Some(max) = report.max_remaining_balance {
        println!("  Maximum remaining balance:       {max:>14.2}");
    }
    if let Some(mean) = report.failure_months.mean {
        println!(
            "  Mean depletion:                  {:>8.2} years",
            mean / 12.0
        );
    }
    println!("\nSavings Depleted in Years:");
    println!(
        "  Worst case {:>6.2}   Median {:>6.2}   5% VaR {:>6.2}   Best case {:>6.2}",
        report.depleted_years.lowest,
        report.depleted_years.median,
        report.depleted_years.var_5pct,
        report.depleted_years.highest
    );

    println!("\nAnnual Income Schedule:");
    println!("{:>6} {:>14} {:>16}", "Year", "Income", "Cumulative");
    for year in report.income.years.iter().take(10) {
        println!(
            "{:>6} {:>14.2} {:>16.2}",
            year.year, year.annual, year.cumulative
        );
    }
    if report.income.years.len() > 10 {
        println!("... ({} more years)", report.income.years.len() - 10);
    }
}

fn print_summary_rows(summary: &PercentileSummary) {
    let rows = [
        ("Highest Balance", summary.highest),
        ("80th Percentile", summary.pct_80),
        ("60th Percentile", summary.pct_60),
        ("Mean Balance", summary.mean),
        ("Median Balance", summary.median),
        ("40th Percentile", summary.pct_40),
        ("20th Percentile", summary.pct_20),
        ("10% Value at Risk", summary.var_10pct),
        ("5% Value at Risk", summary.var_5pct),
        ("1% Value at Risk", summary.var_1pct),
        ("Lowest Balance", summary.lowest),
    ];
    for (label, value) in rows {
        println!("  {label:<24}{value:>16.2}");
    }
}
